//! Character level diff between the reference and implementation output

use colored::Colorize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanKind {
    Equal,
    Delete,
    Insert,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextDiff {
    spans: Vec<Span>,
}

/// Diff `reference` against `implementation`, deletions being text only the
/// reference produced
pub fn diff(reference: &str, implementation: &str) -> TextDiff {
    let mut spans: Vec<Span> = vec![];

    for change in ::diff::chars(reference, implementation) {
        let (kind, c) = match change {
            ::diff::Result::Both(c, _) => (SpanKind::Equal, c),
            ::diff::Result::Left(c) => (SpanKind::Delete, c),
            ::diff::Result::Right(c) => (SpanKind::Insert, c),
        };

        match spans.last_mut() {
            Some(last) if last.kind == kind => last.text.push(c),
            _ => spans.push(Span {
                kind,
                text: c.to_string(),
            }),
        }
    }

    TextDiff { spans }
}

impl TextDiff {
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_identical(&self) -> bool {
        self.spans.iter().all(|span| span.kind == SpanKind::Equal)
    }

    /// Terminal rendering: deletions red, insertions green
    ///
    /// Each line of a span is coloured on its own so the colour stops before
    /// the newline and never bleeds into prefixes added per line.
    pub fn pretty(&self) -> String {
        self.spans
            .iter()
            .map(|span| {
                span.text
                    .split('\n')
                    .map(|line| paint(span.kind, line))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect()
    }

    /// Colour-free rendering in wdiff style: `[-deleted-]{+inserted+}`
    pub fn plain(&self) -> String {
        self.spans
            .iter()
            .map(|span| match span.kind {
                SpanKind::Equal => span.text.clone(),
                SpanKind::Delete => format!("[-{}-]", span.text),
                SpanKind::Insert => format!("{{+{}+}}", span.text),
            })
            .collect()
    }
}

fn paint(kind: SpanKind, line: &str) -> String {
    if line.is_empty() {
        return String::new();
    }

    match kind {
        SpanKind::Equal => line.to_owned(),
        SpanKind::Delete => line.red().to_string(),
        SpanKind::Insert => line.green().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(kind: SpanKind, text: &str) -> Span {
        Span {
            kind,
            text: text.to_owned(),
        }
    }

    #[test]
    fn test_identical_text() {
        let diff = diff("hello", "hello");

        assert!(diff.is_identical());
        assert_eq!(diff.spans(), &[span(SpanKind::Equal, "hello")]);
        assert_eq!(diff.plain(), "hello");
    }

    #[test]
    fn test_empty_text() {
        let diff = diff("", "");

        assert!(diff.is_identical());
        assert!(diff.spans().is_empty());
        assert_eq!(diff.plain(), "");
    }

    #[test]
    fn test_changed_word() {
        let diff = diff("hello world", "hello there");

        assert!(!diff.is_identical());
        assert!(diff.plain().starts_with("hello "));
        assert!(diff.plain().contains("[-"));
        assert!(diff.plain().contains("{+"));
    }

    #[test]
    fn test_only_insertions() {
        let diff = diff("", "abc");

        assert_eq!(diff.spans(), &[span(SpanKind::Insert, "abc")]);
        assert_eq!(diff.plain(), "{+abc+}");
    }

    #[test]
    fn test_only_deletions() {
        let diff = diff("abc", "");

        assert_eq!(diff.plain(), "[-abc-]");
    }

    #[test]
    fn test_suffix_added() {
        let diff = diff("hello", "hello!");

        assert_eq!(
            diff.spans(),
            &[span(SpanKind::Equal, "hello"), span(SpanKind::Insert, "!")]
        );
    }

    #[test]
    fn test_pretty_closes_colour_on_every_line() {
        colored::control::set_override(true);

        let pretty = diff("a\nb", "a\nc\nd\n").pretty();

        for line in pretty.lines() {
            if line.contains("\x1b[") {
                assert!(line.ends_with("\x1b[0m"), "colour left open: {:?}", line);
            }
        }
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_spans_cover_both_inputs() {
        let diff = diff("line 1\nline 2", "line 1\nline two\nline 3");

        let reference: String = diff
            .spans()
            .iter()
            .filter(|s| s.kind != SpanKind::Insert)
            .map(|s| s.text.as_str())
            .collect();
        let implementation: String = diff
            .spans()
            .iter()
            .filter(|s| s.kind != SpanKind::Delete)
            .map(|s| s.text.as_str())
            .collect();

        assert_eq!(reference, "line 1\nline 2");
        assert_eq!(implementation, "line 1\nline two\nline 3");
    }
}
