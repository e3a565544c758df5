pub use self::Tree::{Leaf, Node};
use crate::test_result::{TestResult, ValueComparison};
use crate::text_diff::TextDiff;
use crate::utils::string;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tree {
    Node(String, Vec<Tree>),
    Leaf(Vec<String>),
}

const BRANCH: &str = "├─ ";
const EDGE: &str = "└─ ";
const PIPE: &str = "│  ";
const EMPTY: &str = "   ";

pub fn draw_tree(tree: &Tree) -> String {
    let mut output = String::new();
    write_tree(&mut output, tree, "", "");
    output
}

// `first_prefix` goes in front of the first line of an element, `rest_prefix`
// in front of every line below it
fn write_tree(output: &mut String, tree: &Tree, first_prefix: &str, rest_prefix: &str) {
    match tree {
        Node(title, children) => {
            push_line(output, first_prefix, title);

            for (i, child) in children.iter().enumerate() {
                let (branch, pipe) = if i + 1 == children.len() {
                    (EDGE, EMPTY)
                } else {
                    (BRANCH, PIPE)
                };

                write_tree(
                    output,
                    child,
                    &format!("{}{}", rest_prefix, branch),
                    &format!("{}{}", rest_prefix, pipe),
                );
            }
        }
        Leaf(lines) => {
            for (i, line) in lines.iter().enumerate() {
                let prefix = if i == 0 { first_prefix } else { rest_prefix };
                push_line(output, prefix, line);
            }
        }
    }
}

fn push_line(output: &mut String, prefix: &str, line: &str) {
    output.push_str(prefix);
    output.push_str(line);
    output.push('\n');
}

pub fn text_block(content: &str) -> String {
    let prefixed_content = string::indent_with("│ ", content);

    if content.ends_with('\n') {
        format!("╭\n{}╰", prefixed_content)
    } else {
        format!("╭\n{}\n╰", prefixed_content)
    }
}

// FAILURE FORMATTING

/// Explain why a test failed; `diff` is the stdout diff between the shells
pub fn tree_from_test_result(test_result: &TestResult, diff: Option<&TextDiff>) -> Vec<Tree> {
    let mut categories = vec![];

    if !test_result.output_match {
        let content = match diff {
            Some(diff) => diff.pretty(),
            None => test_result.implementation_output.clone(),
        };
        categories.push(Node(
            String::from("Standard output"),
            vec![Leaf(string_to_lines(&text_block(&content)))],
        ));
    }

    if let ValueComparison::Diff { expected, got } = test_result.stderr() {
        categories.push(Node(
            String::from("Standard error"),
            show_string_diff(expected, got),
        ));
    }

    if let ValueComparison::Diff { expected, got } = test_result.exit_code() {
        categories.push(Node(
            String::from("Exit code"),
            show_i32_diff(expected, got),
        ));
    }

    let expectations = tree_from_expectations(test_result);
    if !expectations.is_empty() {
        categories.push(Node(String::from("Unmet expectations"), expectations));
    }

    categories
}

fn tree_from_expectations(test_result: &TestResult) -> Vec<Tree> {
    let mut categories = vec![];

    if let ValueComparison::Diff { expected, got } = test_result.expected_stdout() {
        categories.push(Node(
            String::from("Standard output"),
            show_string_diff(expected, got),
        ));
    }

    if let ValueComparison::Diff { expected, got } = test_result.expected_stderr() {
        categories.push(Node(
            String::from("Standard error"),
            show_string_diff(expected, got),
        ));
    }

    if let ValueComparison::Diff { expected, got } = test_result.expected_exit_code() {
        categories.push(Node(
            String::from("Exit code"),
            show_i32_diff(expected, got),
        ));
    }

    categories
}

fn show_string_diff(expected: &str, got: &str) -> Vec<Tree> {
    let expected_lines = string_to_lines(&format!("Expected\n{}", text_block(expected)));
    let got_lines = string_to_lines(&format!("Got\n{}", text_block(got)));

    vec![Leaf(expected_lines), Leaf(got_lines)]
}

fn string_to_lines(str: &str) -> Vec<String> {
    str.lines().map(|x| x.to_owned()).collect()
}

fn show_i32_diff(expected: i32, got: i32) -> Vec<Tree> {
    vec![
        Node(String::from("Expected"), vec![Leaf(vec![expected.to_string()])]),
        Node(String::from("Got"), vec![Leaf(vec![got.to_string()])]),
    ]
}

// TESTS

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{ShellOutput, ShellStatus};
    use crate::test_case::TestCase;
    use indoc::indoc;

    #[test]
    fn test_text_block_empty() {
        assert_eq!(text_block(""), "╭\n│ \n╰");
    }

    #[test]
    fn test_text_block_single_line() {
        let expected = indoc! {"
            ╭
            │ foo
            ╰"};

        assert_eq!(text_block("foo"), expected);
        assert_eq!(text_block("foo\n"), expected);
    }

    #[test]
    fn test_text_block_multiple_lines_including_empty_lines() {
        let expected = "╭\n│ line 1\n│ \n│ line 3\n╰";

        assert_eq!(text_block("line 1\n\nline 3"), expected);
    }

    #[test]
    fn test_draw_nested_tree() {
        let tree = Node(
            String::from("root"),
            vec![
                Node(
                    String::from("first"),
                    vec![Leaf(vec![String::from("a"), String::from("b")])],
                ),
                Leaf(vec![String::from("second")]),
            ],
        );

        let expected = indoc! {"
            root
            ├─ first
            │  └─ a
            │     b
            └─ second
        "};

        assert_eq!(draw_tree(&tree), expected);
    }

    #[test]
    fn test_exit_code_only_failure() {
        let test_case = TestCase {
            command: String::from("exit 3"),
            ..TestCase::default()
        };
        let result = TestResult::compare(
            &test_case,
            &ShellOutput::new("", "", ShellStatus::Exited(3)),
            &ShellOutput::new("", "", ShellStatus::Exited(0)),
        );

        let tree = Node(String::from("exit 3"), tree_from_test_result(&result, None));

        let expected = indoc! {"
            exit 3
            └─ Exit code
               ├─ Expected
               │  └─ 3
               └─ Got
                  └─ 0
        "};

        assert_eq!(draw_tree(&tree), expected);
    }

    #[test]
    fn test_stderr_and_expectation_failure() {
        let test_case = TestCase {
            command: String::from("cd nowhere"),
            expected_code: 2,
            ..TestCase::default()
        };
        let result = TestResult::compare(
            &test_case,
            &ShellOutput::new("", "no such dir", ShellStatus::Exited(1)),
            &ShellOutput::new("", "cd: error", ShellStatus::Exited(1)),
        );

        let tree = Node(String::from("cd nowhere"), tree_from_test_result(&result, None));

        let expected = indoc! {"
            cd nowhere
            ├─ Standard error
            │  ├─ Expected
            │  │  ╭
            │  │  │ no such dir
            │  │  ╰
            │  └─ Got
            │     ╭
            │     │ cd: error
            │     ╰
            └─ Unmet expectations
               └─ Exit code
                  ├─ Expected
                  │  └─ 2
                  └─ Got
                     └─ 1
        "};

        assert_eq!(draw_tree(&tree), expected);
    }
}
