pub fn indent_lines(input: &str, indent_level: usize) -> String {
    let prefix = format!("{:indent$}", "", indent = indent_level);
    indent_with(&prefix, input)
}

/// Prefix every line of `input` with `prefix`, keeping a trailing newline
pub fn indent_with(prefix: &str, input: &str) -> String {
    let mut output = String::new();

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n')
        }

        output.push_str(prefix);
        output.push_str(line);
    }

    if input.is_empty() {
        output.push_str(prefix);
    }

    if input.ends_with('\n') {
        output.push('\n')
    }

    output
}
