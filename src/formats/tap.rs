use crate::test_result::{TestResult, ValueComparison};
use crate::utils::string;

pub fn print_version() {
    println!("TAP version 14")
}

pub fn print_plan(start: usize, end: usize) {
    println!("{}..{}", start, end)
}

pub fn print_ok(test_number: usize, message: &str, indent_level: usize) {
    println!(
        "ok     {:>indent$} - {}",
        test_number,
        message,
        indent = indent_level
    )
}

pub fn print_not_ok(test_number: usize, message: &str, diagnostics: &str, indent_level: usize) {
    println!(
        "not ok {:>indent$} - {}",
        test_number,
        message,
        indent = indent_level
    );
    if !diagnostics.is_empty() {
        print_diagnostics(diagnostics)
    }
}

pub fn print_diagnostics(diagnostics: &str) {
    println!("{}", format_diagnostics(diagnostics));
}

fn format_diagnostics(diagnostics: &str) -> String {
    let code_block = format!("---\n{}...", diagnostics);
    string::indent_lines(&code_block, 2)
}

/// YAML block describing which values differ between the shells
pub fn diagnostics_from_test_result(test_result: &TestResult) -> String {
    let mut output = String::new();

    if let ValueComparison::Diff { expected, got } = test_result.stdout() {
        output.push_str(&yaml_diff("stdout", &quote(expected), &quote(got)));
    }

    if let ValueComparison::Diff { expected, got } = test_result.stderr() {
        output.push_str(&yaml_diff("stderr", &quote(expected), &quote(got)));
    }

    if let ValueComparison::Diff { expected, got } = test_result.exit_code() {
        output.push_str(&yaml_diff(
            "exit_code",
            &expected.to_string(),
            &got.to_string(),
        ));
    }

    output
}

fn yaml_diff(key: &str, expected: &str, got: &str) -> String {
    format!("{}:\n  expected: {}\n  got: {}\n", key, expected, got)
}

// JSON strings are valid YAML scalars
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}
