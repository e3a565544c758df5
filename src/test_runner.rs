use crate::formats::tree::{self, Node};
use crate::formats::tap;
use crate::shell::{self, Shell};
use crate::test_case::TestCase;
use crate::test_result::TestResult;
use crate::text_diff::{self, TextDiff};
use indexmap::IndexMap;
use std::time::Duration;

pub struct RunConfig {
    pub reference: Shell,
    pub implementation: Shell,
    pub timeout: Option<Duration>,
    pub format: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Summary,
    Tap,
}

/// Results keyed by command, in the order the commands first appeared
pub struct RunSummary {
    pub results: IndexMap<String, TestResult>,
    pub differences: IndexMap<String, TextDiff>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.values().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }
}

// RUN TEST CASES

/// Run one test case through the reference shell, then the implementation
pub fn run_test_case(config: &RunConfig, test_case: &TestCase) -> TestResult {
    let reference = shell::run_command(&config.reference, &test_case.command, config.timeout);
    let implementation =
        shell::run_command(&config.implementation, &test_case.command, config.timeout);

    let result = TestResult::compare(test_case, &reference, &implementation);

    tracing::debug!(
        command = %test_case.command,
        output_match = result.output_match,
        error_match = result.error_match,
        return_code_match = result.return_code_match,
        "compared shells"
    );

    result
}

pub fn run_test_cases(config: &RunConfig, test_cases: &[TestCase]) -> RunSummary {
    report_start(config.format, test_cases.len());

    let mut results = IndexMap::new();

    for (i, test_case) in test_cases.iter().enumerate() {
        let result = run_test_case(config, test_case);

        report_test_case(config.format, i, test_cases.len(), test_case, &result);

        // A repeated command overwrites the earlier result in place
        if results.insert(test_case.command.clone(), result).is_some() {
            tracing::warn!(
                command = %test_case.command,
                "duplicate command, keeping the last result"
            );
        }
    }

    let differences = generate_differences(&results);
    let summary = RunSummary {
        results,
        differences,
    };

    report_summary(config.format, &summary);

    summary
}

/// Stdout diff for every command whose shells disagreed on anything
pub fn generate_differences(
    results: &IndexMap<String, TestResult>,
) -> IndexMap<String, TextDiff> {
    results
        .iter()
        .filter(|(_, result)| !result.is_success())
        .map(|(command, result)| {
            let diff = text_diff::diff(&result.reference_output, &result.implementation_output);
            (command.clone(), diff)
        })
        .collect()
}

// REPORTING

fn report_start(format: ReportFormat, number_of_tests: usize) {
    match format {
        ReportFormat::Summary => summary_print_start(number_of_tests),
        ReportFormat::Tap => tap_print_start(number_of_tests),
    }
}

fn report_test_case(
    format: ReportFormat,
    index: usize,
    number_of_tests: usize,
    test_case: &TestCase,
    result: &TestResult,
) {
    match format {
        ReportFormat::Summary => summary_print_test_case(result),
        ReportFormat::Tap => {
            let test_number_indent_level = number_of_tests.to_string().len();
            tap_print_test_case(index + 1, test_case, result, test_number_indent_level);
        }
    }
}

fn report_summary(format: ReportFormat, summary: &RunSummary) {
    match format {
        ReportFormat::Summary => summary_print_summary(summary),
        ReportFormat::Tap => {}
    }
}

fn test_message(description: &str, command: &str) -> String {
    if description.is_empty() {
        command.to_owned()
    } else {
        format!("{} - {}", description, command)
    }
}

// SUMMARY HELPERS

fn summary_print_start(number_of_tests: usize) {
    println!("Running {} tests:", number_of_tests)
}

fn summary_print_test_case(result: &TestResult) {
    if result.is_success() {
        print!(".")
    } else {
        print!("F")
    }
}

fn summary_print_summary(summary: &RunSummary) {
    println!(); // Add newline to dots

    if !summary.results.is_empty() {
        println!();
    }

    for (command, result) in &summary.results {
        let status = if result.is_success() { "✅" } else { "❌" };
        let note = if result.meets_expectations() {
            ""
        } else {
            " (unmet expectations)"
        };
        println!(
            "{} {}{}",
            status,
            test_message(&result.description, command),
            note
        );
    }

    if !summary.differences.is_empty() {
        println!();
        println!("Detailed differences:");
        println!();

        for (command, diff) in &summary.differences {
            if let Some(result) = summary.results.get(command) {
                summary_print_difference(command, result, diff);
            }
        }
    }

    println!();
    println!("{}", summary_result_line(summary));
}

// Counts come from the collapsed results, not the number of input cases
fn summary_result_line(summary: &RunSummary) -> String {
    let status = if summary.failed() == 0 { "OK" } else { "FAIL" };

    format!(
        "Test result: {} ({}/{} passed, {} failed)",
        status,
        summary.passed(),
        summary.total(),
        summary.failed(),
    )
}

fn summary_print_difference(command: &str, result: &TestResult, diff: &TextDiff) {
    let header = format!("❌ {}", test_message(&result.description, command));
    let content = Node(header, tree::tree_from_test_result(result, Some(diff)));

    print!("{}", tree::draw_tree(&content));
}

// TAP HELPERS

fn tap_print_start(number_of_tests: usize) {
    tap::print_version();
    tap::print_plan(1, number_of_tests);
}

fn tap_print_test_case(
    test_number: usize,
    test_case: &TestCase,
    result: &TestResult,
    indent_level: usize,
) {
    let message = if test_case.description.is_empty() {
        test_case.command.clone()
    } else {
        format!("{} # {}", test_case.command, test_case.description)
    };

    if result.is_success() {
        tap::print_ok(test_number, &message, indent_level)
    } else {
        let diagnostics = tap::diagnostics_from_test_result(result);
        tap::print_not_ok(test_number, &message, &diagnostics, indent_level)
    }
}
