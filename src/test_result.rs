use crate::shell::ShellOutput;
use crate::test_case::TestCase;
use serde::Serialize;

/// Outcome of running one test case through both shells
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TestResult {
    pub description: String,
    #[serde(rename = "bash_output")]
    pub reference_output: String,
    #[serde(rename = "minishell_output")]
    pub implementation_output: String,
    #[serde(rename = "bash_error")]
    pub reference_error: String,
    #[serde(rename = "minishell_error")]
    pub implementation_error: String,
    #[serde(rename = "bash_return_code")]
    pub reference_code: i32,
    #[serde(rename = "minishell_return_code")]
    pub implementation_code: i32,
    pub output_match: bool,
    pub error_match: bool,
    pub return_code_match: bool,
    pub expected_output_match: bool,
    pub expected_error_match: bool,
    pub expected_code_match: bool,
    #[serde(skip)]
    expected: Expectations,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Expectations {
    output: Option<String>,
    error: Option<String>,
    code: Option<i32>,
}

impl TestResult {
    /// Compare the two shells with each other and the implementation with
    /// whatever the test case declares
    pub fn compare(
        test_case: &TestCase,
        reference: &ShellOutput,
        implementation: &ShellOutput,
    ) -> TestResult {
        let expected = Expectations {
            output: test_case
                .has_expected_output()
                .then(|| test_case.expected_output.clone()),
            error: test_case
                .has_expected_error()
                .then(|| test_case.expected_error.clone()),
            code: test_case
                .has_expected_code()
                .then_some(test_case.expected_code),
        };

        let reference_code = reference.exit_code();
        let implementation_code = implementation.exit_code();

        TestResult {
            description: test_case.description.clone(),
            output_match: reference.stdout == implementation.stdout,
            error_match: reference.stderr == implementation.stderr,
            return_code_match: reference_code == implementation_code,
            expected_output_match: matches_expectation(&expected.output, &implementation.stdout),
            expected_error_match: matches_expectation(&expected.error, &implementation.stderr),
            expected_code_match: matches_expectation(&expected.code, &implementation_code),
            reference_output: reference.stdout.clone(),
            implementation_output: implementation.stdout.clone(),
            reference_error: reference.stderr.clone(),
            implementation_error: implementation.stderr.clone(),
            reference_code,
            implementation_code,
            expected,
        }
    }

    /// Both shells agree on stdout, stderr and exit code
    pub fn is_success(&self) -> bool {
        self.output_match && self.error_match && self.return_code_match
    }

    /// Declared expectations hold for the implementation; does not affect
    /// [`TestResult::is_success`]
    pub fn meets_expectations(&self) -> bool {
        self.expected_output_match && self.expected_error_match && self.expected_code_match
    }

    // Shells compared with each other: the reference plays "expected"

    pub fn stdout(&self) -> ValueComparison<&str> {
        compare_values(
            Some(self.reference_output.as_str()),
            self.implementation_output.as_str(),
        )
    }

    pub fn stderr(&self) -> ValueComparison<&str> {
        compare_values(
            Some(self.reference_error.as_str()),
            self.implementation_error.as_str(),
        )
    }

    pub fn exit_code(&self) -> ValueComparison<i32> {
        compare_values(Some(self.reference_code), self.implementation_code)
    }

    // Implementation compared with declared expectations

    pub fn expected_stdout(&self) -> ValueComparison<&str> {
        compare_values(
            self.expected.output.as_deref(),
            self.implementation_output.as_str(),
        )
    }

    pub fn expected_stderr(&self) -> ValueComparison<&str> {
        compare_values(
            self.expected.error.as_deref(),
            self.implementation_error.as_str(),
        )
    }

    pub fn expected_exit_code(&self) -> ValueComparison<i32> {
        compare_values(self.expected.code, self.implementation_code)
    }
}

fn matches_expectation<T: PartialEq>(expected: &Option<T>, got: &T) -> bool {
    expected.as_ref().map_or(true, |expected| expected == got)
}

pub enum ValueComparison<T> {
    NotChecked,
    Matches(T),
    Diff { expected: T, got: T },
}

fn compare_values<T: PartialEq>(expected: Option<T>, got: T) -> ValueComparison<T> {
    if let Some(expected) = expected {
        if expected == got {
            ValueComparison::Matches(got)
        } else {
            ValueComparison::Diff { expected, got }
        }
    } else {
        ValueComparison::NotChecked
    }
}

// TESTS

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{ShellStatus, LAUNCH_FAILURE_EXIT_CODE};

    fn test_case(command: &str) -> TestCase {
        TestCase {
            command: command.to_owned(),
            description: String::from("test"),
            ..TestCase::default()
        }
    }

    fn exited(stdout: &str, stderr: &str, code: i32) -> ShellOutput {
        ShellOutput::new(stdout, stderr, ShellStatus::Exited(code))
    }

    #[test]
    fn test_matching_echo_passes() {
        let result = TestResult::compare(
            &test_case("echo hello"),
            &exited("hello", "", 0),
            &exited("hello", "", 0),
        );

        assert!(result.output_match);
        assert!(result.error_match);
        assert!(result.return_code_match);
        assert!(result.is_success());
    }

    #[test]
    fn test_whitespace_only_difference_matches() {
        let result = TestResult::compare(
            &test_case("echo hello"),
            &exited("hello\n", "", 0),
            &exited("  hello", "", 0),
        );

        assert!(result.output_match);
    }

    #[test]
    fn test_exit_code_mismatch_fails() {
        let result = TestResult::compare(
            &test_case("exit 3"),
            &exited("", "", 3),
            &exited("", "", 0),
        );

        assert!(result.output_match);
        assert!(result.error_match);
        assert!(!result.return_code_match);
        assert!(!result.is_success());
        assert!(matches!(
            result.exit_code(),
            ValueComparison::Diff { expected: 3, got: 0 }
        ));
    }

    #[test]
    fn test_unset_expectations_always_match() {
        let result = TestResult::compare(
            &test_case("echo hello"),
            &exited("hello", "", 0),
            &exited("something else", "noise", 42),
        );

        assert!(result.expected_output_match);
        assert!(result.expected_error_match);
        assert!(result.expected_code_match);
        assert!(result.meets_expectations());
        assert!(matches!(result.expected_stdout(), ValueComparison::NotChecked));
        assert!(matches!(result.expected_exit_code(), ValueComparison::NotChecked));
    }

    #[test]
    fn test_expectations_checked_against_implementation() {
        let test_case = TestCase {
            expected_output: String::from("hello"),
            expected_error: String::from("warning"),
            expected_code: 2,
            ..test_case("echo hello")
        };

        let result = TestResult::compare(
            &test_case,
            &exited("hello", "warning", 2),
            &exited("hello", "", 2),
        );

        assert!(result.expected_output_match);
        assert!(!result.expected_error_match);
        assert!(result.expected_code_match);
        assert!(!result.meets_expectations());
    }

    #[test]
    fn test_unmet_expectation_does_not_fail_test() {
        let test_case = TestCase {
            expected_output: String::from("goodbye"),
            ..test_case("echo hello")
        };

        let result = TestResult::compare(
            &test_case,
            &exited("hello", "", 0),
            &exited("hello", "", 0),
        );

        assert!(!result.expected_output_match);
        assert!(result.is_success());
    }

    #[test]
    fn test_launch_failure_compares_as_sentinel_code() {
        let failed = ShellOutput::new("", "failed to start shell", ShellStatus::LaunchFailed);

        let result = TestResult::compare(&test_case("true"), &exited("", "", 0), &failed);

        assert_eq!(result.implementation_code, LAUNCH_FAILURE_EXIT_CODE);
        assert!(!result.error_match);
        assert!(!result.return_code_match);
    }

    #[test]
    fn test_serializes_with_report_field_names() {
        let result = TestResult::compare(
            &test_case("echo hello"),
            &exited("hello", "", 0),
            &exited("hello", "", 0),
        );

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["bash_output"], "hello");
        assert_eq!(json["minishell_return_code"], 0);
        assert_eq!(json["expected_code_match"], true);
        assert!(json.get("expected").is_none());
    }
}
