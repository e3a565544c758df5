use minishell_tester::report::ReportError;
use minishell_tester::shell::ConfigError;
use minishell_tester::test_case::LoadError;

/// Errors that end the run with a non-zero exit status
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl HarnessError {
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Load(_) => "Error loading test cases",
            Self::Config(_) => "Error locating shells",
            Self::Report(_) => "Error saving test results",
        }
    }
}
