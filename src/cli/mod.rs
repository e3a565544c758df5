pub mod error;
pub mod report;

use clap::{Parser, Subcommand};
use minishell_tester::test_runner::ReportFormat;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub fn parse() -> Args {
    Args::parse()
}

/// Differential tester running the same commands through bash and minishell
#[derive(Parser)]
#[clap(bin_name = "minishell-tester")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to Bash executable
    #[arg(long, default_value = "/bin/bash", env = "MINISHELL_TESTER_BASH")]
    pub bash: String,

    /// Path to Minishell executable
    #[arg(long, default_value = "./minishell", env = "MINISHELL_TESTER_MINISHELL")]
    pub minishell: String,

    /// Path to test cases file (JSON, or TOML when ending in .toml)
    #[arg(long, default_value = "test_cases.json", env = "MINISHELL_TESTER_TESTS")]
    pub tests: PathBuf,

    /// Path to save test results JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Options: summary, tap
    #[arg(long, default_value = "summary")]
    pub output_format: OutputFormat,

    /// Kill a shell still running after this many seconds
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Disable colored diffs
    #[arg(long)]
    pub no_color: bool,

    /// Log every shell invocation and comparison
    #[arg(long)]
    pub verbose: bool,

    /// Exit with a non-zero status when any test fails
    #[arg(long)]
    pub fail_on_mismatch: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run just echo tests
    Echo {
        /// Only tests for '-n'
        #[arg(long)]
        n: Option<String>,
    },
}

#[derive(Clone)]
pub enum OutputFormat {
    Summary,
    Tap,
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "summary" => Ok(Self::Summary),
            "tap" => Ok(Self::Tap),
            _ => Err("Invalid output format"),
        }
    }
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => ReportFormat::Summary,
            OutputFormat::Tap => ReportFormat::Tap,
        }
    }
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let seconds: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;

    if seconds.is_finite() && seconds > 0.0 {
        Ok(Duration::from_secs_f64(seconds))
    } else {
        Err(String::from("Timeout must be a positive number of seconds"))
    }
}
