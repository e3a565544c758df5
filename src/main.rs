mod cli;

use cli::error::HarnessError;
use minishell_tester::report;
use minishell_tester::shell::{Shell, ShellRole};
use minishell_tester::test_case;
use minishell_tester::test_runner::{self, RunConfig, RunSummary};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = cli::parse();

    init_logging(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Some(cli::Command::Echo { n: _ }) = &args.command {
        println!("echo called");
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(summary) => {
            if args.fail_on_mismatch && summary.failed() > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            cli::report::print_fatal_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &cli::Args) -> Result<RunSummary, HarnessError> {
    let test_cases = test_case::load_test_cases(&args.tests)?;

    let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let reference = Shell::locate(ShellRole::Reference, &args.bash, &current_dir)?;
    let implementation =
        Shell::locate(ShellRole::Implementation, &args.minishell, &current_dir)?;

    let config = RunConfig {
        reference,
        implementation,
        timeout: args.timeout,
        format: args.output_format.clone().into(),
    };

    let summary = test_runner::run_test_cases(&config, &test_cases);

    if let Some(output) = &args.output {
        report::write_report(output, &summary)?;
        cli::report::print_report_saved(output);
    }

    Ok(summary)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
