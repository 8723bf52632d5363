//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use args::{Cli, Commands};
use clap::Parser;
use std::process::ExitCode;

use detonate_core::Verdict;

/// Exit status for anything that is not a verdict.
pub const ERROR_EXIT: u8 = Verdict::Error.exit_code();

/// Run the CLI application.
pub async fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures.
            let code = if e.use_stderr() { ERROR_EXIT } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    crate::logging::init(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = commands::Context {
        config_path: cli.config,
        output_format: cli.format,
    };

    let result = match cli.command {
        Commands::Analyze(args) => return ExitCode::from(commands::analyze::execute(&ctx, args).await),
        Commands::Rules => commands::rules::execute(&ctx),
        Commands::Config => commands::config::execute(&ctx),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(ERROR_EXIT)
        }
    }
}
