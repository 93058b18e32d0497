//! Evaluar CLI
//!
//! # Usage
//!
//! ```bash
//! # Validate an evaluation config
//! evaluar validate eval.yaml --detailed
//!
//! # Show resolved settings for a test run
//! evaluar info eval.yaml --test
//!
//! # Score prediction dumps across datasets
//! evaluar score runs/dev.jsonl runs/test.jsonl --metric accuracy --metric f1_macro
//! ```

use clap::Parser;
use evaluar::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(LogLevel::from_flags(cli.verbose, cli.quiet).filter())
        .parse_default_env()
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
