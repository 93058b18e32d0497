//! CLI command implementations

mod info;
mod score;
mod validate;


use crate::cli::LogLevel;
use crate::config::{Cli, Command};

pub use score::{score_files, ScoredRecord};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Info(args) => info::run_info(args, log_level),
        Command::Score(args) => score::run_score(args, log_level),
    }
}
