//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// Evaluar: multiple-choice evaluation harness
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "evaluar")]
#[command(version)]
#[command(about = "Multiple-choice evaluation with sample-weighted metric aggregation")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate an evaluation config
    Validate(ValidateArgs),

    /// Display the resolved evaluation settings
    Info(InfoArgs),

    /// Score prediction files and aggregate across them
    Score(ScoreArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Resolve test datapaths instead of validation ones
    #[arg(long)]
    pub test: bool,

    /// Output format (text, json, yaml)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the score command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ScoreArgs {
    /// JSONL files of `{"uid", "prediction", "label"}` records, one per dataset
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Metric to compute (repeatable)
    #[arg(short, long = "metric", default_value = "accuracy")]
    pub metrics: Vec<String>,

    /// Epoch reported in summaries
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    pub epoch: i64,

    /// Print a per-class classification report for each file
    #[arg(long)]
    pub report: bool,

    /// Output format (text, json, yaml)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
