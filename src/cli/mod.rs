//! CLI module for evaluar
//!
//! This module contains all CLI command handlers and utilities.

mod commands;
mod logging;

pub use commands::{run_command, score_files, ScoredRecord};
pub use logging::LogLevel;

// Re-export Cli from config for convenience
pub use crate::config::Cli;
