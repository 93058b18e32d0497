//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! evaluar validate eval.yaml
//! evaluar info eval.yaml --test
//! evaluar score dev.jsonl test.jsonl --metric accuracy --metric f1_macro
//! ```

mod core;
mod types;

pub use self::core::{parse_args, Cli, Command, InfoArgs, ScoreArgs, ValidateArgs};
pub use types::OutputFormat;
