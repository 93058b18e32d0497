//! Declarative evaluation configuration
//!
//! YAML specs, validation, and command-line arguments.

mod cli;
mod loader;
mod schema;
mod validate;

pub use cli::{parse_args, Cli, Command, InfoArgs, OutputFormat, ScoreArgs, ValidateArgs};
pub use loader::load_config;
pub use schema::{EvalSpec, InputModeKind};
pub use validate::{validate_spec, ValidationError};
