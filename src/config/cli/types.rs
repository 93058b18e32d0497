//! CLI value enums

use clap::ValueEnum;

/// How `info` and `score` render their results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML document
    #[value(alias = "yml")]
    Yaml,
}
