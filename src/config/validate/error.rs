//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("Task name must not be empty")]
    EmptyTask,

    #[error("Invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("No metrics configured (need at least one of: {0})")]
    NoMetrics(String),

    #[error("Unknown metric: {0} (must be one of: {1})")]
    UnknownMetric(String, String),

    #[error("continuous_prompt is only valid with input_mode: cloze (got {0})")]
    ContinuousPromptOutsideCloze(String),
}
