//! Error types with actionable diagnostics.
//!
//! Every failure in the evaluation pipeline is fatal to the call that raised
//! it. Variants carry enough context to locate the offending dataset, batch
//! field or configuration value without re-running under a debugger.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for evaluar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating, scoring or transforming data.
#[derive(Error, Debug)]
pub enum Error {
    /// A tensor did not have the expected shape.
    #[error("Tensor shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { context: String, expected: Vec<usize>, actual: Vec<usize> },

    /// A batch is missing a field required by the configured input mode.
    #[error("Batch is missing field '{field}' required by {mode} input mode\n  → Check the data pipeline or the configured input_mode")]
    MissingField { field: &'static str, mode: &'static str },

    /// A uid in the dataset's example mapping was never produced by its loader.
    #[error("uid {uid} of dataset '{dataset}' was never evaluated\n  → The data loader and the dataset's example mapping are out of sync")]
    MissingUid { dataset: String, uid: String },

    /// A uid was inserted twice into an example mapping.
    #[error("Duplicate uid {uid} in example mapping")]
    DuplicateUid { uid: String },

    /// Prediction and label sequences differ in length.
    #[error("Predictions and labels must have same length: {predictions} vs {labels}")]
    LengthMismatch { predictions: usize, labels: usize },

    /// A metric name could not be resolved.
    #[error("Unknown metric: {0}\n  → Supported metrics: accuracy, f1, f1_macro")]
    UnknownMetric(String),

    /// A bounding-box format string is not supported.
    #[error("Unsupported box format: {0}\n  → Supported formats: xyxy, xywh, cxcywh")]
    UnsupportedBoxFormat(String),

    /// A bounding box is degenerate (x2 < x1 or y2 < y1).
    #[error("Degenerate box at index {index}: {coords:?}")]
    InvalidBox { index: usize, coords: [f32; 4] },

    /// Aggregation finished without seeing a single example.
    #[error("No examples were evaluated across {datasets} dataset(s)")]
    NoExamples { datasets: usize },

    /// A meter key was registered twice.
    #[error("Meter '{0}' is already registered")]
    DuplicateMeter(String),

    /// A meter key was recorded before being registered.
    #[error("Meter '{0}' is not registered")]
    UnknownMeter(String),

    /// Invalid parameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The model failed during a forward pass.
    #[error("Model forward pass failed: {0}")]
    Model(String),

    /// IO error with context.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create an IO error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Create a shape mismatch error.
    pub fn shape(context: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_uid_message_names_dataset() {
        let err = Error::MissingUid { dataset: "dev".into(), uid: "17".into() };
        let msg = err.to_string();
        assert!(msg.contains("dev"));
        assert!(msg.contains("17"));
    }

    #[test]
    fn test_shape_helper() {
        let err = Error::shape("logits", &[2, 3], &[2, 4]);
        assert!(matches!(err, Error::ShapeMismatch { ref expected, .. } if expected == &[2, 3]));
    }
}
