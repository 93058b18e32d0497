//! Evaluar: multiple-choice evaluation for language models
//!
//! Runs a model over held-out datasets of candidate-answer batches, picks the
//! highest-scoring choice per example, and reports metrics aggregated across
//! datasets with sample weighting.
//!
//! # Modules
//!
//! - [`eval`]: the evaluator, inference pass, metrics and reports
//! - [`config`]: YAML evaluation specs and CLI arguments
//! - [`classifier`]: encoder plus linear head usable as a pretrained-mode model
//! - [`geometry`]: bounding-box conversions, IoU and non-maximum suppression
//! - [`monitor`]: meters and a rank-aware metric logger
//! - [`cli`]: command handlers for the `evaluar` binary

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod eval;
pub mod geometry;
pub mod monitor;

pub use error::{Error, Result};
