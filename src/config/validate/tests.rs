//! Unit tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_spec;
use crate::config::schema::*;

fn create_valid_spec() -> EvalSpec {
    let mut spec = EvalSpec::new("copa");
    spec.metrics = vec!["accuracy".to_string(), "f1_macro".to_string()];
    spec
}

#[test]
fn test_valid_spec_passes() {
    assert!(validate_spec(&create_valid_spec()).is_ok());
}

#[test]
fn test_empty_task() {
    let mut spec = create_valid_spec();
    spec.task = "  ".to_string();
    assert_eq!(validate_spec(&spec), Err(ValidationError::EmptyTask));
}

#[test]
fn test_zero_chunk_size() {
    let mut spec = create_valid_spec();
    spec.chunk_size = 0;
    assert_eq!(validate_spec(&spec), Err(ValidationError::InvalidChunkSize(0)));
}

#[test]
fn test_zero_batch_size() {
    let mut spec = create_valid_spec();
    spec.eval_batch_size = 0;
    assert_eq!(validate_spec(&spec), Err(ValidationError::InvalidBatchSize(0)));
}

#[test]
fn test_no_metrics() {
    let mut spec = create_valid_spec();
    spec.metrics.clear();
    assert!(matches!(validate_spec(&spec), Err(ValidationError::NoMetrics(_))));
}

#[test]
fn test_unknown_metric() {
    let mut spec = create_valid_spec();
    spec.metrics.push("bleu".to_string());
    let err = validate_spec(&spec).unwrap_err();
    assert!(matches!(&err, ValidationError::UnknownMetric(name, _) if name == "bleu"));
    assert!(err.to_string().contains("accuracy, f1, f1_macro"));
}

#[test]
fn test_continuous_prompt_requires_cloze() {
    let mut spec = create_valid_spec();
    spec.continuous_prompt = true;
    assert!(validate_spec(&spec).is_ok());

    spec.input_mode = InputModeKind::Plain;
    assert_eq!(
        validate_spec(&spec),
        Err(ValidationError::ContinuousPromptOutsideCloze("plain".to_string()))
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ValidationError::InvalidChunkSize(0).to_string(),
        "Invalid chunk size: 0 (must be > 0)"
    );
}
