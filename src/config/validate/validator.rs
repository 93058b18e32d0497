//! Configuration validation logic

use super::error::ValidationError;
use crate::config::schema::{EvalSpec, InputModeKind};
use crate::eval::BUILTIN_METRICS;

/// Validate an evaluation specification
///
/// Checks:
/// - Task name is present
/// - Chunk and batch sizes are positive
/// - Every metric is a known builtin
/// - `continuous_prompt` only appears with cloze inputs
pub fn validate_spec(spec: &EvalSpec) -> Result<(), ValidationError> {
    if spec.task.trim().is_empty() {
        return Err(ValidationError::EmptyTask);
    }

    if spec.chunk_size == 0 {
        return Err(ValidationError::InvalidChunkSize(spec.chunk_size));
    }

    if spec.eval_batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(spec.eval_batch_size));
    }

    let known = BUILTIN_METRICS.join(", ");
    if spec.metrics.is_empty() {
        return Err(ValidationError::NoMetrics(known));
    }
    if let Some(unknown) = spec
        .metrics
        .iter()
        .find(|name| !BUILTIN_METRICS.contains(&name.as_str()))
    {
        return Err(ValidationError::UnknownMetric(unknown.clone(), known));
    }

    if spec.continuous_prompt && spec.input_mode != InputModeKind::Cloze {
        return Err(ValidationError::ContinuousPromptOutsideCloze(
            spec.input_mode().name().to_string(),
        ));
    }

    Ok(())
}
