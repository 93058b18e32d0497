//! Chunked model dispatch and logit post-processing
//!
//! Large choice dimensions are split into fixed-size chunks so a single model
//! invocation never sees more than `chunk_size` choices. Logits are
//! concatenated back in chunk order, so the result is identical to an
//! unchunked call for any model that scores choices independently.

use super::batch::Batch;
use super::input_mode::InputMode;
use super::model::ChoiceModel;
use crate::error::{Error, Result};
use ndarray::{concatenate, Array2, ArrayD, Axis, Slice};

/// Default number of choices per model invocation
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Penalty subtracted from masked-out logits
const MASK_PENALTY: f32 = 10_000.0;

/// Task-specific mapping from predicted choice index to label space
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictionRemap {
    /// Predictions are labels
    Identity,
    /// Binary flip: 0 becomes 1, anything else becomes 0
    InvertBinary,
}

impl PredictionRemap {
    /// Select the remap for a task identifier (`wsc` is inverted)
    pub fn for_task(task: &str) -> Self {
        if task.eq_ignore_ascii_case("wsc") {
            Self::InvertBinary
        } else {
            Self::Identity
        }
    }

    /// Apply the remap to one prediction
    pub fn apply(&self, prediction: usize) -> usize {
        match self {
            Self::Identity => prediction,
            Self::InvertBinary => usize::from(prediction == 0),
        }
    }
}

/// Run the model over `inputs`, chunking the choice dimension when needed.
pub fn chunked_forward<M: ChoiceModel + ?Sized>(
    model: &mut M,
    mode: InputMode,
    inputs: &[ArrayD<i64>],
    chunk_size: usize,
) -> Result<Array2<f32>> {
    if chunk_size == 0 {
        return Err(Error::InvalidParameter("chunk_size must be > 0".into()));
    }
    let primary = inputs
        .first()
        .ok_or_else(|| Error::InvalidParameter("model inputs must not be empty".into()))?;

    if let Some(fixed) = mode.encoder_inputs() {
        let decoder = inputs
            .get(fixed)
            .ok_or_else(|| Error::shape("fast-decode inputs", &[fixed + 1], &[inputs.len()]))?;
        let num_choices = choice_dim(decoder, "decoder text")?;
        return forward_in_chunks(model, inputs, fixed, num_choices, chunk_size);
    }

    if primary.ndim() == 3 && primary.shape()[1] > chunk_size {
        let num_choices = primary.shape()[1];
        return forward_in_chunks(model, inputs, 0, num_choices, chunk_size);
    }

    Ok(model.forward(inputs)?.logits)
}

/// Slice `inputs[fixed..]` along axis 1 into chunks, hold `inputs[..fixed]`
/// as they are, and concatenate the resulting logits along axis 1.
fn forward_in_chunks<M: ChoiceModel + ?Sized>(
    model: &mut M,
    inputs: &[ArrayD<i64>],
    fixed: usize,
    num_choices: usize,
    chunk_size: usize,
) -> Result<Array2<f32>> {
    for (i, input) in inputs.iter().enumerate().skip(fixed) {
        choice_dim(input, &format!("model input {i}"))?;
    }

    let num_chunks = num_choices.div_ceil(chunk_size).max(1);
    let mut chunks = Vec::with_capacity(num_chunks);
    for chunk in 0..num_chunks {
        let start = chunk * chunk_size;
        let end = (start + chunk_size).min(num_choices);
        let chunk_inputs: Vec<ArrayD<i64>> = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                if i < fixed {
                    input.clone()
                } else {
                    input.slice_axis(Axis(1), Slice::from(start..end)).to_owned()
                }
            })
            .collect();
        log::debug!("forward chunk {}/{} (choices {start}..{end})", chunk + 1, num_chunks);
        chunks.push(model.forward(&chunk_inputs)?.logits);
    }

    let views: Vec<_> = chunks.iter().map(|c| c.view()).collect();
    concatenate(Axis(1), &views).map_err(|e| Error::Model(format!("cannot concatenate chunk logits: {e}")))
}

fn choice_dim(input: &ArrayD<i64>, context: &str) -> Result<usize> {
    if input.ndim() < 2 {
        return Err(Error::ShapeMismatch {
            context: format!("{context} (needs a choice axis)"),
            expected: vec![input.shape().first().copied().unwrap_or(0), 1],
            actual: input.shape().to_vec(),
        });
    }
    Ok(input.shape()[1])
}

/// Apply segment grouping or soft masking from the batch to raw logits.
///
/// With `segment_id`, logits are optionally zeroed by `loss_mask` and then
/// summed per segment. With only `loss_mask`, masked choices are pushed to a
/// large negative value.
pub fn postprocess_logits(logits: Array2<f32>, batch: &Batch) -> Result<Array2<f32>> {
    match (&batch.segment_id, &batch.loss_mask) {
        (Some(segment_id), loss_mask) => {
            let logits = match loss_mask {
                Some(mask) => {
                    check_same_shape("loss_mask", &logits, mask.shape())?;
                    logits * mask
                }
                None => logits,
            };
            segment_sum(&logits, segment_id)
        }
        (None, Some(mask)) => {
            check_same_shape("loss_mask", &logits, mask.shape())?;
            Ok(&logits * mask - mask.mapv(|m| MASK_PENALTY * (1.0 - m)))
        }
        (None, None) => Ok(logits),
    }
}

fn check_same_shape(field: &str, logits: &Array2<f32>, shape: &[usize]) -> Result<()> {
    if logits.shape() != shape {
        return Err(Error::shape(field, logits.shape(), shape));
    }
    Ok(())
}

/// Sum logits within each segment along the choice axis.
///
/// The output has `max(segment_id) + 1` columns.
pub fn segment_sum(logits: &Array2<f32>, segment_id: &Array2<usize>) -> Result<Array2<f32>> {
    check_same_shape("segment_id", logits, segment_id.shape())?;
    let width = segment_id.iter().max().map_or(0, |&m| m + 1);
    let mut out = Array2::<f32>::zeros((logits.nrows(), width));
    for ((row, col), &value) in logits.indexed_iter() {
        out[[row, segment_id[[row, col]]]] += value;
    }
    Ok(out)
}

/// Index of the largest logit in each row; ties resolve to the first index.
pub fn argmax_rows(logits: &Array2<f32>) -> Vec<usize> {
    logits
        .rows()
        .into_iter()
        .map(|row| {
            let mut best = 0;
            for (i, &v) in row.iter().enumerate() {
                if v > row[best] {
                    best = i;
                }
            }
            best
        })
        .collect()
}
