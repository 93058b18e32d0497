//! One evaluation pass over one dataset

use super::batch::Uid;
use super::dataset::EvalDataset;
use super::dispatch::{argmax_rows, chunked_forward, postprocess_logits, PredictionRemap};
use super::input_mode::InputMode;
use super::model::{ChoiceModel, EvalModeGuard};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Per-run inference settings, fixed at configuration time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InferenceSettings {
    /// How batches become model inputs
    pub mode: InputMode,
    /// Maximum choices per model invocation
    pub chunk_size: usize,
    /// Task-specific prediction remap
    pub remap: PredictionRemap,
}

/// Predictions, labels and examples of one dataset, in the order of the
/// dataset's example mapping
#[derive(Debug)]
pub struct InferenceOutput<'d, E> {
    /// Predicted choice per example
    pub predictions: Vec<usize>,
    /// Gold label per example
    pub labels: Vec<usize>,
    /// Example metadata; empty when the dataset has no example mapping
    pub examples: Vec<&'d E>,
}

impl<E> InferenceOutput<'_, E> {
    /// Number of evaluated examples
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    /// Whether no example was evaluated
    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// uid → (prediction, label) for a single pass. Last write wins.
#[derive(Default)]
struct ResultStore {
    index: HashMap<Uid, usize>,
    entries: Vec<(Uid, usize, usize)>,
}

impl ResultStore {
    fn record(&mut self, uid: Uid, prediction: usize, label: usize) {
        match self.index.get(&uid) {
            Some(&slot) => {
                log::warn!("uid {uid} evaluated more than once; keeping the last result");
                self.entries[slot] = (uid, prediction, label);
            }
            None => {
                self.index.insert(uid.clone(), self.entries.len());
                self.entries.push((uid, prediction, label));
            }
        }
    }

    fn get(&self, uid: &Uid) -> Option<(usize, usize)> {
        self.index.get(uid).map(|&slot| {
            let (_, prediction, label) = &self.entries[slot];
            (*prediction, *label)
        })
    }
}

/// Run the model over every batch of `dataset` and collect predictions.
///
/// The model is held in evaluation mode for the duration of the pass and its
/// previous mode is restored afterwards, also on error. Results are drained
/// in the order of the dataset's example mapping; a uid in the mapping that
/// no batch produced is an error.
pub fn run_inference<'d, M, E>(
    model: &mut M,
    dataset: &'d EvalDataset<'_, E>,
    settings: &InferenceSettings,
) -> Result<InferenceOutput<'d, E>>
where
    M: ChoiceModel + ?Sized,
{
    let mut store = ResultStore::default();
    {
        let mut model = EvalModeGuard::new(model);
        for batch in dataset.loader().batches() {
            let batch = batch?;
            batch.validate()?;

            let inputs = settings.mode.assemble(&batch)?;
            let logits = chunked_forward(&mut *model, settings.mode, &inputs, settings.chunk_size)?;
            if logits.nrows() != batch.size() {
                return Err(Error::shape(
                    "model logits",
                    &[batch.size(), logits.ncols()],
                    logits.shape(),
                ));
            }
            let logits = postprocess_logits(logits, &batch)?;

            let predicted = argmax_rows(&logits);
            for ((uid, prediction), &label) in
                batch.uids.into_iter().zip(predicted).zip(batch.labels.iter())
            {
                store.record(uid, settings.remap.apply(prediction), label);
            }
        }
    }

    let mut output = InferenceOutput { predictions: Vec::new(), labels: Vec::new(), examples: Vec::new() };
    match dataset.examples() {
        Some(examples) => {
            for (uid, example) in examples.iter() {
                let (prediction, label) = store.get(uid).ok_or_else(|| Error::MissingUid {
                    dataset: dataset.name().to_string(),
                    uid: uid.to_string(),
                })?;
                output.predictions.push(prediction);
                output.labels.push(label);
                output.examples.push(example);
            }
        }
        None => {
            for (_, prediction, label) in store.entries {
                output.predictions.push(prediction);
                output.labels.push(label);
            }
        }
    }
    Ok(output)
}
