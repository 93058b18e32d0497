//! Writing per-dataset predictions to disk

use crate::error::{Error, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Turns token ids back into text for prediction dumps.
///
/// The evaluator only forwards its handle to the [`PredictionWriter`]; custom
/// writers that dump decoded inputs use it. [`JsonlPredictionWriter`]
/// serializes examples as they are and does not decode.
pub trait TokenDecoder {
    /// Decode a sequence of token ids
    fn decode(&self, ids: &[i64]) -> String;
}

/// Callback that persists one dataset's predictions.
///
/// The evaluator decides the destination (`<log_dir>/<dataset>.jsonl`); the
/// serialization format is up to the implementation.
pub trait PredictionWriter<E> {
    /// Write predictions and their examples to `destination`
    fn write(
        &mut self,
        predictions: &[usize],
        examples: &[&E],
        destination: &Path,
        tokenizer: Option<&dyn TokenDecoder>,
    ) -> Result<()>;
}

#[derive(Serialize)]
struct PredictionRecord<'a, E> {
    prediction: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<&'a E>,
}

/// Writes one JSON object per line: `{"prediction": p, "example": {...}}`.
///
/// Examples are written through their `Serialize` impl; the tokenizer handle
/// is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonlPredictionWriter;

impl<E: Serialize> PredictionWriter<E> for JsonlPredictionWriter {
    fn write(
        &mut self,
        predictions: &[usize],
        examples: &[&E],
        destination: &Path,
        _tokenizer: Option<&dyn TokenDecoder>,
    ) -> Result<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let file = File::create(destination).map_err(|e| Error::io(destination, e))?;
        let mut out = BufWriter::new(file);

        for (i, &prediction) in predictions.iter().enumerate() {
            let record = PredictionRecord { prediction, example: examples.get(i).copied() };
            serde_json::to_writer(&mut out, &record)?;
            out.write_all(b"\n").map_err(|e| Error::io(destination, e))?;
        }
        out.flush().map_err(|e| Error::io(destination, e))?;

        log::info!("wrote {} predictions to {}", predictions.len(), destination.display());
        Ok(())
    }
}
