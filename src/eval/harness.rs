//! Multiple-choice evaluator with sample-weighted aggregation

use super::dataset::EvalDataset;
use super::dispatch::{PredictionRemap, DEFAULT_CHUNK_SIZE};
use super::inference::{run_inference, InferenceSettings};
use super::input_mode::InputMode;
use super::metrics::MetricSet;
use super::model::ChoiceModel;
use super::output::{PredictionWriter, TokenDecoder};
use super::report::{DatasetSummary, EvalReport, OverallSummary, ScoreAccumulator, ScoreDict};
use crate::config::EvalSpec;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Evaluates a [`ChoiceModel`] over one or more held-out datasets.
///
/// Scores are computed per dataset and combined as a sample-weighted average:
/// a dataset with ten times the examples has ten times the influence.
///
/// # Example
///
/// ```ignore
/// use evaluar::eval::{InputMode, MetricSet, MultiChoiceEvaluator};
///
/// let evaluator = MultiChoiceEvaluator::new("copa", InputMode::Cloze { continuous_prompt: false },
///     MetricSet::from_names(&["accuracy"])?);
/// let scores = evaluator.evaluate(&mut model, &datasets, epoch)?;
/// println!("accuracy: {:.2}", scores.get("accuracy").unwrap_or_default());
/// ```
pub struct MultiChoiceEvaluator<E> {
    settings: InferenceSettings,
    metrics: MetricSet<E>,
    log_dir: PathBuf,
    output_predictions: bool,
    tokenizer: Option<Arc<dyn TokenDecoder>>,
}

impl<E> MultiChoiceEvaluator<E> {
    /// Create an evaluator for `task` with the given input mode and metrics
    pub fn new(task: &str, mode: InputMode, metrics: MetricSet<E>) -> Self {
        Self {
            settings: InferenceSettings {
                mode,
                chunk_size: DEFAULT_CHUNK_SIZE,
                remap: PredictionRemap::for_task(task),
            },
            metrics,
            log_dir: PathBuf::from("."),
            output_predictions: true,
            tokenizer: None,
        }
    }

    /// Build an evaluator from a validated evaluation spec
    pub fn from_spec(spec: &EvalSpec) -> Result<Self>
    where
        E: 'static,
    {
        let metrics = MetricSet::from_names(spec.metrics.as_slice())?;
        Ok(Self::new(&spec.task, spec.input_mode(), metrics)
            .with_chunk_size(spec.chunk_size)
            .with_log_dir(&spec.log_dir)
            .with_output_predictions(spec.output_predictions))
    }

    /// Override the maximum number of choices per model invocation
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.settings.chunk_size = chunk_size;
        self
    }

    /// Directory that prediction files are written to
    pub fn with_log_dir(mut self, log_dir: impl AsRef<Path>) -> Self {
        self.log_dir = log_dir.as_ref().to_path_buf();
        self
    }

    /// Whether a supplied [`PredictionWriter`] is invoked.
    ///
    /// Defaults to `true`; [`from_spec`](Self::from_spec) takes the value from
    /// `output_predictions`.
    pub fn with_output_predictions(mut self, enabled: bool) -> Self {
        self.output_predictions = enabled;
        self
    }

    /// Whether predictions are written when a writer is supplied
    pub fn output_predictions(&self) -> bool {
        self.output_predictions
    }

    /// Tokenizer handed to prediction writers
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn TokenDecoder>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Inference settings in effect
    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    /// Metrics computed per dataset
    pub fn metrics(&self) -> &MetricSet<E> {
        &self.metrics
    }

    /// Evaluate and return the weighted per-metric scores
    pub fn evaluate<M>(&self, model: &mut M, datasets: &[EvalDataset<'_, E>], epoch: i64) -> Result<ScoreDict>
    where
        M: ChoiceModel + ?Sized,
    {
        Ok(self.evaluate_with_report(model, datasets, epoch, None)?.overall.scores)
    }

    /// Evaluate and write each dataset's predictions with `writer`.
    ///
    /// The writer is skipped when prediction output is disabled.
    pub fn evaluate_with_output<M>(
        &self,
        model: &mut M,
        datasets: &[EvalDataset<'_, E>],
        epoch: i64,
        writer: &mut dyn PredictionWriter<E>,
    ) -> Result<ScoreDict>
    where
        M: ChoiceModel + ?Sized,
    {
        Ok(self.evaluate_with_report(model, datasets, epoch, Some(writer))?.overall.scores)
    }

    /// Evaluate every dataset in order and return per-dataset and overall
    /// summaries.
    ///
    /// A failure in any dataset aborts the whole call.
    pub fn evaluate_with_report<M>(
        &self,
        model: &mut M,
        datasets: &[EvalDataset<'_, E>],
        epoch: i64,
        mut writer: Option<&mut dyn PredictionWriter<E>>,
    ) -> Result<EvalReport>
    where
        M: ChoiceModel + ?Sized,
    {
        if !self.output_predictions && writer.is_some() {
            log::debug!("prediction output disabled, ignoring writer");
            writer = None;
        }
        let mut accumulator = ScoreAccumulator::new(self.metrics.names());
        let mut summaries = Vec::with_capacity(datasets.len());

        for dataset in datasets {
            let start = Instant::now();
            let output = run_inference(model, dataset, &self.settings)?;
            let elapsed = start.elapsed();

            if let Some(writer) = writer.as_deref_mut() {
                let destination = self.log_dir.join(format!("{}.jsonl", dataset.name()));
                writer.write(&output.predictions, &output.examples, &destination, self.tokenizer.as_deref())?;
            }

            let scores = self.metrics.compute(&output.predictions, &output.labels, &output.examples)?;
            accumulator.add(&scores, output.len());

            let summary = DatasetSummary {
                epoch,
                name: dataset.name().to_string(),
                total: output.len(),
                scores,
                elapsed,
            };
            if datasets.len() > 1 {
                log::info!("{summary}");
            }
            summaries.push(summary);
        }

        let total = accumulator.total();
        let scores = accumulator.finalize()?;
        let overall = OverallSummary { epoch, total, scores };
        log::info!("{overall}");

        Ok(EvalReport { datasets: summaries, overall })
    }
}
