//! Multiple-choice evaluation
//!
//! Runs a [`ChoiceModel`] over held-out datasets and scores its predictions.
//!
//! ## Architecture
//!
//! - `batch` / `dataset`: batches with per-example uids, ordered example mappings
//! - `input_mode`: assembles the model's positional inputs for one batch
//! - `dispatch`: chunked model invocation, logit masking and segment sums
//! - `inference`: one pass over one dataset, results keyed by uid
//! - `harness`: [`MultiChoiceEvaluator`], sample-weighted aggregation
//! - `metrics` / `classification`: accuracy, F1, confusion matrices
//! - `report` / `output`: summaries and prediction dumps
//!
//! ## Example
//!
//! ```ignore
//! use evaluar::eval::{EvalDataset, InputMode, MetricSet, MultiChoiceEvaluator};
//!
//! let evaluator: MultiChoiceEvaluator<MyExample> =
//!     MultiChoiceEvaluator::new("copa", InputMode::Cloze { continuous_prompt: false }, MetricSet::default());
//! let datasets = vec![EvalDataset::new("dev", dev_batches).with_examples(dev_examples)];
//! let scores = evaluator.evaluate(&mut model, &datasets, epoch)?;
//! ```

mod batch;
pub mod classification;
mod dataset;
mod dispatch;
mod harness;
mod inference;
mod input_mode;
pub mod metrics;
mod model;
mod output;
mod report;


pub use batch::{Batch, DecoderInputs, Uid};
pub use classification::{classification_report, confusion_matrix, Average, ClassStats, ConfusionMatrix, MultiClassMetrics, Prf};
pub use dataset::{BatchSource, EvalDataset, ExampleMap};
pub use dispatch::{argmax_rows, chunked_forward, postprocess_logits, segment_sum, PredictionRemap, DEFAULT_CHUNK_SIZE};
pub use harness::MultiChoiceEvaluator;
pub use inference::{run_inference, InferenceOutput, InferenceSettings};
pub use input_mode::InputMode;
pub use metrics::{accuracy_metric, f1_macro_metric, f1_metric, MetricFn, MetricSet, BUILTIN_METRICS};
pub use model::{ChoiceModel, EvalModeGuard, ModelOutput};
pub use output::{JsonlPredictionWriter, PredictionWriter, TokenDecoder};
pub use report::{DatasetSummary, EvalReport, OverallSummary, ScoreAccumulator, ScoreDict};
