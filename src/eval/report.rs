//! Score aggregation and human-readable summaries

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Ordered metric name → score mapping
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoreDict {
    scores: Vec<(String, f64)>,
}

impl ScoreDict {
    /// Score of a metric, if present
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.scores.iter().find(|(name, _)| name == metric).map(|(_, score)| *score)
    }

    /// Iterate `(name, score)` in metric order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(name, score)| (name.as_str(), *score))
    }

    /// Number of metrics
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether there are no metrics
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl From<Vec<(String, f64)>> for ScoreDict {
    fn from(scores: Vec<(String, f64)>) -> Self {
        Self { scores }
    }
}

/// Sample-weighted running average of metric scores across datasets.
///
/// Each dataset contributes `score * n` to the running sum, so larger
/// datasets weigh proportionally more in the final score.
#[derive(Clone, Debug)]
pub struct ScoreAccumulator {
    sums: Vec<(String, f64)>,
    total: usize,
    datasets: usize,
}

impl ScoreAccumulator {
    /// Start with a zero sum for each metric name
    pub fn new<'a>(metrics: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            sums: metrics.into_iter().map(|name| (name.to_string(), 0.0)).collect(),
            total: 0,
            datasets: 0,
        }
    }

    /// Add one dataset's scores computed over `count` examples
    pub fn add(&mut self, scores: &[(String, f64)], count: usize) {
        for (name, sum) in &mut self.sums {
            if let Some((_, score)) = scores.iter().find(|(n, _)| n == name) {
                *sum += score * count as f64;
            }
        }
        self.total += count;
        self.datasets += 1;
    }

    /// Total number of examples seen
    pub fn total(&self) -> usize {
        self.total
    }

    /// Divide each running sum by the total example count
    pub fn finalize(self) -> Result<ScoreDict> {
        if self.total == 0 {
            return Err(Error::NoExamples { datasets: self.datasets });
        }
        let total = self.total as f64;
        Ok(self.sums.into_iter().map(|(name, sum)| (name, sum / total)).collect::<Vec<_>>().into())
    }
}

/// Scores of one dataset
#[derive(Clone, Debug, Serialize)]
pub struct DatasetSummary {
    /// Epoch the evaluation ran at
    pub epoch: i64,
    /// Dataset name
    pub name: String,
    /// Number of evaluated examples
    pub total: usize,
    /// Per-metric scores
    pub scores: Vec<(String, f64)>,
    /// Wall time of the inference pass
    pub elapsed: Duration,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch: {}| metrics for {}: total {}", self.epoch, self.name, self.total)?;
        for (metric, value) in &self.scores {
            write!(f, " {metric}={value:.4}%")?;
        }
        write!(f, " elapsed time (sec): {:.3}", self.elapsed.as_secs_f64())
    }
}

/// Weighted scores across all datasets
#[derive(Clone, Debug, Serialize)]
pub struct OverallSummary {
    /// Epoch the evaluation ran at
    pub epoch: i64,
    /// Total evaluated examples
    pub total: usize,
    /// Aggregated scores
    pub scores: ScoreDict,
}

impl fmt::Display for OverallSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch: {}| overall: total = {}", self.epoch, self.total)?;
        for (metric, value) in self.scores.iter() {
            write!(f, " {metric}={value:.4}")?;
        }
        Ok(())
    }
}

/// Everything an evaluation call produced
#[derive(Clone, Debug, Serialize)]
pub struct EvalReport {
    /// One summary per dataset, in evaluation order
    pub datasets: Vec<DatasetSummary>,
    /// Weighted aggregate
    pub overall: OverallSummary,
}

impl EvalReport {
    /// The aggregated scores
    pub fn scores(&self) -> &ScoreDict {
        &self.overall.scores
    }
}
