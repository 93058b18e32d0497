//! Precision, recall and F1 per class and averaged

use super::confusion::ConfusionMatrix;
use serde::{Deserialize, Serialize};

/// How per-class scores are combined
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Average {
    /// Unweighted mean over occurring classes
    Macro,
    /// Scores of the pooled true/false positive and false negative counts
    Micro,
    /// Mean weighted by each class's support
    Weighted,
}

/// A precision / recall / F1 triple
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Prf {
    /// tp / (tp + fp)
    pub precision: f64,
    /// tp / (tp + fn)
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1: f64,
}

impl Prf {
    /// Scores from raw counts; undefined ratios are 0
    pub fn from_counts(tp: usize, fp: usize, fn_: usize) -> Self {
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 { 2.0 * precision * recall / (precision + recall) } else { 0.0 };
        Self { precision, recall, f1 }
    }
}

/// Scores of one class
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClassStats {
    /// Class index
    pub class: usize,
    /// Precision, recall and F1 with this class as positive
    pub scores: Prf,
    /// Gold examples of this class
    pub support: usize,
}

/// Per-class scores for the classes that occur in predictions or labels
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MultiClassMetrics {
    classes: Vec<ClassStats>,
    pooled: Prf,
}

impl MultiClassMetrics {
    /// Derive per-class and pooled scores from a confusion matrix
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let hits = cm.hits();
        let labels = cm.label_totals();
        let predicted = cm.prediction_totals();

        let classes: Vec<ClassStats> = cm
            .occurring_classes()
            .into_iter()
            .map(|class| {
                let tp = hits[class];
                ClassStats {
                    class,
                    scores: Prf::from_counts(tp, predicted[class] - tp, labels[class] - tp),
                    support: labels[class],
                }
            })
            .collect();

        // every miss is one false positive and one false negative
        let correct = hits.sum();
        let missed = cm.total() - correct;
        Self { classes, pooled: Prf::from_counts(correct, missed, missed) }
    }

    /// Build the confusion matrix for `predictions` against `labels` and score it
    pub fn from_predictions(predictions: &[usize], labels: &[usize]) -> Self {
        Self::from_confusion(&ConfusionMatrix::from_labels(predictions, labels))
    }

    /// Occurring classes in ascending order
    pub fn classes(&self) -> &[ClassStats] {
        &self.classes
    }

    /// Scores of `class`, if it occurs
    pub fn class(&self, class: usize) -> Option<&ClassStats> {
        self.classes.iter().find(|stats| stats.class == class)
    }

    /// F1 with `class` as the positive label; 0 if the class never occurs
    pub fn f1_for(&self, class: usize) -> f64 {
        self.class(class).map_or(0.0, |stats| stats.scores.f1)
    }

    /// Combine the per-class scores.
    ///
    /// Macro weighs every class equally, weighted uses class support, and
    /// micro pools all counts (equal to accuracy for single-label data).
    pub fn average(&self, average: Average) -> Prf {
        match average {
            Average::Micro => self.pooled,
            Average::Macro => self.mean_by(|_| 1.0),
            Average::Weighted => self.mean_by(|stats| stats.support as f64),
        }
    }

    /// F1 under the given averaging
    pub fn f1_avg(&self, average: Average) -> f64 {
        self.average(average).f1
    }

    fn mean_by(&self, weight: impl Fn(&ClassStats) -> f64) -> Prf {
        let total: f64 = self.classes.iter().map(&weight).sum();
        if total == 0.0 {
            return Prf::default();
        }
        let sum = |pick: fn(&Prf) -> f64| {
            self.classes.iter().map(|stats| pick(&stats.scores) * weight(stats)).sum::<f64>() / total
        };
        Prf { precision: sum(|p| p.precision), recall: sum(|p| p.recall), f1: sum(|p| p.f1) }
    }
}
