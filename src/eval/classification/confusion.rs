//! Label-by-prediction count matrix

use ndarray::{Array1, Array2, Axis};
use std::fmt;

/// `counts[[label, prediction]]` is the number of examples with gold `label`
/// that were predicted as `prediction`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    /// Tally paired predictions and labels.
    ///
    /// The matrix is square with one row per class up to the largest index
    /// seen on either side. Unpaired trailing entries are ignored.
    pub fn from_labels(predictions: &[usize], labels: &[usize]) -> Self {
        let size = predictions.iter().chain(labels).max().map_or(0, |&m| m + 1);
        let mut counts = Array2::zeros((size, size));
        for (&prediction, &label) in predictions.iter().zip(labels) {
            counts[[label, prediction]] += 1;
        }
        Self { counts }
    }

    /// Side length: one more than the largest class seen
    pub fn num_classes(&self) -> usize {
        self.counts.nrows()
    }

    /// Examples with gold `label` that were predicted as `prediction`
    pub fn count(&self, label: usize, prediction: usize) -> usize {
        self.counts[[label, prediction]]
    }

    /// Gold examples per class (support)
    pub fn label_totals(&self) -> Array1<usize> {
        self.counts.sum_axis(Axis(1))
    }

    /// Predictions per class
    pub fn prediction_totals(&self) -> Array1<usize> {
        self.counts.sum_axis(Axis(0))
    }

    /// Correct predictions per class
    pub fn hits(&self) -> Array1<usize> {
        self.counts.diag().to_owned()
    }

    /// Classes that occur as a label or as a prediction
    pub fn occurring_classes(&self) -> Vec<usize> {
        let labels = self.label_totals();
        let predicted = self.prediction_totals();
        (0..self.num_classes()).filter(|&c| labels[c] + predicted[c] > 0).collect()
    }

    /// Number of scored examples
    pub fn total(&self) -> usize {
        self.counts.sum()
    }

    /// Share of examples on the diagonal, in `[0, 1]`; 0 when empty
    pub fn accuracy(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.counts.diag().sum() as f64 / total as f64,
        }
    }
}

/// Shorthand for [`ConfusionMatrix::from_labels`]
///
/// ```
/// use evaluar::eval::confusion_matrix;
///
/// let cm = confusion_matrix(&[0, 1, 1, 2, 0], &[0, 1, 0, 2, 1]);
/// assert_eq!(cm.count(0, 1), 1);
/// assert_eq!(cm.count(1, 0), 1);
/// assert_eq!(cm.total(), 5);
/// ```
pub fn confusion_matrix(predictions: &[usize], labels: &[usize]) -> ConfusionMatrix {
    ConfusionMatrix::from_labels(predictions, labels)
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "label")?;
        for prediction in 0..self.num_classes() {
            write!(f, "{:>8}", format!("pred {prediction}"))?;
        }
        for (label, row) in self.counts.axis_iter(Axis(0)).enumerate() {
            write!(f, "\n{label:>8}")?;
            for count in row {
                write!(f, "{count:>8}")?;
            }
        }
        Ok(())
    }
}
