//! Pluggable metric functions over (predictions, labels, examples)

use super::classification::{Average, MultiClassMetrics};
use crate::error::{Error, Result};

/// A metric over one dataset's predictions, labels and example metadata
pub type MetricFn<E> = Box<dyn Fn(&[usize], &[usize], &[&E]) -> Result<f64>>;

fn check_lengths(predictions: &[usize], labels: &[usize]) -> Result<()> {
    if predictions.len() != labels.len() {
        return Err(Error::LengthMismatch { predictions: predictions.len(), labels: labels.len() });
    }
    Ok(())
}

/// Percentage of exact matches. An empty input scores 0.0.
pub fn accuracy_metric<E>(predictions: &[usize], labels: &[usize], _examples: &[&E]) -> Result<f64> {
    check_lengths(predictions, labels)?;
    let correct = predictions.iter().zip(labels).filter(|(p, l)| p == l).count();
    Ok(correct as f64 * 100.0 / predictions.len().max(1) as f64)
}

/// Binary F1 with label 1 as the positive class.
///
/// Fails with [`Error::InvalidParameter`] when a prediction or label is
/// outside `{0, 1}`; multi-class targets should use [`f1_macro_metric`].
pub fn f1_metric<E>(predictions: &[usize], labels: &[usize], _examples: &[&E]) -> Result<f64> {
    check_lengths(predictions, labels)?;
    if let Some(class) = predictions.iter().chain(labels).find(|&&c| c > 1) {
        return Err(Error::InvalidParameter(format!("f1 is binary but found class {class}; use f1_macro")));
    }
    Ok(MultiClassMetrics::from_predictions(predictions, labels).f1_for(1))
}

/// Unweighted mean of per-class F1 over the classes that occur
pub fn f1_macro_metric<E>(predictions: &[usize], labels: &[usize], _examples: &[&E]) -> Result<f64> {
    check_lengths(predictions, labels)?;
    Ok(MultiClassMetrics::from_predictions(predictions, labels).f1_avg(Average::Macro))
}

/// Names accepted by [`MetricSet::from_names`]
pub const BUILTIN_METRICS: [&str; 3] = ["accuracy", "f1", "f1_macro"];

/// Ordered collection of named metric functions
pub struct MetricSet<E> {
    metrics: Vec<(String, MetricFn<E>)>,
}

impl<E> MetricSet<E> {
    /// Empty set
    pub fn new() -> Self {
        Self { metrics: Vec::new() }
    }

    /// Add a named metric
    pub fn with<F>(mut self, name: impl Into<String>, metric: F) -> Self
    where
        F: Fn(&[usize], &[usize], &[&E]) -> Result<f64> + 'static,
    {
        self.metrics.push((name.into(), Box::new(metric)));
        self
    }

    /// Resolve built-in metrics by name, keeping the given order
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self>
    where
        E: 'static,
    {
        let mut set = Self::new();
        for name in names {
            set = match name.as_ref() {
                "accuracy" => set.with("accuracy", accuracy_metric::<E>),
                "f1" => set.with("f1", f1_metric::<E>),
                "f1_macro" => set.with("f1_macro", f1_macro_metric::<E>),
                other => return Err(Error::UnknownMetric(other.to_string())),
            };
        }
        Ok(set)
    }

    /// Metric names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|(name, _)| name.as_str())
    }

    /// Number of metrics
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Compute every metric for one dataset
    pub fn compute(&self, predictions: &[usize], labels: &[usize], examples: &[&E]) -> Result<Vec<(String, f64)>> {
        self.metrics
            .iter()
            .map(|(name, metric)| Ok((name.clone(), metric(predictions, labels, examples)?)))
            .collect()
    }
}

impl<E: 'static> Default for MetricSet<E> {
    fn default() -> Self {
        Self::new().with("accuracy", accuracy_metric::<E>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const NONE: &[&()] = &[];

    #[test]
    fn test_accuracy() {
        let acc = accuracy_metric(&[0, 1, 1, 0], &[0, 1, 0, 0], NONE).unwrap();
        assert_abs_diff_eq!(acc, 75.0);
    }

    #[test]
    fn test_accuracy_empty_is_zero() {
        assert_eq!(accuracy_metric(&[], &[], NONE).unwrap(), 0.0);
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let err = accuracy_metric(&[0, 1], &[0], NONE).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { predictions: 2, labels: 1 }));
        assert!(f1_metric(&[0], &[], NONE).is_err());
        assert!(f1_macro_metric(&[], &[1], NONE).is_err());
    }

    #[test]
    fn test_f1_binary() {
        let f1 = f1_metric(&[1, 1, 0, 1, 0], &[1, 0, 1, 1, 0], NONE).unwrap();
        assert_abs_diff_eq!(f1, 2.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_f1_rejects_multiclass() {
        let err = f1_metric(&[0, 1, 2], &[2, 1, 0], NONE).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(ref msg) if msg.contains("f1_macro")));
        assert!(f1_metric(&[0, 1], &[0, 3], NONE).is_err());
    }

    #[test]
    fn test_f1_macro() {
        let f1 = f1_macro_metric(&[0, 1, 1, 2, 2, 0, 0, 1, 2], &[0, 0, 1, 1, 2, 2, 0, 1, 2], NONE).unwrap();
        assert_abs_diff_eq!(f1, 2.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_from_names_keeps_order() {
        let set = MetricSet::<()>::from_names(&["f1_macro", "accuracy"]).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["f1_macro", "accuracy"]);
        let scores = set.compute(&[1, 0], &[1, 1], NONE).unwrap();
        assert_eq!(scores[1], ("accuracy".to_string(), 50.0));
    }

    #[test]
    fn test_from_names_unknown() {
        let result = MetricSet::<()>::from_names(&["bleu"]);
        assert!(matches!(result, Err(Error::UnknownMetric(name)) if name == "bleu"));
    }

    #[test]
    fn test_custom_metric_sees_examples() {
        let set = MetricSet::<String>::new().with("long", |_: &[usize], _: &[usize], ex: &[&String]| {
            Ok(ex.iter().filter(|e| e.len() > 3).count() as f64)
        });
        let a = "short".to_string();
        let b = "ab".to_string();
        let scores = set.compute(&[0, 0], &[0, 0], &[&a, &b]).unwrap();
        assert_eq!(scores[0].1, 1.0);
    }
}
