//! Plain-text per-class report

use super::confusion::ConfusionMatrix;
use super::metrics::{Average, MultiClassMetrics, Prf};
use std::fmt::Write;

const RULE_WIDTH: usize = 52;

fn push_row(out: &mut String, name: &str, scores: &Prf, support: usize) {
    let _ = writeln!(
        out,
        "{name:>12} {:>9.2} {:>9.2} {:>9.2} {support:>9}",
        scores.precision, scores.recall, scores.f1
    );
}

/// Precision, recall, F1 and support for every occurring class, followed by
/// macro and weighted averages and overall accuracy
pub fn classification_report(predictions: &[usize], labels: &[usize]) -> String {
    let cm = ConfusionMatrix::from_labels(predictions, labels);
    let metrics = MultiClassMetrics::from_confusion(&cm);
    let rule = "-".repeat(RULE_WIDTH);

    let mut out = String::new();
    let _ = writeln!(out, "{:>12} {:>9} {:>9} {:>9} {:>9}", "class", "precision", "recall", "f1", "support");
    let _ = writeln!(out, "{rule}");
    for stats in metrics.classes() {
        push_row(&mut out, &stats.class.to_string(), &stats.scores, stats.support);
    }
    let _ = writeln!(out, "{rule}");
    for (name, average) in [("macro avg", Average::Macro), ("weighted avg", Average::Weighted)] {
        push_row(&mut out, name, &metrics.average(average), cm.total());
    }
    let _ = write!(out, "\naccuracy: {:.4}", cm.accuracy());
    out
}
