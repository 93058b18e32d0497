//! Confusion matrices and per-class classification scores

mod confusion;
mod metrics;
mod report;


pub use confusion::{confusion_matrix, ConfusionMatrix};
pub use metrics::{Average, ClassStats, MultiClassMetrics, Prf};
pub use report::classification_report;
