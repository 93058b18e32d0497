//! Training-loop style monitoring: meters and a rank-aware logger

mod logger;
mod meters;

pub use logger::{format_value, MetricLogger};
pub use meters::{AverageMeter, IterationMeter, LatencyMeter, Meter};
