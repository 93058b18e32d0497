//! Rank-aware metric logger

use super::meters::Meter;
use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?::\.(\d+))?\}").expect("Invalid placeholder regex"));

/// Substitute `value` into every `{}` or `{:.N}` placeholder of `format`
pub fn format_value(format: &str, value: f64) -> String {
    PLACEHOLDER_REGEX
        .replace_all(format, |caps: &Captures<'_>| match caps.get(1) {
            Some(precision) => {
                let precision: usize = precision.as_str().parse().unwrap_or(0);
                format!("{value:.precision$}")
            }
            None => format!("{value}"),
        })
        .into_owned()
}

struct MeterEntry {
    key: String,
    meter: Box<dyn Meter>,
    print_format: String,
    reset_after_print: bool,
}

/// Collects named meters and prints them as one line on selected ranks.
///
/// ```
/// use evaluar::monitor::{AverageMeter, MetricLogger};
///
/// let mut logger = MetricLogger::new(0, vec![0]);
/// logger.register_metric("loss", AverageMeter::new(), Some("loss: {:.3}"), true).unwrap();
/// logger.meter("loss", 0.5, 2).unwrap();
/// assert_eq!(logger.format_metrics(), "[rank:0] loss: 0.500");
/// ```
pub struct MetricLogger {
    rank: usize,
    print_ranks: Vec<usize>,
    entries: Vec<MeterEntry>,
}

impl MetricLogger {
    /// Logger for process `rank` that prints on `print_ranks` by default
    pub fn new(rank: usize, print_ranks: Vec<usize>) -> Self {
        Self { rank, print_ranks, entries: Vec::new() }
    }

    /// Rank of this process
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Register a meter under `key`.
    ///
    /// `print_format` defaults to `"<key>: {}"`.
    pub fn register_metric<M: Meter + 'static>(
        &mut self,
        key: impl Into<String>,
        meter: M,
        print_format: Option<&str>,
        reset_after_print: bool,
    ) -> Result<()> {
        let key = key.into();
        if self.position(&key).is_some() {
            return Err(Error::DuplicateMeter(key));
        }
        let print_format = print_format.map_or_else(|| format!("{key}: {{}}"), str::to_string);
        self.entries.push(MeterEntry { key, meter: Box::new(meter), print_format, reset_after_print });
        Ok(())
    }

    /// The meter registered under `key`
    pub fn metric(&self, key: &str) -> Option<&dyn Meter> {
        self.position(key).map(|i| self.entries[i].meter.as_ref())
    }

    /// Record into the meter registered under `key`
    pub fn meter(&mut self, key: &str, value: f64, n: usize) -> Result<()> {
        let i = self.position(key).ok_or_else(|| Error::UnknownMeter(key.to_string()))?;
        self.entries[i].meter.record(value, n);
        Ok(())
    }

    /// Format every meter in registration order, resetting the ones
    /// registered with `reset_after_print`
    pub fn format_metrics(&mut self) -> String {
        let fields: Vec<String> = self
            .entries
            .iter_mut()
            .map(|entry| {
                let field = format_value(&entry.print_format, entry.meter.get());
                if entry.reset_after_print {
                    entry.meter.reset();
                }
                field
            })
            .collect();
        format!("[rank:{}] {}", self.rank, fields.join(", "))
    }

    /// Print the formatted meters with a millisecond timestamp.
    ///
    /// Meters are read and reset on every rank; only ranks in `print_ranks`
    /// (or the logger's own list) print.
    pub fn print_metrics(&mut self, print_ranks: Option<&[usize]>) {
        let line = self.format_metrics();
        if self.should_print(print_ranks) {
            let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            println!("{line} | {now}");
        }
    }

    /// Print `msg` on selected ranks
    pub fn print(&self, msg: &str, print_ranks: Option<&[usize]>) {
        if self.should_print(print_ranks) {
            println!("{msg}");
        }
    }

    /// Whether this rank is in `print_ranks`, or in the default ranks when `None`
    pub fn should_print(&self, print_ranks: Option<&[usize]>) -> bool {
        print_ranks.unwrap_or(self.print_ranks.as_slice()).contains(&self.rank)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{AverageMeter, IterationMeter};

    #[test]
    fn test_format_value_placeholders() {
        assert_eq!(format_value("loss: {}", 0.25), "loss: 0.25");
        assert_eq!(format_value("lat: {:.2} ms", 1.0 / 3.0), "lat: 0.33 ms");
        assert_eq!(format_value("{} / {:.1}", 2.0), "2 / 2.0");
        assert_eq!(format_value("plain", 1.0), "plain");
    }

    #[test]
    fn test_default_format_and_order() {
        let mut logger = MetricLogger::new(1, vec![0, 1]);
        logger.register_metric("iter", IterationMeter::new(), None, false).unwrap();
        logger.register_metric("loss", AverageMeter::new(), Some("loss: {:.4}"), true).unwrap();
        logger.meter("iter", 12.0, 1).unwrap();
        logger.meter("loss", 0.5, 1).unwrap();
        logger.meter("loss", 1.0, 1).unwrap();

        assert_eq!(logger.format_metrics(), "[rank:1] iter: 12, loss: 0.7500");
        // loss was reset, iter was not
        assert_eq!(logger.format_metrics(), "[rank:1] iter: 12, loss: 0.0000");
    }

    #[test]
    fn test_duplicate_registration() {
        let mut logger = MetricLogger::new(0, vec![0]);
        logger.register_metric("loss", AverageMeter::new(), None, false).unwrap();
        let err = logger.register_metric("loss", IterationMeter::new(), None, false).unwrap_err();
        assert!(matches!(err, Error::DuplicateMeter(key) if key == "loss"));
    }

    #[test]
    fn test_unknown_meter() {
        let mut logger = MetricLogger::new(0, vec![0]);
        assert!(matches!(logger.meter("auc", 1.0, 1), Err(Error::UnknownMeter(_))));
        assert!(logger.metric("auc").is_none());
    }

    #[test]
    fn test_metric_lookup() {
        let mut logger = MetricLogger::new(0, vec![0]);
        logger.register_metric("iter", IterationMeter::new(), None, false).unwrap();
        logger.meter("iter", 5.0, 1).unwrap();
        assert_eq!(logger.metric("iter").map(|m| m.get()), Some(5.0));
    }

    #[test]
    fn test_print_ranks() {
        let logger = MetricLogger::new(2, vec![0]);
        assert!(!logger.should_print(None));
        assert!(logger.should_print(Some(&[2, 3])));
    }
}
