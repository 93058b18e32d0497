//! Meters: accumulate a value between prints

use std::cell::Cell;
use std::time::Instant;

/// A running measurement that a [`MetricLogger`](super::MetricLogger) can
/// record into and print.
pub trait Meter: Send {
    /// Record `value`, observed over `n` samples
    fn record(&mut self, value: f64, n: usize);

    /// Current reading
    fn get(&self) -> f64;

    /// Start a new measurement window
    fn reset(&mut self);
}

/// Holds the last recorded value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IterationMeter {
    value: f64,
}

impl IterationMeter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Meter for IterationMeter {
    fn record(&mut self, value: f64, _n: usize) {
        self.value = value;
    }

    fn get(&self) -> f64 {
        self.value
    }

    fn reset(&mut self) {}
}

/// Sample-weighted running mean
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AverageMeter {
    sum: f64,
    n: usize,
}

impl AverageMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples recorded since the last reset
    pub fn count(&self) -> usize {
        self.n
    }
}

impl Meter for AverageMeter {
    fn record(&mut self, value: f64, n: usize) {
        self.sum += value * n as f64;
        self.n += n;
    }

    /// Mean of the recorded values, 0 when nothing was recorded
    fn get(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }

    fn reset(&mut self) {
        self.sum = 0.0;
        self.n = 0;
    }
}

/// Milliseconds per recorded iteration.
///
/// The window starts when the meter is created. Reading the meter stamps the
/// window's end; a reset starts the next window at that stamp, so time spent
/// between reading and resetting is not lost.
#[derive(Debug)]
pub struct LatencyMeter {
    begin: Instant,
    end: Cell<Option<Instant>>,
    n: usize,
}

impl LatencyMeter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Meter whose first window begins at `begin`
    pub fn starting_at(begin: Instant) -> Self {
        Self { begin, end: Cell::new(None), n: 0 }
    }

    /// Read the latency as of `now`
    pub fn latency_at(&self, now: Instant) -> f64 {
        self.end.set(Some(now));
        if self.n == 0 {
            return 0.0;
        }
        now.saturating_duration_since(self.begin).as_secs_f64() * 1000.0 / self.n as f64
    }
}

impl Default for LatencyMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl Meter for LatencyMeter {
    fn record(&mut self, _value: f64, n: usize) {
        self.n += n;
    }

    fn get(&self) -> f64 {
        self.latency_at(Instant::now())
    }

    fn reset(&mut self) {
        self.n = 0;
        self.begin = self.end.take().unwrap_or_else(Instant::now);
    }
}
