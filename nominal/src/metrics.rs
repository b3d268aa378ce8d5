//! Dispatch metrics
//!
//! Each behavior counts how often its callable ran, how many invocations
//! were refused because the identity was not subscribed, and how long the
//! callable took. Behaviors are single-threaded, so the counters are plain
//! integers updated through `&mut self`.

use std::fmt;
use std::time::Duration;

/// Counters owned by one behavior
#[derive(Debug, Clone)]
pub struct DispatchMetrics {
    name: &'static str,
    dispatches: u64,
    skipped: u64,
    sweeps: u64,
    busy: Duration,
}

impl DispatchMetrics {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            dispatches: 0,
            skipped: 0,
            sweeps: 0,
            busy: Duration::ZERO,
        }
    }

    /// Label of the owning behavior
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Count one callable run that took `elapsed`
    pub fn record_dispatch(&mut self, elapsed: Duration) {
        self.dispatches += 1;
        self.busy = self.busy.saturating_add(elapsed);
    }

    /// Count an invocation that never reached the callable
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Count a broadcast over all subscribers
    pub fn record_sweep(&mut self) {
        self.sweeps += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            behavior_name: self.name,
            dispatches: self.dispatches,
            skipped: self.skipped,
            sweeps: self.sweeps,
            busy: self.busy,
        }
    }
}

/// A point-in-time copy of dispatch metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub behavior_name: &'static str,
    pub dispatches: u64,
    pub skipped: u64,
    pub sweeps: u64,
    /// Total time spent inside the callable
    pub busy: Duration,
}

impl MetricsSnapshot {
    /// Fraction of invocations that reached the callable
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.dispatches + self.skipped;
        if total == 0 {
            0.0
        } else {
            self.dispatches as f64 / total as f64
        }
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Behavior: {}", self.behavior_name)?;
        writeln!(
            f,
            "  Dispatches: {} | Skipped: {} | Accepted: {:.1}%",
            self.dispatches,
            self.skipped,
            self.acceptance_rate() * 100.0
        )?;
        writeln!(
            f,
            "  Sweeps: {} | Busy: {:.2}ms",
            self.sweeps,
            self.busy.as_secs_f64() * 1000.0
        )
    }
}
