//! Cycle metrics collection and reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use serde::Serialize;

/// Cycle outcome counters, shared between the manager and the HTTP API.
#[derive(Debug, Default)]
pub struct CycleStats {
    pub published: AtomicU64,
    pub fallback: AtomicU64,
    pub failed: AtomicU64,
    pub cancelled: AtomicU64,
    pub stale: AtomicU64,
}

impl CycleStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished cycle under its outcome label.
    pub fn record_outcome(&self, outcome: &'static str) {
        let slot = match outcome {
            "published" => &self.published,
            "fallback" => &self.fallback,
            "cancelled" => &self.cancelled,
            "stale" => &self.stale,
            _ => &self.failed,
        };
        slot.fetch_add(1, Ordering::Relaxed);
        counter!("radar_cycles_total", "outcome" => outcome).increment(1);
    }

    pub fn snapshot(&self) -> CycleStatsSnapshot {
        CycleStatsSnapshot {
            published: self.published.load(Ordering::Relaxed),
            fallback: self.fallback.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CycleStatsSnapshot {
    pub published: u64,
    pub fallback: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub stale: u64,
}

pub fn record_cycle_duration(elapsed: Duration) {
    histogram!("radar_cycle_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_payload_bytes(bytes: usize) {
    histogram!("radar_payload_bytes").record(bytes as f64);
}

/// Simple timer for measuring durations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_micros() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcome_counts() {
        let stats = CycleStats::new();
        stats.record_outcome("published");
        stats.record_outcome("published");
        stats.record_outcome("fetch");
        stats.record_outcome("stale");

        let snap = stats.snapshot();
        assert_eq!(snap.published, 2);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.stale, 1);
        assert_eq!(snap.cancelled, 0);
    }
}
