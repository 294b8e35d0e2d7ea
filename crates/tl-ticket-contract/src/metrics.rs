//! In-process counters for contract invocations.
//!
//! Complements the Prometheus series exported by `tl-telemetry` with a
//! snapshot API that callers and tests can read directly.

use crate::domain::ErrorKind;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Thread-safe invocation counters.
#[derive(Debug, Default)]
pub struct ContractMetrics {
    invocations: AtomicU64,
    successes: AtomicU64,
    failures: [AtomicU64; 9],
    total_time_ns: AtomicU64,
}

impl ContractMetrics {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful invocation.
    pub fn record_success(&self, duration: Duration) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.add_time(duration);
    }

    /// Record a failed invocation.
    pub fn record_failure(&self, kind: ErrorKind, duration: Duration) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        self.failures[kind.index()].fetch_add(1, Ordering::Relaxed);
        self.add_time(duration);
    }

    fn add_time(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_time_ns.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let invocations = self.invocations.load(Ordering::Relaxed);
        let total = self.total_time_ns.load(Ordering::Relaxed);
        let failures = ErrorKind::ALL
            .iter()
            .map(|kind| (*kind, self.failures[kind.index()].load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        MetricsSnapshot {
            invocations,
            successes: self.successes.load(Ordering::Relaxed),
            failures,
            avg_invocation_ns: if invocations > 0 { total / invocations } else { 0 },
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Invocations recorded, successful or not.
    pub invocations: u64,
    /// Invocations that returned a success response.
    pub successes: u64,
    /// Non-zero failure counts by kind.
    pub failures: BTreeMap<ErrorKind, u64>,
    /// Mean invocation latency in nanoseconds.
    pub avg_invocation_ns: u64,
}

impl MetricsSnapshot {
    /// Failures of one kind.
    #[must_use]
    pub fn failures_of(&self, kind: ErrorKind) -> u64 {
        self.failures.get(&kind).copied().unwrap_or(0)
    }
}
