//! Prometheus metrics for the ticket contract.
//!
//! Naming follows `ticket_<metric>_<unit>`. Series live in a private
//! registry so embedding hosts can expose them alongside their own.

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, CounterVec, Encoder, HistogramVec, Opts, Registry, TextEncoder};
use std::time::Duration;

use crate::TelemetryError;

lazy_static! {
    /// Contract operations by name and outcome
    pub static ref TICKET_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("ticket_operations_total", "Ticket contract invocations"),
        &["operation", "outcome"]  // outcome: success or the error kind
    ).expect("metric creation failed");

    /// Invocation latency
    pub static ref TICKET_OPERATION_DURATION: HistogramVec = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "ticket_operation_duration_seconds",
            "Time spent executing ticket contract invocations"
        ).buckets(exponential_buckets(0.000_01, 2.0, 16).expect("valid buckets")),
        &["operation"]
    ).expect("metric creation failed");

    /// Registry holding the ticket series
    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        registry
            .register(Box::new(TICKET_OPERATIONS.clone()))
            .expect("metric registration failed");
        registry
            .register(Box::new(TICKET_OPERATION_DURATION.clone()))
            .expect("metric registration failed");
        registry
    };
}

/// Count one invocation and observe its latency.
pub fn record_operation(operation: &str, outcome: &str, elapsed: Duration) {
    TICKET_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
    TICKET_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(elapsed.as_secs_f64());
}

/// Encode all ticket metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsEncode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsEncode(e.to_string()))
}
