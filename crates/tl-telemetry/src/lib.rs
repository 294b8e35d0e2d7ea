//! # Ticket Ledger Telemetry
//!
//! Logging and metrics shared by the ticket ledger crates.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   human-readable or JSON formatter
//! - **Metrics**: Prometheus counters and histograms per contract operation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tl_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let _guard = init_logging(&TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TL_SERVICE_NAME` | `ticket-ledger` | Service name attached to logs |
//! | `TL_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `TL_JSON_LOGS` | `false` (`true` in containers) | JSON formatted logs |

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging, LoggingGuard};
pub use metrics::{
    gather_metrics, record_operation, REGISTRY, TICKET_OPERATIONS, TICKET_OPERATION_DURATION,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metrics could not be encoded.
    #[error("Failed to encode Prometheus metrics: {0}")]
    MetricsEncode(String),

    /// A configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
