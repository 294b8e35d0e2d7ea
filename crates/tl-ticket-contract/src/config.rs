//! Contract configuration.

use std::env;
use thiserror::Error;

/// Invalid configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Scan bounds are inverted.
    #[error("scan start key {start:?} is after end key {end:?}")]
    InvertedScanRange {
        /// Start bound
        start: String,
        /// End bound
        end: String,
    },
}

/// Configuration for the ticket contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractConfig {
    /// Inclusive start key of the full-keyspace scan. Empty means unbounded.
    pub scan_start_key: String,
    /// Exclusive end key of the full-keyspace scan. Empty means unbounded.
    pub scan_end_key: String,
    /// Log encoded query payloads at debug level.
    pub log_payloads: bool,
}

impl ContractConfig {
    /// Create configuration from environment variables.
    ///
    /// - `TL_SCAN_START_KEY`: scan start (default: unbounded)
    /// - `TL_SCAN_END_KEY`: scan end (default: unbounded)
    /// - `TL_LOG_PAYLOADS`: log query payloads (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            scan_start_key: env::var("TL_SCAN_START_KEY").unwrap_or_default(),
            scan_end_key: env::var("TL_SCAN_END_KEY").unwrap_or_default(),
            log_payloads: env::var("TL_LOG_PAYLOADS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the scan bounds are ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scan_end_key.is_empty() && self.scan_start_key > self.scan_end_key {
            return Err(ConfigError::InvertedScanRange {
                start: self.scan_start_key.clone(),
                end: self.scan_end_key.clone(),
            });
        }
        Ok(())
    }
}
