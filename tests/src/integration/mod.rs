//! # Integration Tests
//!
//! Scenarios exercising the dispatcher, service, encoder and in-memory
//! ledger together.

pub mod concurrency;
pub mod failures;
