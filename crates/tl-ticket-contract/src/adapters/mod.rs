//! # Adapters Layer (Outer Hexagon)
//!
//! Implementations of the ledger port. Only the in-memory host simulator
//! ships with the crate; platform bindings live with the host integration.

pub mod memory_ledger;

pub use memory_ledger::*;
