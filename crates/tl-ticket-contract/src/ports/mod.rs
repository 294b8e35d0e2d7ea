//! # Ports Layer
//!
//! - `inbound`: the ticket API driven by the dispatcher
//! - `outbound`: the ledger context driven by the ticket service

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
