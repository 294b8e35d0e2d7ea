//! # Ticket Contract - Event Ticket Lifecycle on a Versioned Ledger
//!
//! ## Purpose
//!
//! Manages the ownership and pricing lifecycle of event tickets stored as
//! JSON documents in a host-provided versioned key-value ledger. Tickets are
//! generated unsold, sold by transfer, repriced while unsold and locked once
//! sold. Every change is a new ledger version and the full history of a
//! ticket stays queryable.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | New tickets are unsold, unlocked, ownerless | `domain/invariants.rs` - `invariant_unsold_at_creation()` |
//! | Id, day and seat never change | `domain/invariants.rs` - `invariant_fixed_identity()` |
//! | Locked tickets are immutable | `domain/invariants.rs` - `invariant_monotonic_lock()` |
//! | Only unsold tickets are repriced | `domain/invariants.rs` - `reprice_precondition()`, `invariant_reprice_unsold()` |
//! | Only sold tickets are locked | `domain/invariants.rs` - `invariant_lock_requires_owner()` |
//! | Owners are stored lowercase | `domain/value_objects.rs` - `normalize_owner()` |
//!
//! ## Outbound Dependencies
//!
//! | Port | Trait | Purpose |
//! |------|-------|---------|
//! | Host ledger | `LedgerContext` | Point reads/writes, range scan, rich query, key history |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Service | `service.rs` | Operation semantics |
//! | Dispatcher | `dispatch.rs` | Name/argument routing, response status |
//! | Encoder | `encoding.rs` | JSON payloads for queries |
//! | Ledger simulator | `adapters/memory_ledger.rs` | In-memory MVCC host for tests and tools |
//!
//! ## Usage Example
//!
//! ```ignore
//! use tl_ticket_contract::prelude::*;
//!
//! let ledger = InMemoryLedger::new();
//! let contract = TicketContract::new(ContractConfig::default());
//!
//! let mut tx = ledger.begin();
//! let response = contract.invoke(
//!     &mut tx,
//!     &Invocation::new("generateTicket", ["t1", "100", "1", "a64"]),
//! );
//! assert!(response.is_ok());
//! tx.commit()?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod encoding;
pub mod metrics;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::entities::{RecordType, Ticket, TicketEntry, TicketVersion};
    pub use crate::domain::errors::{ErrorKind, LedgerError, TicketError};

    // Ports
    pub use crate::ports::inbound::TicketContractApi;
    pub use crate::ports::outbound::{KeyModification, KeyValue, LedgerContext, ResultsIterator};

    // Adapters
    pub use crate::adapters::{CommitReceipt, InMemoryLedger, LedgerOp, TransactionContext};

    // Service and dispatch
    pub use crate::config::{ConfigError, ContractConfig};
    pub use crate::dispatch::{ChaincodeResponse, Invocation, Operation, TicketContract};
    pub use crate::metrics::{ContractMetrics, MetricsSnapshot};
    pub use crate::service::TicketContractService;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version, reported by `contractVersion`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
