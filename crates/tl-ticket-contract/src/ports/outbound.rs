//! # Driven Ports (SPI - Outbound)
//!
//! The per-transaction key-value context supplied by the host ledger.
//!
//! ## Contract
//!
//! - Reads see the transaction's own earlier writes.
//! - Writes persist only if the host later commits the transaction.
//! - Concurrent transactions on the same key are resolved by the host at
//!   commit time (read-set/write-set validation), never by the contract.
//!
//! Scans, predicate queries and history lookups return a lazy,
//! non-restartable iterator. The iterator owns whatever cursor the host
//! opened and releases it on `Drop`, so every exit path of a caller
//! (including `?` on an item error) closes it.

use crate::domain::LedgerError;
use chrono::{DateTime, Utc};

/// A key and the bytes stored under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// Storage key.
    pub key: String,
    /// Stored bytes.
    pub value: Vec<u8>,
}

/// One committed write or delete of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    /// Transaction that performed the modification.
    pub tx_id: String,
    /// Written bytes; `None` for a delete.
    pub value: Option<Vec<u8>>,
    /// Commit timestamp.
    pub timestamp: DateTime<Utc>,
    /// True when the modification deleted the key.
    pub is_delete: bool,
}

/// Lazy result sequence handed out by the ledger.
pub type ResultsIterator<'a, T> = Box<dyn Iterator<Item = Result<T, LedgerError>> + 'a>;

/// Interface to the host ledger for one transaction.
pub trait LedgerContext {
    /// Identifier of the current transaction.
    fn tx_id(&self) -> &str;

    /// Read the value under `key`, or `None` if absent.
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write `value` under `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Remove `key`.
    fn delete_state(&mut self, key: &str) -> Result<(), LedgerError>;

    /// Scan keys in `[start_key, end_key)`. An empty bound is open.
    fn get_state_by_range(
        &mut self,
        start_key: &str,
        end_key: &str,
    ) -> Result<ResultsIterator<'_, KeyValue>, LedgerError>;

    /// Run a predicate query in the host's query dialect.
    fn get_query_result(&mut self, query: &str) -> Result<ResultsIterator<'_, KeyValue>, LedgerError>;

    /// Every committed modification of `key`, oldest first.
    fn get_history_for_key(
        &mut self,
        key: &str,
    ) -> Result<ResultsIterator<'_, KeyModification>, LedgerError>;
}

/// Build the predicate query selecting ticket records by a field value.
///
/// The host dialect is a CouchDB-style selector document.
#[must_use]
pub fn ticket_selector(field: &str, value: &str) -> String {
    let mut selector = serde_json::Map::new();
    selector.insert(
        crate::domain::RECORD_TYPE_FIELD.to_string(),
        serde_json::Value::from(crate::domain::TICKET_RECORD_TYPE),
    );
    selector.insert(field.to_string(), serde_json::Value::from(value));
    serde_json::json!({ "selector": selector }).to_string()
}
