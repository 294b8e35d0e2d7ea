//! # In-Memory Ledger
//!
//! Deterministic stand-in for the host ledger platform, for tests,
//! benchmarks and local tooling. Production deployments implement
//! `LedgerContext` on top of the real platform's transaction stub.
//!
//! - Committed world state is an ordered key map with a version per key.
//! - `TransactionContext` buffers writes and records the version of every
//!   key it reads; `commit()` rejects the whole write set if any of those
//!   versions moved (MVCC).
//! - Predicate queries and history read committed state only.

use crate::domain::LedgerError;
use crate::ports::outbound::{KeyModification, KeyValue, LedgerContext, ResultsIterator};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Ledger calls that can be made to fail with [`InMemoryLedger::fail_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOp {
    /// `get_state`
    GetState,
    /// `put_state`
    PutState,
    /// `delete_state`
    DeleteState,
    /// `get_state_by_range`
    RangeScan,
    /// `get_query_result`
    RichQuery,
    /// `get_history_for_key`
    History,
    /// First `next()` of the next iterator handed out
    IteratorNext,
}

#[derive(Debug, Default)]
struct WorldState {
    entries: BTreeMap<String, Vec<u8>>,
    /// Survives deletion so that a re-created key still conflicts.
    versions: HashMap<String, u64>,
    history: HashMap<String, Vec<KeyModification>>,
    height: u64,
}

#[derive(Debug, Default)]
struct Shared {
    world: RwLock<WorldState>,
    open_iterators: AtomicUsize,
    faults: Mutex<VecDeque<(LedgerOp, String)>>,
}

impl Shared {
    fn take_fault(&self, op: LedgerOp) -> Option<String> {
        let mut faults = self.faults.lock();
        let position = faults.iter().position(|(pending, _)| *pending == op)?;
        faults.remove(position).map(|(_, message)| message)
    }

    fn check(&self, op: LedgerOp) -> Result<(), LedgerError> {
        match self.take_fault(op) {
            Some(message) => Err(LedgerError::Backend(message)),
            None => Ok(()),
        }
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Committed transaction.
    pub tx_id: String,
    /// Ledger height after the commit.
    pub block_height: u64,
    /// Number of keys written or deleted.
    pub writes: usize,
}

/// Shared in-memory ledger. Clones refer to the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    shared: Arc<Shared>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a transaction against the current committed state.
    #[must_use]
    pub fn begin(&self) -> TransactionContext {
        TransactionContext {
            shared: Arc::clone(&self.shared),
            tx_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            read_set: HashMap::new(),
            write_set: BTreeMap::new(),
        }
    }

    /// Number of committed transactions that wrote something.
    #[must_use]
    pub fn height(&self) -> u64 {
        self.shared.world.read().height
    }

    /// Iterators handed out and not yet dropped.
    #[must_use]
    pub fn open_iterators(&self) -> usize {
        self.shared.open_iterators.load(Ordering::SeqCst)
    }

    /// Make the next `op` call fail with `LedgerError::Backend(message)`.
    pub fn fail_next(&self, op: LedgerOp, message: impl Into<String>) {
        self.shared.faults.lock().push_back((op, message.into()));
    }

    /// Committed bytes under `key`.
    #[must_use]
    pub fn committed_value(&self, key: &str) -> Option<Vec<u8>> {
        self.shared.world.read().entries.get(key).cloned()
    }

    /// Commit a raw write in its own transaction.
    pub fn seed(&self, key: &str, value: Vec<u8>) -> Result<CommitReceipt, LedgerError> {
        let mut tx = self.begin();
        tx.put_state(key, value)?;
        tx.commit()
    }
}

/// One transaction against an [`InMemoryLedger`].
///
/// Dropping it without calling [`commit`](Self::commit) discards its writes.
#[derive(Debug)]
pub struct TransactionContext {
    shared: Arc<Shared>,
    tx_id: String,
    timestamp: DateTime<Utc>,
    read_set: HashMap<String, Option<u64>>,
    write_set: BTreeMap<String, Option<Vec<u8>>>,
}

impl TransactionContext {
    /// Transaction timestamp, recorded in history on commit.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Validate the read set and apply the write set atomically.
    pub fn commit(self) -> Result<CommitReceipt, LedgerError> {
        let TransactionContext {
            shared,
            tx_id,
            timestamp,
            read_set,
            write_set,
        } = self;

        let mut world = shared.world.write();
        for (key, seen) in &read_set {
            if world.versions.get(key).copied() != *seen {
                warn!(tx_id = %tx_id, key = %key, "MVCC read conflict, transaction invalidated");
                return Err(LedgerError::MvccConflict { key: key.clone() });
            }
        }

        if write_set.is_empty() {
            return Ok(CommitReceipt {
                tx_id,
                block_height: world.height,
                writes: 0,
            });
        }

        world.height += 1;
        let height = world.height;
        let writes = write_set.len();

        for (key, value) in write_set {
            let modification = KeyModification {
                tx_id: tx_id.clone(),
                is_delete: value.is_none(),
                value: value.clone(),
                timestamp,
            };
            match value {
                Some(bytes) => {
                    world.entries.insert(key.clone(), bytes);
                }
                None => {
                    world.entries.remove(&key);
                }
            }
            world.versions.insert(key.clone(), height);
            world.history.entry(key).or_default().push(modification);
        }

        debug!(tx_id = %tx_id, height, writes, "Transaction committed");
        Ok(CommitReceipt {
            tx_id,
            block_height: height,
            writes,
        })
    }

    /// Discard the transaction.
    pub fn rollback(self) {
        debug!(tx_id = %self.tx_id, writes = self.write_set.len(), "Transaction rolled back");
    }

    fn record_read(&mut self, key: &str, version: Option<u64>) {
        self.read_set.entry(key.to_string()).or_insert(version);
    }

    fn tracked<T: 'static>(&self, items: Vec<T>) -> ResultsIterator<'static, T> {
        let pending_error = self
            .shared
            .take_fault(LedgerOp::IteratorNext)
            .map(LedgerError::Backend);
        Box::new(TrackedIter {
            items: items.into_iter(),
            pending_error,
            _guard: IteratorGuard::acquire(Arc::clone(&self.shared)),
        })
    }
}

fn in_range(key: &str, start_key: &str, end_key: &str) -> bool {
    (start_key.is_empty() || key >= start_key) && (end_key.is_empty() || key < end_key)
}

fn parse_selector(query: &str) -> Result<serde_json::Map<String, serde_json::Value>, LedgerError> {
    let document: serde_json::Value =
        serde_json::from_str(query).map_err(|e| LedgerError::InvalidQuery(e.to_string()))?;
    match document.get("selector") {
        Some(serde_json::Value::Object(selector)) => Ok(selector.clone()),
        _ => Err(LedgerError::InvalidQuery(
            "query must contain a selector object".to_string(),
        )),
    }
}

fn matches_selector(bytes: &[u8], selector: &serde_json::Map<String, serde_json::Value>) -> bool {
    let Ok(serde_json::Value::Object(document)) = serde_json::from_slice::<serde_json::Value>(bytes)
    else {
        return false;
    };
    selector
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

impl LedgerContext for TransactionContext {
    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.shared.check(LedgerOp::GetState)?;
        if let Some(pending) = self.write_set.get(key) {
            return Ok(pending.clone());
        }

        let (value, version) = {
            let world = self.shared.world.read();
            (
                world.entries.get(key).cloned(),
                world.versions.get(key).copied(),
            )
        };
        self.record_read(key, version);
        Ok(value)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.shared.check(LedgerOp::PutState)?;
        if key.is_empty() {
            return Err(LedgerError::Backend("key must not be empty".to_string()));
        }
        self.write_set.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete_state(&mut self, key: &str) -> Result<(), LedgerError> {
        self.shared.check(LedgerOp::DeleteState)?;
        self.write_set.insert(key.to_string(), None);
        Ok(())
    }

    fn get_state_by_range(
        &mut self,
        start_key: &str,
        end_key: &str,
    ) -> Result<ResultsIterator<'_, KeyValue>, LedgerError> {
        self.shared.check(LedgerOp::RangeScan)?;

        let shared = Arc::clone(&self.shared);
        let mut merged: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        {
            let world = shared.world.read();
            for (key, value) in world
                .entries
                .iter()
                .filter(|(key, _)| in_range(key, start_key, end_key))
            {
                self.record_read(key, world.versions.get(key).copied());
                merged.insert(key.clone(), value.clone());
            }
        }
        for (key, pending) in self
            .write_set
            .iter()
            .filter(|(key, _)| in_range(key, start_key, end_key))
        {
            match pending {
                Some(value) => merged.insert(key.clone(), value.clone()),
                None => merged.remove(key),
            };
        }

        let items = merged
            .into_iter()
            .map(|(key, value)| KeyValue { key, value })
            .collect();
        Ok(self.tracked(items))
    }

    fn get_query_result(&mut self, query: &str) -> Result<ResultsIterator<'_, KeyValue>, LedgerError> {
        self.shared.check(LedgerOp::RichQuery)?;
        let selector = parse_selector(query)?;

        let items = {
            let world = self.shared.world.read();
            world
                .entries
                .iter()
                .filter(|(_, value)| matches_selector(value, &selector))
                .map(|(key, value)| KeyValue {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect::<Vec<_>>()
        };
        debug!(matches = items.len(), "Rich query evaluated");
        Ok(self.tracked(items))
    }

    fn get_history_for_key(
        &mut self,
        key: &str,
    ) -> Result<ResultsIterator<'_, KeyModification>, LedgerError> {
        self.shared.check(LedgerOp::History)?;
        let items = self
            .shared
            .world
            .read()
            .history
            .get(key)
            .cloned()
            .unwrap_or_default();
        Ok(self.tracked(items))
    }
}

// =============================================================================
// ITERATORS
// =============================================================================

struct IteratorGuard {
    shared: Arc<Shared>,
}

impl IteratorGuard {
    fn acquire(shared: Arc<Shared>) -> Self {
        shared.open_iterators.fetch_add(1, Ordering::SeqCst);
        Self { shared }
    }
}

impl Drop for IteratorGuard {
    fn drop(&mut self) {
        self.shared.open_iterators.fetch_sub(1, Ordering::SeqCst);
    }
}

struct TrackedIter<T> {
    items: std::vec::IntoIter<T>,
    pending_error: Option<LedgerError>,
    _guard: IteratorGuard,
}

impl<T> Iterator for TrackedIter<T> {
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending_error.take() {
            return Some(Err(err));
        }
        self.items.next().map(Ok)
    }
}

// =============================================================================
// TESTS
// =============================================================================
