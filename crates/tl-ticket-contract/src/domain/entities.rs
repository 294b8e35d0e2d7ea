//! # Domain Entities
//!
//! The ticket record and the views built on top of it.
//!
//! A ticket is stored as a JSON document under its id. The `docType`
//! discriminator marks the document as a ticket so that predicate queries
//! over a shared keyspace can select tickets only.

use super::errors::TicketError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminator value written into every ticket record.
pub const TICKET_RECORD_TYPE: &str = "ticket";

/// Field name of the record discriminator.
pub const RECORD_TYPE_FIELD: &str = "docType";

/// Record kinds that may share the keyspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Event ticket.
    Ticket,
}

/// A uniquely identified event ticket.
///
/// `id`, `day` and `seat` never change after creation. `locked` only
/// ever goes from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Record discriminator.
    #[serde(rename = "docType")]
    pub record_type: RecordType,
    /// Storage key.
    pub id: String,
    /// Price in opaque units.
    pub price: u64,
    /// Lower-cased owner; empty while unsold.
    pub owner: String,
    /// Event day for multi-day events.
    pub day: i64,
    /// Seat designator.
    pub seat: String,
    /// Settlement lock.
    pub locked: bool,
}

impl Ticket {
    /// Create an unsold, unlocked ticket.
    #[must_use]
    pub fn new(id: impl Into<String>, price: u64, day: i64, seat: impl Into<String>) -> Self {
        Self {
            record_type: RecordType::Ticket,
            id: id.into(),
            price,
            owner: String::new(),
            day,
            seat: seat.into(),
            locked: false,
        }
    }

    /// True once the ticket has an owner.
    #[must_use]
    pub fn is_sold(&self) -> bool {
        !self.owner.is_empty()
    }

    /// Serialize into the ledger storage format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TicketError> {
        serde_json::to_vec(self).map_err(|e| TicketError::malformed(&self.id, e))
    }

    /// Decode the record stored under `key`.
    ///
    /// Fails with `MalformedRecord` when the bytes are not a ticket document.
    pub fn from_bytes(key: &str, bytes: &[u8]) -> Result<Self, TicketError> {
        serde_json::from_slice(bytes).map_err(|e| TicketError::malformed(key, e))
    }

    /// Decode a record found during a keyspace scan.
    ///
    /// Returns `Ok(None)` for JSON documents of another record kind. Bytes
    /// that are not JSON at all, or ticket-typed documents with the wrong
    /// shape, are `MalformedRecord`.
    pub fn classify(key: &str, bytes: &[u8]) -> Result<Option<Self>, TicketError> {
        let document: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| TicketError::malformed(key, e))?;

        let is_ticket = document
            .get(RECORD_TYPE_FIELD)
            .and_then(serde_json::Value::as_str)
            == Some(TICKET_RECORD_TYPE);
        if !is_ticket {
            return Ok(None);
        }

        serde_json::from_value(document)
            .map(Some)
            .map_err(|e| TicketError::malformed(key, e))
    }
}

/// A ticket returned by a range or predicate query, with the key it was
/// found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketEntry {
    /// Storage key.
    pub id: String,
    /// Decoded record.
    pub ticket: Ticket,
}

/// One historical version of a ticket key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketVersion {
    /// Transaction that wrote this version.
    pub tx_id: String,
    /// Record value; `None` for a deletion.
    pub ticket: Option<Ticket>,
    /// Commit timestamp.
    pub timestamp: DateTime<Utc>,
    /// True when this version deleted the key.
    pub is_delete: bool,
}
