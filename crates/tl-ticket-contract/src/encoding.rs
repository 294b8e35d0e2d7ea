//! # Response Encoder
//!
//! JSON payloads returned by query operations.
//!
//! | Result | Shape |
//! |--------|-------|
//! | single ticket | the stored ticket document |
//! | ticket set | `[{"id": key, "record": ticket}, ...]` |
//! | history | `[{"txId", "value": ticket \| null, "timestamp", "isDelete"}, ...]` |
//! | version | `{"version": "x.y.z"}` |

use crate::domain::{Ticket, TicketEntry, TicketError, TicketVersion};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct EntryPayload<'a> {
    id: &'a str,
    record: &'a Ticket,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryPayload<'a> {
    tx_id: &'a str,
    value: Option<&'a Ticket>,
    timestamp: DateTime<Utc>,
    is_delete: bool,
}

#[derive(Serialize)]
struct VersionPayload<'a> {
    version: &'a str,
}

fn to_payload<T: Serialize>(what: &str, value: &T) -> Result<Vec<u8>, TicketError> {
    serde_json::to_vec(value).map_err(|e| TicketError::malformed(what, e))
}

/// Encode one ticket.
pub fn encode_ticket(ticket: &Ticket) -> Result<Vec<u8>, TicketError> {
    to_payload(&ticket.id, ticket)
}

/// Encode a range or predicate query result, preserving order.
pub fn encode_entries(entries: &[TicketEntry]) -> Result<Vec<u8>, TicketError> {
    let payload: Vec<_> = entries
        .iter()
        .map(|entry| EntryPayload {
            id: &entry.id,
            record: &entry.ticket,
        })
        .collect();
    to_payload("query result", &payload)
}

/// Encode the version history of a key, preserving ledger order.
pub fn encode_history(versions: &[TicketVersion]) -> Result<Vec<u8>, TicketError> {
    let payload: Vec<_> = versions
        .iter()
        .map(|version| HistoryPayload {
            tx_id: &version.tx_id,
            value: version.ticket.as_ref(),
            timestamp: version.timestamp,
            is_delete: version.is_delete,
        })
        .collect();
    to_payload("history", &payload)
}

/// Encode the contract version.
pub fn encode_version(version: &str) -> Result<Vec<u8>, TicketError> {
    to_payload("version", &VersionPayload { version })
}
