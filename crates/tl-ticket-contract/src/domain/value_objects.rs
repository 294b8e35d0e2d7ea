//! # Value Objects
//!
//! Validation of the positional string arguments handed in by the caller.

use super::errors::TicketError;

/// Reject an empty argument.
pub fn require_non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str, TicketError> {
    if value.is_empty() {
        return Err(TicketError::InvalidArgument(format!(
            "{name} must be a non-empty string"
        )));
    }
    Ok(value)
}

/// Parse a price.
///
/// Only plain decimal digits are accepted. Signs, whitespace and values
/// above `u64::MAX` are rejected rather than wrapped.
pub fn parse_price(value: &str) -> Result<u64, TicketError> {
    let value = require_non_empty("price", value)?;
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TicketError::InvalidArgument(format!(
            "price must be an unsigned integer, got {value:?}"
        )));
    }
    value.parse::<u64>().map_err(|_| {
        TicketError::InvalidArgument(format!("price {value:?} is out of range"))
    })
}

/// Parse an event day. Any value representable as `i64` is allowed.
pub fn parse_day(value: &str) -> Result<i64, TicketError> {
    let value = require_non_empty("day", value)?;
    value.parse::<i64>().map_err(|_| {
        TicketError::InvalidArgument(format!("day must be an integer, got {value:?}"))
    })
}

/// Canonical form of an owner name.
#[must_use]
pub fn normalize_owner(owner: &str) -> String {
    owner.to_lowercase()
}
