//! # Domain Invariants
//!
//! Rules every ticket write must satisfy. They compare the stored version
//! with the version about to be written, so they live here rather than in
//! the record model.
//!
//! | Invariant | Check |
//! |-----------|-------|
//! | New tickets are unsold and unlocked | `invariant_unsold_at_creation` |
//! | `id`, `day`, `seat` never change | `invariant_fixed_identity` |
//! | Lock is monotonic and freezes owner/price | `invariant_monotonic_lock` |
//! | Price changes only while unsold | `invariant_reprice_unsold` |
//! | Only sold tickets can be locked | `invariant_lock_requires_owner` |

use super::entities::Ticket;
use super::errors::TicketError;

/// Invariant: a freshly generated ticket has no owner and is unlocked.
pub fn invariant_unsold_at_creation(ticket: &Ticket) -> Result<(), TicketError> {
    if ticket.is_sold() || ticket.locked {
        return Err(TicketError::InvalidArgument(format!(
            "new ticket {} must be unsold and unlocked",
            ticket.id
        )));
    }
    Ok(())
}

/// Invariant: identity fields are immutable.
pub fn invariant_fixed_identity(before: &Ticket, after: &Ticket) -> Result<(), TicketError> {
    let changed = if before.id != after.id {
        Some("id")
    } else if before.day != after.day {
        Some("day")
    } else if before.seat != after.seat {
        Some("seat")
    } else if before.record_type != after.record_type {
        Some("docType")
    } else {
        None
    };

    match changed {
        Some(field) => Err(TicketError::InvalidArgument(format!(
            "{field} of ticket {} is immutable",
            before.id
        ))),
        None => Ok(()),
    }
}

/// Invariant: once locked, a ticket accepts no further writes. It stays
/// locked and its owner and price are frozen, even for same-value writes.
pub fn invariant_monotonic_lock(before: &Ticket, action: &'static str) -> Result<(), TicketError> {
    if before.locked {
        return Err(TicketError::LockedViolation {
            id: before.id.clone(),
            action,
        });
    }
    Ok(())
}

/// Invariant: the price may only change while the ticket is unsold.
pub fn invariant_reprice_unsold(before: &Ticket, after: &Ticket) -> Result<(), TicketError> {
    if before.price != after.price && before.is_sold() {
        return Err(TicketError::AlreadySold {
            id: before.id.clone(),
        });
    }
    Ok(())
}

/// Precondition of a reprice: the stored ticket is unlocked and unsold,
/// whatever the requested price.
pub fn reprice_precondition(before: &Ticket) -> Result<(), TicketError> {
    invariant_monotonic_lock(before, "reprice")?;
    if before.is_sold() {
        return Err(TicketError::AlreadySold {
            id: before.id.clone(),
        });
    }
    Ok(())
}

/// Invariant: `locked` may go `false -> true` only when the ticket has an
/// owner.
pub fn invariant_lock_requires_owner(before: &Ticket, after: &Ticket) -> Result<(), TicketError> {
    if !before.locked && after.locked && !after.is_sold() {
        return Err(TicketError::UnsoldViolation {
            id: before.id.clone(),
        });
    }
    Ok(())
}

/// Check a transition from the stored version to the version about to be
/// written.
///
/// The lock check runs first: a locked ticket reports `LockedViolation`
/// even when another rule would also reject the change.
pub fn check_transition(
    before: &Ticket,
    after: &Ticket,
    action: &'static str,
) -> Result<(), TicketError> {
    invariant_fixed_identity(before, after)?;
    invariant_monotonic_lock(before, action)?;
    invariant_reprice_unsold(before, after)?;
    invariant_lock_requires_owner(before, after)?;
    Ok(())
}
