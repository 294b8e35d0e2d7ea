//! # Driving Ports (API - Inbound)
//!
//! Operations the ticket contract offers to its dispatcher. Each call runs
//! inside one ledger transaction and takes the raw caller strings; parsing
//! and validation happen behind this interface.

use crate::domain::{Ticket, TicketEntry, TicketError, TicketVersion};
use crate::ports::outbound::LedgerContext;

/// Ticket lifecycle API.
pub trait TicketContractApi {
    /// Create an unsold, unlocked ticket.
    ///
    /// Two concurrent calls for the same id can both pass the existence
    /// check; the host's commit-time conflict detection rejects one of them.
    fn generate_ticket(
        &self,
        ctx: &mut dyn LedgerContext,
        id: &str,
        price: &str,
        day: &str,
        seat: &str,
    ) -> Result<Ticket, TicketError>;

    /// Hand the ticket to a new (lower-cased) owner.
    fn transfer_ticket(
        &self,
        ctx: &mut dyn LedgerContext,
        id: &str,
        new_owner: &str,
    ) -> Result<Ticket, TicketError>;

    /// Change the price of an unsold, unlocked ticket.
    fn reprice_ticket(
        &self,
        ctx: &mut dyn LedgerContext,
        id: &str,
        new_price: &str,
    ) -> Result<Ticket, TicketError>;

    /// Lock a sold ticket. Locking an already locked ticket is a no-op.
    fn lock_ticket(&self, ctx: &mut dyn LedgerContext, id: &str) -> Result<Ticket, TicketError>;

    /// Remove the ticket record.
    fn delete_ticket(&self, ctx: &mut dyn LedgerContext, id: &str) -> Result<(), TicketError>;

    /// Read one ticket.
    fn query_ticket(&self, ctx: &mut dyn LedgerContext, id: &str) -> Result<Ticket, TicketError>;

    /// All tickets currently held by `owner`.
    fn query_ticket_by_owner(
        &self,
        ctx: &mut dyn LedgerContext,
        owner: &str,
    ) -> Result<Vec<TicketEntry>, TicketError>;

    /// Every ticket in the scanned keyspace.
    fn query_all_tickets(&self, ctx: &mut dyn LedgerContext)
        -> Result<Vec<TicketEntry>, TicketError>;

    /// Every committed version of the key, deletions included.
    fn ticket_history(
        &self,
        ctx: &mut dyn LedgerContext,
        id: &str,
    ) -> Result<Vec<TicketVersion>, TicketError>;
}
