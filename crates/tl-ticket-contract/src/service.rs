//! # Ticket Contract Service
//!
//! The operations engine. Every mutation reads the current record, checks
//! the transition against the domain invariants and writes a new version;
//! there is no in-memory ticket state between calls.
//!
//! ## Concurrency
//!
//! Each call runs inside one host transaction and is synchronous. The
//! existence check in `generate_ticket` is advisory: two transactions can
//! both see an absent id. The host's commit-time MVCC validation rejects
//! the loser; no cross-transaction locking is attempted here.

use crate::config::ContractConfig;
use crate::domain::{
    check_transition, invariant_unsold_at_creation, normalize_owner, parse_day, parse_price,
    reprice_precondition, require_non_empty, Ticket, TicketEntry, TicketError, TicketVersion,
};
use crate::ports::inbound::TicketContractApi;
use crate::ports::outbound::{ticket_selector, LedgerContext};
use tracing::{debug, info, instrument, warn};

/// The ticket operations engine.
#[derive(Debug, Clone, Default)]
pub struct TicketContractService {
    config: ContractConfig,
}

impl TicketContractService {
    /// Create a service with the given configuration.
    #[must_use]
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    fn load(ctx: &mut dyn LedgerContext, id: &str) -> Result<Ticket, TicketError> {
        match ctx.get_state(id)? {
            Some(bytes) => Ticket::from_bytes(id, &bytes),
            None => Err(TicketError::NotFound { id: id.to_string() }),
        }
    }

    fn store(
        ctx: &mut dyn LedgerContext,
        before: &Ticket,
        after: Ticket,
        action: &'static str,
    ) -> Result<Ticket, TicketError> {
        if let Err(err) = check_transition(before, &after, action) {
            warn!(id = %before.id, error = %err, "Rejected {action}");
            return Err(err);
        }
        ctx.put_state(&after.id, after.to_bytes()?)?;
        Ok(after)
    }
}

impl TicketContractApi for TicketContractService {
    #[instrument(skip(self, ctx, price, day, seat), fields(tx_id = %ctx.tx_id()))]
    fn generate_ticket(
        &self,
        ctx: &mut dyn LedgerContext,
        id: &str,
        price: &str,
        day: &str,
        seat: &str,
    ) -> Result<Ticket, TicketError> {
        let id = require_non_empty("id", id)?;
        require_non_empty("price", price)?;
        require_non_empty("day", day)?;
        let seat = require_non_empty("seat", seat)?;
        let price = parse_price(price)?;
        let day = parse_day(day)?;

        if ctx.get_state(id)?.is_some() {
            warn!(id, "Ticket already exists");
            return Err(TicketError::AlreadyExists { id: id.to_string() });
        }

        let ticket = Ticket::new(id, price, day, seat);
        invariant_unsold_at_creation(&ticket)?;
        ctx.put_state(id, ticket.to_bytes()?)?;

        info!(id, price, day, seat, "Ticket generated");
        Ok(ticket)
    }

    #[instrument(skip(self, ctx, new_owner), fields(tx_id = %ctx.tx_id()))]
    fn transfer_ticket(
        &self,
        ctx: &mut dyn LedgerContext,
        id: &str,
        new_owner: &str,
    ) -> Result<Ticket, TicketError> {
        let id = require_non_empty("id", id)?;
        let new_owner = normalize_owner(require_non_empty("new owner", new_owner)?);

        let before = Self::load(ctx, id)?;
        let after = Ticket {
            owner: new_owner,
            ..before.clone()
        };
        let ticket = Self::store(ctx, &before, after, "transfer")?;

        info!(id, from = %before.owner, to = %ticket.owner, "Ticket transferred");
        Ok(ticket)
    }

    #[instrument(skip(self, ctx, new_price), fields(tx_id = %ctx.tx_id()))]
    fn reprice_ticket(
        &self,
        ctx: &mut dyn LedgerContext,
        id: &str,
        new_price: &str,
    ) -> Result<Ticket, TicketError> {
        let id = require_non_empty("id", id)?;
        let new_price = parse_price(new_price)?;

        let before = Self::load(ctx, id)?;
        if let Err(err) = reprice_precondition(&before) {
            warn!(id, error = %err, "Rejected reprice");
            return Err(err);
        }
        let after = Ticket {
            price: new_price,
            ..before.clone()
        };
        let ticket = Self::store(ctx, &before, after, "reprice")?;

        info!(id, from = before.price, to = ticket.price, "Ticket repriced");
        Ok(ticket)
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn lock_ticket(&self, ctx: &mut dyn LedgerContext, id: &str) -> Result<Ticket, TicketError> {
        let id = require_non_empty("id", id)?;

        let before = Self::load(ctx, id)?;
        if before.locked {
            debug!(id, "Ticket already locked");
            return Ok(before);
        }

        let after = Ticket {
            locked: true,
            ..before.clone()
        };
        let ticket = Self::store(ctx, &before, after, "lock")?;

        info!(id, owner = %ticket.owner, "Ticket locked");
        Ok(ticket)
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn delete_ticket(&self, ctx: &mut dyn LedgerContext, id: &str) -> Result<(), TicketError> {
        let id = require_non_empty("id", id)?;

        // Existence only: a corrupt record must still be removable.
        if ctx.get_state(id)?.is_none() {
            return Err(TicketError::NotFound { id: id.to_string() });
        }
        ctx.delete_state(id)?;

        info!(id, "Ticket deleted");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn query_ticket(&self, ctx: &mut dyn LedgerContext, id: &str) -> Result<Ticket, TicketError> {
        let id = require_non_empty("id", id)?;
        Self::load(ctx, id)
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn query_ticket_by_owner(
        &self,
        ctx: &mut dyn LedgerContext,
        owner: &str,
    ) -> Result<Vec<TicketEntry>, TicketError> {
        let owner = normalize_owner(require_non_empty("owner", owner)?);
        let query = ticket_selector("owner", &owner);
        debug!(%query, "Running owner query");

        let mut entries = Vec::new();
        for item in ctx.get_query_result(&query)? {
            let record = item?;
            let ticket = Ticket::from_bytes(&record.key, &record.value)?;
            entries.push(TicketEntry {
                id: record.key,
                ticket,
            });
        }

        debug!(owner = %owner, count = entries.len(), "Owner query complete");
        Ok(entries)
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn query_all_tickets(
        &self,
        ctx: &mut dyn LedgerContext,
    ) -> Result<Vec<TicketEntry>, TicketError> {
        let mut entries = Vec::new();
        let mut skipped = 0usize;
        let scan = ctx.get_state_by_range(&self.config.scan_start_key, &self.config.scan_end_key)?;
        for item in scan {
            let record = item?;
            match Ticket::classify(&record.key, &record.value)? {
                Some(ticket) => entries.push(TicketEntry {
                    id: record.key,
                    ticket,
                }),
                None => skipped += 1,
            }
        }

        debug!(count = entries.len(), skipped, "Full scan complete");
        Ok(entries)
    }

    #[instrument(skip(self, ctx), fields(tx_id = %ctx.tx_id()))]
    fn ticket_history(
        &self,
        ctx: &mut dyn LedgerContext,
        id: &str,
    ) -> Result<Vec<TicketVersion>, TicketError> {
        let id = require_non_empty("id", id)?;

        let mut versions = Vec::new();
        for item in ctx.get_history_for_key(id)? {
            let modification = item?;
            let ticket = match (&modification.value, modification.is_delete) {
                (_, true) => None,
                (Some(bytes), false) => Some(Ticket::from_bytes(id, bytes)?),
                (None, false) => {
                    return Err(TicketError::MalformedRecord {
                        key: id.to_string(),
                        reason: format!("write in {} has no value", modification.tx_id),
                    })
                }
            };
            versions.push(TicketVersion {
                tx_id: modification.tx_id,
                ticket,
                timestamp: modification.timestamp,
                is_delete: modification.is_delete,
            });
        }

        debug!(id, versions = versions.len(), "History read");
        Ok(versions)
    }
}

// =============================================================================
// TESTS
// =============================================================================
