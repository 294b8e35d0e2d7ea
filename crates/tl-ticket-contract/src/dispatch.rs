//! # Invocation Dispatch
//!
//! Entry point used by the host: maps an operation name and positional
//! string arguments onto the ticket API and wraps the outcome in a
//! [`ChaincodeResponse`].
//!
//! | Operation | Arguments | Payload |
//! |-----------|-----------|---------|
//! | `generateTicket` | id, price, day, seat | empty |
//! | `transferTicket` | id, newOwner | empty |
//! | `queryTicket` | id | ticket |
//! | `queryTicketByOwner` | owner | ticket set |
//! | `repriceTicket` | id, newPrice | empty |
//! | `deleteTicket` | id | empty |
//! | `ticketHistory` | id | history |
//! | `queryAllTickets` | | ticket set |
//! | `lockTicket` | id | empty |
//! | `contractVersion` | | version |

use crate::config::ContractConfig;
use crate::domain::{ErrorKind, TicketError};
use crate::encoding::{encode_entries, encode_history, encode_ticket, encode_version};
use crate::metrics::{ContractMetrics, MetricsSnapshot};
use crate::ports::inbound::TicketContractApi;
use crate::ports::outbound::LedgerContext;
use crate::service::TicketContractService;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, error, info, warn};

// =============================================================================
// OPERATIONS
// =============================================================================

/// Metric label for invocations naming no known operation.
pub const UNKNOWN_OPERATION_LABEL: &str = "unknown";

/// Operations exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `generateTicket(id, price, day, seat)`
    GenerateTicket,
    /// `transferTicket(id, newOwner)`
    TransferTicket,
    /// `queryTicket(id)`
    QueryTicket,
    /// `queryTicketByOwner(owner)`
    QueryTicketByOwner,
    /// `repriceTicket(id, newPrice)`
    RepriceTicket,
    /// `deleteTicket(id)`
    DeleteTicket,
    /// `ticketHistory(id)`
    TicketHistory,
    /// `queryAllTickets()`
    QueryAllTickets,
    /// `lockTicket(id)`
    LockTicket,
    /// `contractVersion()`
    ContractVersion,
}

impl Operation {
    /// All operations.
    pub const ALL: [Operation; 10] = [
        Operation::GenerateTicket,
        Operation::TransferTicket,
        Operation::QueryTicket,
        Operation::QueryTicketByOwner,
        Operation::RepriceTicket,
        Operation::DeleteTicket,
        Operation::TicketHistory,
        Operation::QueryAllTickets,
        Operation::LockTicket,
        Operation::ContractVersion,
    ];

    /// Name used by callers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operation::GenerateTicket => "generateTicket",
            Operation::TransferTicket => "transferTicket",
            Operation::QueryTicket => "queryTicket",
            Operation::QueryTicketByOwner => "queryTicketByOwner",
            Operation::RepriceTicket => "repriceTicket",
            Operation::DeleteTicket => "deleteTicket",
            Operation::TicketHistory => "ticketHistory",
            Operation::QueryAllTickets => "queryAllTickets",
            Operation::LockTicket => "lockTicket",
            Operation::ContractVersion => "contractVersion",
        }
    }

    /// Positional parameter names.
    #[must_use]
    pub fn params(self) -> &'static [&'static str] {
        match self {
            Operation::GenerateTicket => &["id", "price", "day", "seat"],
            Operation::TransferTicket => &["id", "newOwner"],
            Operation::RepriceTicket => &["id", "newPrice"],
            Operation::QueryTicketByOwner => &["owner"],
            Operation::QueryTicket
            | Operation::DeleteTicket
            | Operation::TicketHistory
            | Operation::LockTicket => &["id"],
            Operation::QueryAllTickets | Operation::ContractVersion => &[],
        }
    }

    /// True for operations that never write.
    #[must_use]
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            Operation::QueryTicket
                | Operation::QueryTicketByOwner
                | Operation::TicketHistory
                | Operation::QueryAllTickets
                | Operation::ContractVersion
        )
    }

    fn check_arity(self, args: &[String]) -> Result<(), TicketError> {
        let params = self.params();
        if args.len() != params.len() {
            return Err(TicketError::InvalidArgument(format!(
                "incorrect number of arguments for {}: expecting {} ({}), got {}",
                self.name(),
                params.len(),
                params.join(", "),
                args.len()
            )));
        }
        Ok(())
    }
}

impl FromStr for Operation {
    type Err = TicketError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| TicketError::FunctionNotFound(name.to_string()))
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// INVOCATION / RESPONSE
// =============================================================================

/// A call as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Operation name.
    pub function: String,
    /// Positional arguments.
    pub args: Vec<String>,
}

impl Invocation {
    /// Build an invocation from a name and arguments.
    pub fn new<I, S>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split the host's argument vector: the first element names the
    /// function, the rest are its arguments.
    pub fn from_args(mut args: Vec<String>) -> Result<Self, TicketError> {
        if args.is_empty() {
            return Err(TicketError::FunctionNotFound(String::new()));
        }
        let function = args.remove(0);
        Ok(Self { function, args })
    }
}

/// Response returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeResponse {
    /// `200` on success, `500` on failure.
    pub status: u16,
    /// Human-readable failure message; empty on success.
    pub message: String,
    /// Failure classification; `None` on success.
    pub error_kind: Option<ErrorKind>,
    /// Query payload; empty for mutations.
    pub payload: Vec<u8>,
}

impl ChaincodeResponse {
    /// Success status.
    pub const OK: u16 = 200;
    /// Failure status.
    pub const ERROR: u16 = 500;

    /// Success with a payload.
    #[must_use]
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: Self::OK,
            message: String::new(),
            error_kind: None,
            payload,
        }
    }

    /// Failure carrying the error's kind and message.
    #[must_use]
    pub fn error(err: &TicketError) -> Self {
        Self {
            status: Self::ERROR,
            message: err.to_string(),
            error_kind: Some(err.kind()),
            payload: Vec::new(),
        }
    }

    /// True for a success response.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

impl From<Result<Vec<u8>, TicketError>> for ChaincodeResponse {
    fn from(result: Result<Vec<u8>, TicketError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => Self::error(&err),
        }
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

/// The ticket contract as seen by the host.
#[derive(Debug, Default)]
pub struct TicketContract<A = TicketContractService> {
    api: A,
    metrics: ContractMetrics,
    log_payloads: bool,
}

impl TicketContract<TicketContractService> {
    /// Contract backed by the standard service.
    #[must_use]
    pub fn new(config: ContractConfig) -> Self {
        let log_payloads = config.log_payloads;
        Self::with_api(TicketContractService::new(config), log_payloads)
    }
}

impl<A: TicketContractApi> TicketContract<A> {
    /// Contract backed by a custom API implementation.
    pub fn with_api(api: A, log_payloads: bool) -> Self {
        Self {
            api,
            metrics: ContractMetrics::new(),
            log_payloads,
        }
    }

    /// Instantiation hook; nothing to set up.
    pub fn init(&self, ctx: &mut dyn LedgerContext) -> ChaincodeResponse {
        info!(tx_id = %ctx.tx_id(), "Ticket contract instantiated");
        ChaincodeResponse::success(Vec::new())
    }

    /// Invocation counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Run one invocation and record its outcome.
    pub fn invoke(&self, ctx: &mut dyn LedgerContext, invocation: &Invocation) -> ChaincodeResponse {
        let start = Instant::now();
        let result = self.execute(ctx, invocation);
        let elapsed = start.elapsed();
        let function = invocation.function.as_str();
        // Metric labels stay bounded to the known operation names.
        let label = function
            .parse::<Operation>()
            .map_or(UNKNOWN_OPERATION_LABEL, Operation::name);

        match &result {
            Ok(payload) => {
                self.metrics.record_success(elapsed);
                tl_telemetry::record_operation(label, "success", elapsed);
                if self.log_payloads && !payload.is_empty() {
                    debug!(
                        function,
                        payload = %String::from_utf8_lossy(payload),
                        "Invocation payload"
                    );
                }
            }
            Err(err) => {
                self.metrics.record_failure(err.kind(), elapsed);
                tl_telemetry::record_operation(label, err.kind().as_str(), elapsed);
                if err.kind() == ErrorKind::BackendFailure {
                    error!(function, error = %err, "Ledger failure");
                } else {
                    warn!(function, kind = %err.kind(), error = %err, "Invocation rejected");
                }
            }
        }

        ChaincodeResponse::from(result)
    }

    /// Run one invocation, returning the payload or the typed error.
    pub fn execute(
        &self,
        ctx: &mut dyn LedgerContext,
        invocation: &Invocation,
    ) -> Result<Vec<u8>, TicketError> {
        let op: Operation = invocation.function.parse()?;
        op.check_arity(&invocation.args)?;
        let args = &invocation.args;

        match op {
            Operation::GenerateTicket => self
                .api
                .generate_ticket(ctx, &args[0], &args[1], &args[2], &args[3])
                .map(|_| Vec::new()),
            Operation::TransferTicket => self
                .api
                .transfer_ticket(ctx, &args[0], &args[1])
                .map(|_| Vec::new()),
            Operation::RepriceTicket => self
                .api
                .reprice_ticket(ctx, &args[0], &args[1])
                .map(|_| Vec::new()),
            Operation::LockTicket => self.api.lock_ticket(ctx, &args[0]).map(|_| Vec::new()),
            Operation::DeleteTicket => self.api.delete_ticket(ctx, &args[0]).map(|()| Vec::new()),
            Operation::QueryTicket => encode_ticket(&self.api.query_ticket(ctx, &args[0])?),
            Operation::QueryTicketByOwner => {
                encode_entries(&self.api.query_ticket_by_owner(ctx, &args[0])?)
            }
            Operation::QueryAllTickets => encode_entries(&self.api.query_all_tickets(ctx)?),
            Operation::TicketHistory => encode_history(&self.api.ticket_history(ctx, &args[0])?),
            Operation::ContractVersion => encode_version(crate::VERSION),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
