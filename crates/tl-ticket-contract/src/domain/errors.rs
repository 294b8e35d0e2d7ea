//! # Domain Errors
//!
//! Failure taxonomy for the ticket contract and for the ledger port it sits on.

use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors raised by the host ledger behind the `LedgerContext` port.
///
/// The display text is the ledger's own message; the contract passes it
/// through untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Generic backend failure (connection, storage, iterator).
    #[error("{0}")]
    Backend(String),

    /// A key read by the transaction was modified before commit.
    #[error("MVCC read conflict on key {key}")]
    MvccConflict {
        /// Key whose version changed
        key: String,
    },

    /// The predicate query could not be parsed by the ledger.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

// =============================================================================
// TICKET ERRORS
// =============================================================================

/// Classification tag for [`TicketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// Arity or parse failure.
    InvalidArgument,
    /// Generate on an id that already has a record.
    AlreadyExists,
    /// No record under the requested id.
    NotFound,
    /// Mutation attempted on a locked ticket.
    LockedViolation,
    /// Reprice attempted on a sold ticket.
    AlreadySold,
    /// Lock attempted on an unsold ticket.
    UnsoldViolation,
    /// Stored bytes do not decode into a ticket.
    MalformedRecord,
    /// The ledger context itself failed.
    BackendFailure,
    /// Unknown operation name.
    FunctionNotFound,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::InvalidArgument,
        ErrorKind::AlreadyExists,
        ErrorKind::NotFound,
        ErrorKind::LockedViolation,
        ErrorKind::AlreadySold,
        ErrorKind::UnsoldViolation,
        ErrorKind::MalformedRecord,
        ErrorKind::BackendFailure,
        ErrorKind::FunctionNotFound,
    ];

    /// Stable name used in responses, logs and metric labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::LockedViolation => "LockedViolation",
            ErrorKind::AlreadySold => "AlreadySold",
            ErrorKind::UnsoldViolation => "UnsoldViolation",
            ErrorKind::MalformedRecord => "MalformedRecord",
            ErrorKind::BackendFailure => "BackendFailure",
            ErrorKind::FunctionNotFound => "FunctionNotFound",
        }
    }

    /// Position inside [`ErrorKind::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket contract error types.
///
/// Every failure is terminal for the current invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// Wrong number of arguments, empty argument, or unparseable number.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A record already exists under the id.
    #[error("ticket already exists: {id}")]
    AlreadyExists {
        /// Ticket id
        id: String,
    },

    /// No record under the id.
    #[error("ticket not found: {id}")]
    NotFound {
        /// Ticket id
        id: String,
    },

    /// The ticket is locked; owner and price are frozen.
    #[error("cannot {action} locked ticket {id}")]
    LockedViolation {
        /// Ticket id
        id: String,
        /// Rejected action
        action: &'static str,
    },

    /// The ticket has an owner and can no longer be repriced.
    #[error("cannot reprice sold ticket {id}")]
    AlreadySold {
        /// Ticket id
        id: String,
    },

    /// The ticket has no owner and cannot be locked.
    #[error("cannot lock unsold ticket {id}")]
    UnsoldViolation {
        /// Ticket id
        id: String,
    },

    /// Stored bytes under the key do not parse into a ticket.
    #[error("malformed record under key {key}: {reason}")]
    MalformedRecord {
        /// Storage key
        key: String,
        /// Decoder message
        reason: String,
    },

    /// The ledger context failed; message is the ledger's.
    #[error(transparent)]
    BackendFailure(#[from] LedgerError),

    /// Unknown operation name.
    #[error("function not found: {0}")]
    FunctionNotFound(String),
}

impl TicketError {
    /// Taxonomy tag of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TicketError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            TicketError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            TicketError::NotFound { .. } => ErrorKind::NotFound,
            TicketError::LockedViolation { .. } => ErrorKind::LockedViolation,
            TicketError::AlreadySold { .. } => ErrorKind::AlreadySold,
            TicketError::UnsoldViolation { .. } => ErrorKind::UnsoldViolation,
            TicketError::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            TicketError::BackendFailure(_) => ErrorKind::BackendFailure,
            TicketError::FunctionNotFound(_) => ErrorKind::FunctionNotFound,
        }
    }

    pub(crate) fn malformed(key: &str, reason: impl ToString) -> Self {
        TicketError::MalformedRecord {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
