//! # Wager Error Taxonomy
//!
//! Four classes, all surfaced synchronously and never retried internally:
//!
//! | Class | Meaning |
//! |-------|---------|
//! | Validation | Bad input, rejected before any mutation |
//! | Precondition | Wrong status for the requested transition |
//! | Authorization | Caller lacks the role the transition requires |
//! | Window | A time bound was violated, too early or too late |
//!
//! There is no fatal class. A wager stuck on a silent source or an absent
//! winner is a designed-for condition with its own recovery transition.

use thiserror::Error;

use wager_core::{PartyId, Timestamp, ValidationError, WagerId};
use wager_escrow::{EscrowError, Wager, WagerStatus};
use wager_source::SourceError;

/// The class of a [`WagerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input.
    Validation,
    /// Wrong status.
    Precondition,
    /// Wrong caller.
    Authorization,
    /// Wrong time.
    Window,
}

/// Errors returned by every engine entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WagerError {
    /// Input rejected before any mutation.
    #[error("validation error: {0}")]
    Validation(String),

    /// No wager with this id exists.
    #[error("unknown wager {0}")]
    UnknownWager(WagerId),

    /// The wager is not in a status that permits the operation.
    #[error("cannot {operation} wager {wager_id} in status {status}: {reason}")]
    Precondition {
        /// The wager.
        wager_id: WagerId,
        /// The attempted operation.
        operation: &'static str,
        /// Status at the time of the attempt.
        status: WagerStatus,
        /// Why the operation was refused.
        reason: String,
    },

    /// The caller does not hold the role the operation requires.
    #[error("{actor} may not {operation} wager {wager_id}: {reason}")]
    Authorization {
        /// The wager.
        wager_id: WagerId,
        /// The attempted operation.
        operation: &'static str,
        /// Who attempted it.
        actor: PartyId,
        /// Which role was required.
        reason: String,
    },

    /// The operation was attempted outside its time bound.
    #[error("cannot {operation} wager {wager_id} at {now}: {reason}")]
    Window {
        /// The wager.
        wager_id: WagerId,
        /// The attempted operation.
        operation: &'static str,
        /// Clock reading at the attempt.
        now: Timestamp,
        /// Which bound was violated.
        reason: String,
    },

    /// Ledger or vault refused the operation.
    #[error("escrow error: {0}")]
    Escrow(#[from] EscrowError),

    /// The outcome source refused a query.
    #[error("outcome source error: {0}")]
    Source(#[from] SourceError),
}

impl WagerError {
    /// The taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::UnknownWager(_) => ErrorKind::Validation,
            Self::Precondition { .. } => ErrorKind::Precondition,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::Window { .. } => ErrorKind::Window,
            Self::Escrow(e) => match e {
                EscrowError::InvalidTransition { .. } | EscrowError::InsufficientHeld { .. } => {
                    ErrorKind::Precondition
                }
                EscrowError::UnknownWager(_)
                | EscrowError::DuplicateWager(_)
                | EscrowError::Transfer(_)
                | EscrowError::Amount(_) => ErrorKind::Validation,
            },
            Self::Source(e) => match e {
                SourceError::Unresolved(_) => ErrorKind::Precondition,
                _ => ErrorKind::Validation,
            },
        }
    }
}

impl WagerError {
    pub(crate) fn precondition(
        wager: &Wager,
        operation: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Precondition {
            wager_id: wager.id,
            operation,
            status: wager.status,
            reason: reason.into(),
        }
    }

    pub(crate) fn authorization(
        wager: &Wager,
        operation: &'static str,
        actor: &PartyId,
        reason: impl Into<String>,
    ) -> Self {
        Self::Authorization {
            wager_id: wager.id,
            operation,
            actor: actor.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn window(
        wager: &Wager,
        operation: &'static str,
        now: Timestamp,
        reason: impl Into<String>,
    ) -> Self {
        Self::Window {
            wager_id: wager.id,
            operation,
            now,
            reason: reason.into(),
        }
    }
}

impl From<ValidationError> for WagerError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Errors loading or validating a [`ProtocolConfig`](crate::ProtocolConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A field holds a value the protocol cannot run with.
    #[error("invalid config field {field}: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
