//! # Escrow Error Types
//!
//! Every variant carries the wager id and enough state to diagnose the
//! failure without inspecting logs.

use thiserror::Error;

use wager_core::{Amount, ValidationError, WagerId};

use crate::vault::TransferError;

/// Errors from the ledger, the status graph, and the vault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    /// The requested status change is not an edge of the status graph.
    #[error("invalid wager transition for {wager_id}: {from} -> {to}")]
    InvalidTransition {
        /// The wager.
        wager_id: WagerId,
        /// Current status name.
        from: &'static str,
        /// Attempted status name.
        to: &'static str,
    },

    /// No wager with this id exists.
    #[error("unknown wager {0}")]
    UnknownWager(WagerId),

    /// A wager with this id already exists.
    #[error("wager {0} already recorded")]
    DuplicateWager(WagerId),

    /// A disbursement asked for more than the vault holds for the wager.
    #[error("vault holds {held} for {wager_id}, cannot disburse {requested}")]
    InsufficientHeld {
        /// The wager.
        wager_id: WagerId,
        /// Amount currently held.
        held: Amount,
        /// Amount requested.
        requested: Amount,
    },

    /// The value-transfer collaborator refused a deposit.
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),

    /// Amount arithmetic out of range.
    #[error("invalid amount: {0}")]
    Amount(#[from] ValidationError),
}
