//! # wager-escrow — Wager Records and Stake Custody
//!
//! - **Wager** ([`wager`]): the canonical per-wager record, its status
//!   graph, and the pending-resolution sub-record.
//! - **Ledger** ([`ledger`]): the store of wager records and the read
//!   model (lookups and paginated listings by participant and status).
//! - **Vault** ([`vault`]): value held against each wager, layered over
//!   an opaque [`ValueTransfer`] collaborator.
//!
//! ## Invariant
//!
//! No record is ever removed from the ledger. Terminal statuses persist
//! for audit.

pub mod error;
pub mod ledger;
pub mod vault;
pub mod wager;

pub use error::EscrowError;
pub use ledger::{Page, PageRequest, WagerLedger, MAX_PAGE_LIMIT};
pub use vault::{InMemoryTransfer, Payout, StakeVault, TransferError, ValueTransfer};
pub use wager::{
    PendingResolution, RefundConsent, ResolutionConfig, ResolutionType, Role, Wager, WagerStatus,
};
