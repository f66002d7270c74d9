//! # wager-core — Foundational Types for the Wager Protocol
//!
//! Defines the primitives every other crate in the workspace builds on.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `WagerId`, `PartyId`, `AssetId`,
//!    `BindingId` are distinct types. You cannot pass a party where a wager
//!    id is expected.
//!
//! 2. **Base-unit amounts.** [`Amount`] is an unsigned count of the smallest
//!    unit of the staked asset. All arithmetic is checked; fee math is
//!    integer basis points with floor rounding.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] is UTC with seconds precision.
//!
//! 4. **Time is read, never awaited.** The [`Clock`] capability is read once
//!    per operation. There are no timers anywhere in the protocol.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod error;
pub mod identity;
pub mod temporal;

pub use amount::{Amount, BASIS_POINTS_DENOMINATOR};
pub use error::ValidationError;
pub use identity::{AssetId, BindingId, PartyId, WagerId};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
