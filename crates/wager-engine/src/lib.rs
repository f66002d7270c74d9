//! # wager-engine — Resolution and Settlement
//!
//! Drives every wager from creation to a terminal status.
//!
//! - **Engine** ([`engine`]): [`ResolutionEngine`], the single write
//!   model. Owns the status machine: proposals and their challenge
//!   windows, disputes, source-backed resolution, source timeouts,
//!   mutual refunds, and forced resolution.
//! - **Settlement** ([`settlement`]): [`ClaimSettlement`], the only code
//!   that moves value out of the vault. The engine decides *who* won;
//!   settlement decides *how money moves*.
//! - **Config** ([`config`]): [`ProtocolConfig`], set once per engine.
//! - **Events** ([`events`]): the structured event stream, the only
//!   externally observable history.
//! - **Error** ([`error`]): the four-class error taxonomy.
//!
//! ## Execution Model
//!
//! Fully sequential. Every entry point either completes in one step or
//! fails with a typed error and no observable effect. Time-dependent
//! transitions never fire on their own: each is a guard evaluated against
//! the engine's [`Clock`](wager_core::Clock) when some caller invokes it.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod settlement;

pub use config::{BondForfeiture, ProtocolConfig};
pub use engine::{CreateWager, ResolutionEngine};
pub use error::{ConfigError, ErrorKind, WagerError};
pub use events::{Direction, EventKind, EventLog, ValueMovement, WagerEvent};
pub use settlement::{ClaimBreakdown, ClaimSettlement};
