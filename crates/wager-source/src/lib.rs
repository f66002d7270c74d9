//! # wager-source — Outcome Source Capability
//!
//! The resolution engine learns external results through exactly one
//! contract, [`OutcomeSource`]. Concrete sources (threshold price feeds,
//! assertion-based sources, manual reports) implement it; the engine
//! never names a concrete type.
//!
//! - **Traits** ([`traits`]): the `OutcomeSource` contract and its value types.
//! - **Registry** ([`registry`]): maps each `BindingId` to the source that
//!   answers it and dispatches calls. The registry is itself an
//!   `OutcomeSource`, so adding a source type never touches the engine.
//! - **Manual** ([`manual`]): an in-memory source whose answers are set by
//!   an operator. Used by tests and by deployments without a live feed.

pub mod manual;
pub mod registry;
pub mod traits;

pub use manual::ManualReportSource;
pub use registry::OutcomeSourceRegistry;
pub use traits::{OutcomeSource, SourceError, SourceKind, SourceMetadata, SourceOutcome};
