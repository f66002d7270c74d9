//! # Outcome Source Trait
//!
//! Defines the abstract interface every outcome source satisfies. The
//! engine calls nothing beyond these three queries.
//!
//! ## Invariant
//!
//! Once `is_resolved` returns `true` for a binding, `outcome` returns the
//! same answer on every later call. A source that could change its
//! answer after resolving must not report resolved until it is final.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wager_core::{BindingId, Timestamp};

/// Errors raised by an outcome source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No source answers this binding.
    #[error("unknown outcome binding {0}")]
    UnknownBinding(BindingId),

    /// The binding has no final answer yet.
    #[error("outcome binding {0} is not resolved")]
    Unresolved(BindingId),

    /// No source is registered under this name.
    #[error("unknown outcome source {0:?}")]
    UnknownSource(String),

    /// A binding or source name was registered twice.
    #[error("duplicate registration: {0}")]
    Duplicate(String),

    /// The source refused an operator action.
    #[error("source rejected report for {binding}: {reason}")]
    Rejected {
        /// The binding the report targeted.
        binding: BindingId,
        /// Why the report was refused.
        reason: String,
    },
}

/// Families of outcome source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Resolves when a price or metric feed crosses a threshold.
    ThresholdFeed,
    /// Resolves when a bonded assertion survives its own liveness window.
    Assertion,
    /// Resolves when an operator files a report.
    ManualReport,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ThresholdFeed => "threshold_feed",
            Self::Assertion => "assertion",
            Self::ManualReport => "manual_report",
        };
        f.write_str(s)
    }
}

/// A final answer from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOutcome {
    /// `true` if the bound proposition came true.
    pub outcome: bool,
    /// When the source settled on this answer.
    pub resolved_at: Timestamp,
}

/// Descriptive data about a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Human-readable question the binding answers.
    pub description: String,
    /// When the source expects to have an answer.
    pub expected_resolution_time: Timestamp,
    /// Which family of source answers this binding.
    pub kind: SourceKind,
}

/// Capability contract for anything that can resolve a wager.
///
/// `Send + Sync` so one source can be shared across engines.
pub trait OutcomeSource: Send + Sync {
    /// Whether the binding has a final answer.
    fn is_resolved(&self, binding: &BindingId) -> Result<bool, SourceError>;

    /// The final answer.
    ///
    /// # Errors
    ///
    /// [`SourceError::Unresolved`] if `is_resolved` would return `false`.
    fn outcome(&self, binding: &BindingId) -> Result<SourceOutcome, SourceError>;

    /// Descriptive data about the binding.
    fn metadata(&self, binding: &BindingId) -> Result<SourceMetadata, SourceError>;
}
