//! # Manual Report Source
//!
//! An in-memory [`OutcomeSource`] whose answers are filed by an operator.
//! Bindings are declared up front with [`ManualReportSource::define`];
//! [`ManualReportSource::report`] settles one, once.
//!
//! Shared through an `Arc`: the registry holds one handle, the operator
//! keeps another.

use std::collections::HashMap;

use parking_lot::RwLock;

use wager_core::{BindingId, Timestamp};

use crate::traits::{OutcomeSource, SourceError, SourceKind, SourceMetadata, SourceOutcome};

#[derive(Debug, Clone)]
struct Entry {
    metadata: SourceMetadata,
    outcome: Option<SourceOutcome>,
}

/// Operator-driven outcome source.
#[derive(Debug, Default)]
pub struct ManualReportSource {
    entries: RwLock<HashMap<BindingId, Entry>>,
}

impl ManualReportSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a binding this source will answer.
    pub fn define(
        &self,
        binding: BindingId,
        description: impl Into<String>,
        expected_resolution_time: Timestamp,
    ) -> Result<(), SourceError> {
        let mut entries = self.entries.write();
        if entries.contains_key(&binding) {
            return Err(SourceError::Duplicate(binding.to_string()));
        }
        entries.insert(
            binding,
            Entry {
                metadata: SourceMetadata {
                    description: description.into(),
                    expected_resolution_time,
                    kind: SourceKind::ManualReport,
                },
                outcome: None,
            },
        );
        Ok(())
    }

    /// File the final answer for a binding.
    ///
    /// Re-filing the same answer is a no-op; filing a different one is
    /// rejected because a resolved answer never changes.
    pub fn report(
        &self,
        binding: &BindingId,
        outcome: bool,
        resolved_at: Timestamp,
    ) -> Result<(), SourceError> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(binding)
            .ok_or_else(|| SourceError::UnknownBinding(binding.clone()))?;
        match entry.outcome {
            Some(existing) if existing.outcome == outcome => Ok(()),
            Some(_) => Err(SourceError::Rejected {
                binding: binding.clone(),
                reason: "binding already resolved with the opposite outcome".to_string(),
            }),
            None => {
                entry.outcome = Some(SourceOutcome {
                    outcome,
                    resolved_at,
                });
                tracing::info!(binding = %binding, outcome, "manual outcome reported");
                Ok(())
            }
        }
    }
}

impl OutcomeSource for ManualReportSource {
    fn is_resolved(&self, binding: &BindingId) -> Result<bool, SourceError> {
        self.entries
            .read()
            .get(binding)
            .map(|e| e.outcome.is_some())
            .ok_or_else(|| SourceError::UnknownBinding(binding.clone()))
    }

    fn outcome(&self, binding: &BindingId) -> Result<SourceOutcome, SourceError> {
        let entries = self.entries.read();
        let entry = entries
            .get(binding)
            .ok_or_else(|| SourceError::UnknownBinding(binding.clone()))?;
        entry
            .outcome
            .ok_or_else(|| SourceError::Unresolved(binding.clone()))
    }

    fn metadata(&self, binding: &BindingId) -> Result<SourceMetadata, SourceError> {
        self.entries
            .read()
            .get(binding)
            .map(|e| e.metadata.clone())
            .ok_or_else(|| SourceError::UnknownBinding(binding.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(s: &str) -> BindingId {
        BindingId::new(s).unwrap()
    }

    fn t0() -> Timestamp {
        Timestamp::parse("2026-03-01T00:00:00Z").unwrap()
    }

    #[test]
    fn defined_binding_starts_unresolved() {
        let src = ManualReportSource::new();
        src.define(binding("match-1"), "home team wins", t0()).unwrap();
        assert!(!src.is_resolved(&binding("match-1")).unwrap());
        assert_eq!(
            src.outcome(&binding("match-1")),
            Err(SourceError::Unresolved(binding("match-1")))
        );
        let meta = src.metadata(&binding("match-1")).unwrap();
        assert_eq!(meta.description, "home team wins");
        assert_eq!(meta.kind, SourceKind::ManualReport);
    }

    #[test]
    fn report_resolves_binding() {
        let src = ManualReportSource::new();
        src.define(binding("match-1"), "home team wins", t0()).unwrap();
        src.report(&binding("match-1"), false, t0()).unwrap();
        assert!(src.is_resolved(&binding("match-1")).unwrap());
        let out = src.outcome(&binding("match-1")).unwrap();
        assert!(!out.outcome);
        assert_eq!(out.resolved_at, t0());
    }

    #[test]
    fn conflicting_report_is_rejected() {
        let src = ManualReportSource::new();
        src.define(binding("m"), "q", t0()).unwrap();
        src.report(&binding("m"), true, t0()).unwrap();
        src.report(&binding("m"), true, t0()).unwrap();
        assert!(matches!(
            src.report(&binding("m"), false, t0()),
            Err(SourceError::Rejected { .. })
        ));
        assert!(src.outcome(&binding("m")).unwrap().outcome);
    }

    #[test]
    fn unknown_binding_errors() {
        let src = ManualReportSource::new();
        assert!(matches!(
            src.is_resolved(&binding("nope")),
            Err(SourceError::UnknownBinding(_))
        ));
        assert!(src.report(&binding("nope"), true, t0()).is_err());
    }

    #[test]
    fn duplicate_define_rejected() {
        let src = ManualReportSource::new();
        src.define(binding("m"), "q", t0()).unwrap();
        assert!(matches!(
            src.define(binding("m"), "q", t0()),
            Err(SourceError::Duplicate(_))
        ));
    }
}
