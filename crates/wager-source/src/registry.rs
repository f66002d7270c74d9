//! # Outcome Source Registry
//!
//! Routes each [`BindingId`] to the named source that answers it. The
//! registry implements [`OutcomeSource`] by dispatch, so the engine holds
//! one `Arc<dyn OutcomeSource>` no matter how many source types exist.
//!
//! ```text
//! engine ──is_resolved(b)──▶ registry ──bindings[b]──▶ "feeds" ──▶ dyn OutcomeSource
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use wager_core::BindingId;

use crate::traits::{OutcomeSource, SourceError, SourceMetadata, SourceOutcome};

/// Dispatching registry of outcome sources.
#[derive(Default)]
pub struct OutcomeSourceRegistry {
    sources: RwLock<HashMap<String, Arc<dyn OutcomeSource>>>,
    bindings: RwLock<HashMap<BindingId, String>>,
}

impl std::fmt::Debug for OutcomeSourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutcomeSourceRegistry")
            .field("sources", &self.source_names())
            .field("bindings", &self.bindings.read().len())
            .finish()
    }
}

impl OutcomeSourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under a unique name.
    pub fn register_source(
        &self,
        name: impl Into<String>,
        source: Arc<dyn OutcomeSource>,
    ) -> Result<(), SourceError> {
        let name = name.into();
        let mut sources = self.sources.write();
        if sources.contains_key(&name) {
            return Err(SourceError::Duplicate(format!("source {name:?}")));
        }
        tracing::debug!(source = %name, "outcome source registered");
        sources.insert(name, source);
        Ok(())
    }

    /// Route `binding` to the source registered as `source_name`.
    ///
    /// The source must already know the binding: its metadata is queried
    /// before the route is recorded.
    pub fn bind(&self, binding: BindingId, source_name: &str) -> Result<(), SourceError> {
        let source = self
            .sources
            .read()
            .get(source_name)
            .cloned()
            .ok_or_else(|| SourceError::UnknownSource(source_name.to_string()))?;
        source.metadata(&binding)?;

        let mut bindings = self.bindings.write();
        if bindings.contains_key(&binding) {
            return Err(SourceError::Duplicate(format!("binding {binding}")));
        }
        tracing::debug!(binding = %binding, source = source_name, "outcome binding routed");
        bindings.insert(binding, source_name.to_string());
        Ok(())
    }

    /// Whether a route exists for `binding`.
    pub fn is_bound(&self, binding: &BindingId) -> bool {
        self.bindings.read().contains_key(binding)
    }

    /// Names of all registered sources, sorted.
    pub fn source_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sources.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn route(&self, binding: &BindingId) -> Result<Arc<dyn OutcomeSource>, SourceError> {
        let name = self
            .bindings
            .read()
            .get(binding)
            .cloned()
            .ok_or_else(|| SourceError::UnknownBinding(binding.clone()))?;
        self.sources
            .read()
            .get(&name)
            .cloned()
            .ok_or(SourceError::UnknownSource(name))
    }
}

impl OutcomeSource for OutcomeSourceRegistry {
    fn is_resolved(&self, binding: &BindingId) -> Result<bool, SourceError> {
        self.route(binding)?.is_resolved(binding)
    }

    fn outcome(&self, binding: &BindingId) -> Result<SourceOutcome, SourceError> {
        self.route(binding)?.outcome(binding)
    }

    fn metadata(&self, binding: &BindingId) -> Result<SourceMetadata, SourceError> {
        self.route(binding)?.metadata(binding)
    }
}
