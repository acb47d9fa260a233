//! Filter controller: applies include/exclude changes to a live store.

use keepalive_core::{CacheKey, ComponentInstance, Filters, InstanceId, Pattern};

use crate::cache::CacheStore;

/// Owns the current include/exclude patterns.
#[derive(Debug, Clone, Default)]
pub struct FilterController {
    filters: Filters,
}

impl FilterController {
    pub fn new(filters: Filters) -> Self {
        Self { filters }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Render-time eligibility of a component name.
    pub fn admits(&self, name: Option<&str>) -> bool {
        self.filters.admits(name)
    }

    /// Replace the patterns and prune every entry whose name no longer passes.
    ///
    /// Pruning respects the active instance. Returns the pruned keys.
    pub fn replace<I: ComponentInstance>(
        &mut self,
        include: Option<Pattern>,
        exclude: Option<Pattern>,
        store: &mut CacheStore<I>,
        active: Option<InstanceId>,
    ) -> Vec<CacheKey> {
        self.filters = Filters::new(include, exclude);
        let filters = &self.filters;
        let pruned = store.prune(|entry| filters.retains(entry.name()), active);
        if !pruned.is_empty() {
            tracing::debug!(count = pruned.len(), "Pruned entries after filter change");
        }
        pruned
    }
}
