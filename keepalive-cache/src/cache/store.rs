//! Cache store with LRU eviction.
//!
//! Entries live in an unbounded [`LruCache`]; the capacity bound is enforced
//! here rather than by the LRU itself so that every removal goes through the
//! same release path, which never destroys the instance currently on screen.

use keepalive_core::{CacheKey, ComponentInstance, InstanceId};
use lru::LruCache;

use super::entry::CacheEntry;
use super::stats::CacheStats;

/// Mapping from cache key to entry, ordered by recency.
///
/// Invariant: every key maps to a live entry and appears once in the recency
/// order. Lookups and admissions both mark a key most-recently-used.
pub struct CacheStore<I: ComponentInstance> {
    entries: LruCache<CacheKey, CacheEntry<I>>,
    /// Capacity bound, `None` = unbounded.
    max: Option<usize>,
    stats: CacheStats,
}

impl<I: ComponentInstance> CacheStore<I> {
    /// Create a store. `max` must already be validated as positive.
    pub fn new(max: Option<usize>) -> Self {
        Self {
            entries: LruCache::unbounded(),
            max,
            stats: CacheStats::default(),
        }
    }

    /// Create an unbounded store.
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains(key)
    }

    /// Look up an entry and mark it most-recently-used on hit.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<&CacheEntry<I>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.hits += 1;
                Some(entry)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Look up an entry without touching recency or statistics.
    pub fn peek(&self, key: &CacheKey) -> Option<&CacheEntry<I>> {
        self.entries.peek(key)
    }

    /// Keys ordered oldest-used first, most-recently-used last.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.iter().rev().map(|(key, _)| key.clone()).collect()
    }

    /// Insert or overwrite an entry as most-recently-used, then trim to capacity.
    ///
    /// A replaced entry holding a different instance is released like an
    /// eviction. Returns the keys evicted for capacity.
    pub fn admit(
        &mut self,
        key: CacheKey,
        entry: CacheEntry<I>,
        active: Option<InstanceId>,
    ) -> Vec<CacheKey> {
        let incoming = entry.instance_id();
        tracing::debug!(key = %key, instance = %incoming, "Admitting entry");
        self.stats.admissions += 1;

        if let Some((replaced_key, replaced)) = self.entries.push(key, entry) {
            if replaced.instance_id() != incoming {
                tracing::debug!(key = %replaced_key, "Replacing cached instance");
                replaced.release(active);
            }
        }
        self.trim(active)
    }

    /// Evict least-recently-used entries until the store is within `max`.
    pub fn trim(&mut self, active: Option<InstanceId>) -> Vec<CacheKey> {
        let Some(max) = self.max else {
            return Vec::new();
        };
        let mut evicted = Vec::new();
        while self.entries.len() > max {
            let Some((key, entry)) = self.entries.pop_lru() else {
                break;
            };
            tracing::debug!(key = %key, max, "Evicting least-recently-used entry");
            entry.release(active);
            self.stats.evictions += 1;
            evicted.push(key);
        }
        evicted
    }

    /// Replace the capacity bound and trim down to it.
    pub fn set_max(&mut self, max: Option<usize>, active: Option<InstanceId>) -> Vec<CacheKey> {
        self.max = max;
        self.trim(active)
    }

    /// Remove one entry, destroying it unless it is the active instance.
    ///
    /// Returns false if the key was not present.
    pub fn evict(&mut self, key: &CacheKey, active: Option<InstanceId>) -> bool {
        match self.entries.pop(key) {
            Some(entry) => {
                tracing::debug!(key = %key, "Evicting entry");
                entry.release(active);
                true
            }
            None => false,
        }
    }

    /// Remove every entry for which `keep` returns false.
    ///
    /// Returns the pruned keys, oldest first.
    pub fn prune<F>(&mut self, keep: F, active: Option<InstanceId>) -> Vec<CacheKey>
    where
        F: Fn(&CacheEntry<I>) -> bool,
    {
        let doomed: Vec<CacheKey> = self
            .entries
            .iter()
            .rev()
            .filter(|(_, entry)| !keep(*entry))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            if self.evict(key, active) {
                self.stats.pruned += 1;
            }
        }
        doomed
    }

    /// Destroy every entry unconditionally and empty the store.
    ///
    /// Returns the number of destroyed entries.
    pub fn dispose(&mut self) -> usize {
        let mut destroyed = 0;
        while let Some((key, entry)) = self.entries.pop_lru() {
            tracing::trace!(key = %key, "Destroying entry on dispose");
            entry.instance().destroy();
            destroyed += 1;
        }
        destroyed
    }

    /// Snapshot of usage statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.entries.len() as u64,
            ..self.stats.clone()
        }
    }
}
