//! Per-render keep-alive decision procedure.
//!
//! Each render pass hands the slot's children to [`KeepAlive::render`]. The
//! first component child is checked against the filters; on a cache hit its
//! instance is swapped for the cached one, on a miss the node is parked in a
//! pending slot until the host confirms that its instance mounted.
//!
//! Render and mount confirmation must alternate. A render that starts while a
//! pending slot is still unconfirmed is rejected instead of overwriting it.

use keepalive_core::{
    first_component_child, resolve_key, validate_max, CacheKey, ComponentInstance, Filters,
    InstanceId, KeepAliveConfig, KeepAliveResult, LifecycleError, Pattern, ProvisionalKey,
    RenderNode,
};

use crate::cache::{CacheEntry, CacheStats, CacheStore};
use crate::filter::FilterController;

/// Outcome of proposing one candidate node.
#[derive(Debug)]
pub enum Candidate<I> {
    /// Not a cacheable component this pass; node returned unmodified.
    PassThrough(RenderNode<I>),
    /// Cached instance substituted into the node.
    Hit(RenderNode<I>),
    /// Fresh instance kept; awaiting mount confirmation.
    Miss {
        node: RenderNode<I>,
        provisional: ProvisionalKey,
    },
}

impl<I> Candidate<I> {
    pub fn node(&self) -> &RenderNode<I> {
        match self {
            Self::PassThrough(node) | Self::Hit(node) | Self::Miss { node, .. } => node,
        }
    }

    pub fn into_node(self) -> RenderNode<I> {
        match self {
            Self::PassThrough(node) | Self::Hit(node) | Self::Miss { node, .. } => node,
        }
    }

    pub fn provisional(&self) -> Option<&ProvisionalKey> {
        match self {
            Self::Miss { provisional, .. } => Some(provisional),
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// A rendered node waiting to be admitted.
struct PendingSlot<I> {
    provisional: ProvisionalKey,
    entry: CacheEntry<I>,
}

/// Keep-alive cache for one render slot.
pub struct KeepAlive<I: ComponentInstance> {
    store: CacheStore<I>,
    filters: FilterController,
    pending: Option<PendingSlot<I>>,
    /// Instance of the node most recently returned to the renderer.
    active: Option<InstanceId>,
    next_ticket: u64,
}

impl<I: ComponentInstance> KeepAlive<I> {
    /// Create a cache from a validated configuration.
    pub fn new(config: KeepAliveConfig) -> KeepAliveResult<Self> {
        config.validate()?;
        Ok(Self {
            store: CacheStore::new(config.max),
            filters: FilterController::new(config.filters()),
            pending: None,
            active: None,
            next_ticket: 0,
        })
    }

    /// Create an unfiltered, unbounded cache.
    pub fn unbounded() -> Self {
        Self {
            store: CacheStore::unbounded(),
            filters: FilterController::default(),
            pending: None,
            active: None,
            next_ticket: 0,
        }
    }

    pub fn filters(&self) -> &Filters {
        self.filters.filters()
    }

    pub fn max(&self) -> Option<usize> {
        self.store.max()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.store.contains(key)
    }

    /// Cached keys, oldest-used first.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.store.keys()
    }

    pub fn store(&self) -> &CacheStore<I> {
        &self.store
    }

    /// Instance of the node most recently rendered.
    pub fn active(&self) -> Option<InstanceId> {
        self.active
    }

    /// Provisional key awaiting mount confirmation, if any.
    pub fn pending(&self) -> Option<&ProvisionalKey> {
        self.pending.as_ref().map(|slot| &slot.provisional)
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Run one render pass over the slot's children.
    ///
    /// Returns the first component child, possibly with a cached instance
    /// substituted. Without a component child the first child passes through
    /// unchanged; with no children the result is `None`.
    pub fn render(&mut self, children: Vec<RenderNode<I>>) -> KeepAliveResult<Option<RenderNode<I>>> {
        self.ensure_no_pending()?;

        let index = first_component_child(&children).unwrap_or(0);
        let Some(node) = children.into_iter().nth(index) else {
            self.active = None;
            return Ok(None);
        };
        Ok(Some(self.propose_candidate(node)?.into_node()))
    }

    /// First phase of the cache commit: decide hit, miss or pass-through.
    ///
    /// On a miss the returned [`ProvisionalKey`] must be redeemed with
    /// [`KeepAlive::confirm_mounted`] (or the lifecycle hooks) before the next
    /// render.
    pub fn propose_candidate(&mut self, mut node: RenderNode<I>) -> KeepAliveResult<Candidate<I>> {
        self.ensure_no_pending()?;

        let Some(component) = node.component.clone() else {
            return Ok(self.pass_through(node));
        };
        if !self.filters.admits(component.name()) {
            tracing::trace!(name = ?component.name(), "Component filtered out of cache");
            return Ok(self.pass_through(node));
        }

        let key = resolve_key(node.key.as_deref(), &component);

        if let Some(entry) = self.store.lookup(&key) {
            tracing::debug!(key = %key, instance = %entry.instance_id(), "Cache hit");
            node.instance = Some(entry.instance().clone());
            node.keep_alive = true;
            self.active = node.instance_id();
            return Ok(Candidate::Hit(node));
        }

        let Some(instance) = node.instance.clone() else {
            tracing::warn!(key = %key, "Cache miss on a node without an instance, not caching");
            return Ok(self.pass_through(node));
        };

        let provisional = self.issue_provisional(key);
        tracing::debug!(key = %provisional, "Cache miss, deferring until mounted");
        self.pending = Some(PendingSlot {
            provisional: provisional.clone(),
            entry: CacheEntry::from_component(&component, instance),
        });
        node.keep_alive = true;
        self.active = node.instance_id();
        Ok(Candidate::Miss { node, provisional })
    }

    /// Second phase: admit the pending node now that it has mounted.
    pub fn confirm_mounted(&mut self, provisional: &ProvisionalKey) -> KeepAliveResult<()> {
        let expected = match &self.pending {
            Some(slot) => slot.provisional.clone(),
            None => return Err(LifecycleError::NoPendingSlot.into()),
        };
        if &expected != provisional {
            tracing::warn!(expected = %expected, got = %provisional, "Rejected mount confirmation");
            return Err(LifecycleError::ProvisionalKeyMismatch {
                expected,
                got: provisional.clone(),
            }
            .into());
        }
        self.admit_pending();
        Ok(())
    }

    /// Host hook: the rendered node mounted. Admits the pending slot if any.
    pub fn on_mounted(&mut self) -> Option<CacheKey> {
        self.admit_pending()
    }

    /// Host hook: the rendered node updated. Admits the pending slot if any.
    pub fn on_updated(&mut self) -> Option<CacheKey> {
        self.admit_pending()
    }

    /// Drop an unconfirmed pending slot. Nothing is destroyed since the
    /// instance never entered the cache.
    pub fn abandon_pending(&mut self) -> Option<ProvisionalKey> {
        self.pending.take().map(|slot| {
            tracing::debug!(key = %slot.provisional, "Abandoned pending slot");
            slot.provisional
        })
    }

    /// Replace the include/exclude patterns and prune entries that no longer pass.
    pub fn set_filters(&mut self, include: Option<Pattern>, exclude: Option<Pattern>) -> Vec<CacheKey> {
        self.filters.replace(include, exclude, &mut self.store, self.active)
    }

    /// Replace the capacity bound, evicting least-recently-used entries over it.
    pub fn set_max(&mut self, max: Option<usize>) -> KeepAliveResult<Vec<CacheKey>> {
        validate_max(max)?;
        Ok(self.store.set_max(max, self.active))
    }

    /// Tear down the whole cache, destroying every held instance.
    ///
    /// Returns the number of destroyed entries.
    pub fn dispose(&mut self) -> usize {
        self.pending = None;
        self.active = None;
        let destroyed = self.store.dispose();
        tracing::info!(destroyed, "Keep-alive cache disposed");
        destroyed
    }

    fn ensure_no_pending(&self) -> Result<(), LifecycleError> {
        match &self.pending {
            Some(slot) => {
                tracing::warn!(key = %slot.provisional, "Render started before mount confirmation");
                Err(LifecycleError::PendingSlotOccupied {
                    key: slot.provisional.clone(),
                })
            }
            None => Ok(()),
        }
    }

    fn pass_through(&mut self, node: RenderNode<I>) -> Candidate<I> {
        self.active = node.instance_id();
        Candidate::PassThrough(node)
    }

    fn issue_provisional(&mut self, key: CacheKey) -> ProvisionalKey {
        self.next_ticket += 1;
        ProvisionalKey::new(key, self.next_ticket)
    }

    fn admit_pending(&mut self) -> Option<CacheKey> {
        let slot = self.pending.take()?;
        let key = slot.provisional.key().clone();
        self.store.admit(key.clone(), slot.entry, self.active);
        Some(key)
    }
}
