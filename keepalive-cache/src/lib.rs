//! Keep-Alive Cache - Render-Slot Instance Cache
//!
//! Preserves component instances across re-renders of a single render slot,
//! so toggling between subtrees does not destroy and recreate their state.
//!
//! - [`cache`]: the LRU store that owns cached instances
//! - [`filter`]: reacts to include/exclude changes by pruning the store
//! - [`keep_alive`]: the per-render decision procedure and mount protocol

pub mod cache;
pub mod filter;
pub mod keep_alive;

pub use cache::{CacheEntry, CacheStats, CacheStore};
pub use filter::FilterController;
pub use keep_alive::{Candidate, KeepAlive};

// Re-export core types used in this crate's public API
pub use keepalive_core::{
    CacheKey, ComponentDescriptor, ComponentInstance, ConstructorId, Filters, InstanceId,
    KeepAliveConfig, KeepAliveError, KeepAliveResult, LifecycleError, Pattern, ProvisionalKey,
    RenderNode,
};
