//! Cache layer: entries, the LRU store and usage statistics.
//!
//! # Design
//!
//! The store owns every cached instance. An instance leaves the store through
//! exactly one of three paths (capacity eviction, filter pruning, disposal)
//! and is destroyed on the way out, except when it is the instance the host
//! is currently rendering.
//!
//! # Example
//!
//! ```ignore
//! let mut store = CacheStore::new(Some(3));
//! store.admit(key, CacheEntry::from_component(&component, instance), active);
//!
//! if let Some(entry) = store.lookup(&key) {
//!     // entry is now most-recently-used
//! }
//! ```

pub mod entry;
pub mod stats;
pub mod store;

pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;
