//! Keep-Alive Core - Identity, Patterns and Configuration
//!
//! Pure data types shared by the keep-alive cache. Nothing in this crate
//! holds cache state: it describes render-tree nodes, derives their cache
//! keys, evaluates include/exclude name patterns and validates configuration.

pub mod config;
pub mod error;
pub mod filter;
pub mod identity;
pub mod node;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use config::{validate_max, KeepAliveConfig};
pub use error::{ConfigError, KeepAliveError, KeepAliveResult, LifecycleError};
pub use filter::{matches, Filters, Pattern};
pub use identity::{resolve_key, CacheKey, ConstructorId, InstanceId, ProvisionalKey};
pub use node::{first_component_child, ComponentDescriptor, ComponentInstance, RenderNode};
