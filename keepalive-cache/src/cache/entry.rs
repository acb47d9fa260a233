//! Cache entries.
//!
//! An entry owns one component instance on behalf of the cache. The name and
//! tag are captured at admission time so filter changes can be evaluated
//! without consulting the host again.

use std::time::Duration;

use chrono::{DateTime, Utc};
use keepalive_core::{ComponentDescriptor, ComponentInstance, InstanceId};

/// A cached component instance.
#[derive(Debug, Clone)]
pub struct CacheEntry<I> {
    /// Filter name at admission time.
    name: Option<String>,
    /// Local tag at admission time.
    tag: Option<String>,
    /// The owned instance.
    instance: I,
    /// When the instance was admitted.
    cached_at: DateTime<Utc>,
}

impl<I: ComponentInstance> CacheEntry<I> {
    pub fn new(name: Option<String>, tag: Option<String>, instance: I) -> Self {
        Self {
            name,
            tag,
            instance,
            cached_at: Utc::now(),
        }
    }

    /// Build an entry from a component's descriptor.
    pub fn from_component(component: &ComponentDescriptor, instance: I) -> Self {
        Self::new(
            component.name().map(str::to_string),
            component.tag.clone(),
            instance,
        )
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn instance(&self) -> &I {
        &self.instance
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance.id()
    }

    /// Get when this entry was admitted.
    pub fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    /// How long the entry has been cached.
    pub fn age(&self) -> Duration {
        let now = Utc::now();
        if now > self.cached_at {
            (now - self.cached_at).to_std().unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        }
    }

    /// Whether this entry holds the instance currently on screen.
    pub fn is_active(&self, active: Option<InstanceId>) -> bool {
        active == Some(self.instance.id())
    }

    /// Destroy the instance unless it is the one currently on screen.
    ///
    /// Returns true if `destroy` was issued.
    pub(crate) fn release(self, active: Option<InstanceId>) -> bool {
        if self.is_active(active) {
            tracing::debug!(instance = %self.instance.id(), "Skipping destroy of active instance");
            return false;
        }
        self.instance.destroy();
        true
    }
}
