//! Identity types for cached render slots
//!
//! A cache slot is identified by a [`CacheKey`]. Keys come from the node's
//! explicit key when the host supplies one, otherwise from the constructor
//! identity plus the local tag the component was registered under.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ComponentDescriptor;

/// Separator between constructor identity and tag in derived keys.
const TAG_SEPARATOR: &str = "::";

/// Stable identifier of a component blueprint, independent of local naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstructorId(pub u32);

impl fmt::Display for ConstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a live component instance.
/// UUIDv7 so ids sort by creation time in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generate a new timestamp-sortable instance id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of one cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key handed out on a cache miss, redeemed once the instance has mounted.
///
/// The ticket distinguishes two provisional keys for the same slot issued on
/// different render passes, so a stale confirmation cannot admit a newer node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProvisionalKey {
    key: CacheKey,
    ticket: u64,
}

impl ProvisionalKey {
    pub fn new(key: CacheKey, ticket: u64) -> Self {
        Self { key, ticket }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

impl fmt::Display for ProvisionalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.key, self.ticket)
    }
}

/// Derive the cache key for a component node.
///
/// An explicit key is returned verbatim. Otherwise the constructor id is used,
/// suffixed with `::tag` when a tag is present, so one constructor registered
/// under two local names occupies two slots.
pub fn resolve_key(explicit_key: Option<&str>, component: &ComponentDescriptor) -> CacheKey {
    if let Some(key) = explicit_key {
        return CacheKey::from(key);
    }
    match component.tag.as_deref() {
        Some(tag) => CacheKey(format!("{}{}{}", component.constructor, TAG_SEPARATOR, tag)),
        None => CacheKey(component.constructor.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn descriptor(constructor: u32, tag: Option<&str>) -> ComponentDescriptor {
        ComponentDescriptor {
            constructor: ConstructorId(constructor),
            declared_name: None,
            tag: tag.map(str::to_string),
        }
    }

    #[test]
    fn test_explicit_key_wins() {
        let component = descriptor(4, Some("tab-view"));
        assert_eq!(resolve_key(Some("profile"), &component).as_str(), "profile");
    }

    #[test]
    fn test_constructor_and_tag() {
        assert_eq!(resolve_key(None, &descriptor(4, Some("tab-view"))).as_str(), "4::tab-view");
        assert_eq!(resolve_key(None, &descriptor(4, None)).as_str(), "4");
    }

    #[test]
    fn test_same_constructor_different_tags_are_distinct() {
        let a = resolve_key(None, &descriptor(9, Some("left-pane")));
        let b = resolve_key(None, &descriptor(9, Some("right-pane")));
        assert_ne!(a, b);
    }

    #[test]
    fn test_provisional_key_display() {
        let key = ProvisionalKey::new(CacheKey::from("9::pane"), 12);
        assert_eq!(key.to_string(), "9::pane#12");
        assert_eq!(key.key().as_str(), "9::pane");
        assert_eq!(key.ticket(), 12);
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(InstanceId::new(), InstanceId::new());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Property: resolving with a fixed explicit key is idempotent and
        /// ignores the component's identity.
        #[test]
        fn prop_explicit_key_is_stable(
            key in "[a-z0-9:_-]{1,24}",
            constructor in any::<u32>(),
            tag in proptest::option::of("[a-z-]{1,12}"),
        ) {
            let component = descriptor(constructor, tag.as_deref());
            let first = resolve_key(Some(&key), &component);
            let second = resolve_key(Some(&key), &component);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.as_str(), key.as_str());
        }

        /// Property: differing tags on a shared constructor never collide.
        #[test]
        fn prop_tags_disambiguate(
            constructor in any::<u32>(),
            tag_a in "[a-z-]{1,12}",
            tag_b in "[a-z-]{1,12}",
        ) {
            prop_assume!(tag_a != tag_b);
            let a = resolve_key(None, &descriptor(constructor, Some(&tag_a)));
            let b = resolve_key(None, &descriptor(constructor, Some(&tag_b)));
            prop_assert_ne!(a, b);
        }
    }
}
