//! Keep-Alive Test Utilities
//!
//! Centralized test infrastructure for the keep-alive workspace:
//! - Mock component instances that record destroy calls
//! - Proptest generators for names, patterns and node descriptors
//! - Node fixtures for common render scenarios
//! - Custom assertions for keep-alive errors

use std::cell::RefCell;
use std::rc::Rc;

// Re-export core types for convenience
pub use keepalive_core::{
    CacheKey, ComponentDescriptor, ComponentInstance, ConfigError, ConstructorId, Filters,
    InstanceId, KeepAliveConfig, KeepAliveError, KeepAliveResult, LifecycleError, Pattern,
    RenderNode,
};

// ============================================================================
// MOCK INSTANCES
// ============================================================================

/// Shared record of destroy calls, in call order.
#[derive(Debug, Clone, Default)]
pub struct DestroyLog {
    destroyed: Rc<RefCell<Vec<InstanceId>>>,
}

impl DestroyLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, id: InstanceId) {
        self.destroyed.borrow_mut().push(id);
    }

    /// Destroyed instance ids in call order.
    pub fn destroyed(&self) -> Vec<InstanceId> {
        self.destroyed.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.destroyed.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.destroyed.borrow().is_empty()
    }

    /// Number of destroy calls issued for `id`.
    pub fn times_destroyed(&self, id: InstanceId) -> usize {
        self.destroyed.borrow().iter().filter(|d| **d == id).count()
    }
}

/// Component instance handle that reports `destroy` to a [`DestroyLog`].
#[derive(Debug, Clone)]
pub struct MockInstance {
    id: InstanceId,
    log: DestroyLog,
}

impl MockInstance {
    pub fn new(log: &DestroyLog) -> Self {
        Self {
            id: InstanceId::new(),
            log: log.clone(),
        }
    }
}

impl ComponentInstance for MockInstance {
    fn id(&self) -> InstanceId {
        self.id
    }

    fn destroy(&self) {
        self.log.record(self.id);
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Build a component node backed by a fresh mock instance.
pub fn component_node(
    log: &DestroyLog,
    constructor: u32,
    name: Option<&str>,
    tag: Option<&str>,
) -> RenderNode<MockInstance> {
    let mut descriptor = ComponentDescriptor::new(ConstructorId(constructor));
    if let Some(name) = name {
        descriptor = descriptor.with_name(name);
    }
    if let Some(tag) = tag {
        descriptor = descriptor.with_tag(tag);
    }
    RenderNode::component(descriptor, MockInstance::new(log))
}

/// One named component node per name, with constructor ids 1, 2, 3, ...
pub fn named_nodes(log: &DestroyLog, names: &[&str]) -> Vec<RenderNode<MockInstance>> {
    names
        .iter()
        .zip(1u32..)
        .map(|(name, constructor)| component_node(log, constructor, Some(name), None))
        .collect()
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for keep-alive inputs.

    use super::*;
    use proptest::prelude::*;

    /// Generate a component name from a small alphabet so filters hit often.
    pub fn arb_component_name() -> impl Strategy<Value = String> + Clone {
        "[A-E][a-z]{0,3}"
    }

    /// Generate a kebab-case local tag.
    pub fn arb_tag() -> impl Strategy<Value = String> {
        "[a-z]{1,6}(-[a-z]{1,6})?"
    }

    /// Generate a constructor id from a small range.
    pub fn arb_constructor_id() -> impl Strategy<Value = ConstructorId> {
        (0u32..16).prop_map(ConstructorId)
    }

    /// Generate a component descriptor.
    pub fn arb_component_descriptor() -> impl Strategy<Value = ComponentDescriptor> {
        (
            arb_constructor_id(),
            prop::option::of(arb_component_name()),
            prop::option::of(arb_tag()),
        )
            .prop_map(|(constructor, declared_name, tag)| ComponentDescriptor {
                constructor,
                declared_name,
                tag,
            })
    }

    /// Generate a pattern over component names in any supported shape.
    pub fn arb_pattern() -> impl Strategy<Value = Pattern> {
        let names = prop::collection::vec(arb_component_name(), 1..4);
        prop_oneof![
            names.clone().prop_map(Pattern::list),
            names.clone().prop_map(|n| Pattern::delimited(n.join(","))),
            names.prop_map(|n| {
                let alternatives: Vec<String> = n.iter().map(|s| regex::escape(s)).collect();
                Pattern::regex(&format!("^({})$", alternatives.join("|")))
            }),
        ]
    }

    /// Generate a positive capacity bound.
    pub fn arb_max() -> impl Strategy<Value = usize> {
        1usize..8
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for keep-alive results.

    use super::*;

    /// Assert that a KeepAliveResult is a Config error.
    #[track_caller]
    pub fn assert_config_error<T: std::fmt::Debug>(result: &KeepAliveResult<T>) {
        match result {
            Err(KeepAliveError::Config(_)) => {}
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    /// Assert that a KeepAliveResult is a PendingSlotOccupied lifecycle error.
    #[track_caller]
    pub fn assert_pending_occupied<T: std::fmt::Debug>(result: &KeepAliveResult<T>) {
        match result {
            Err(KeepAliveError::Lifecycle(LifecycleError::PendingSlotOccupied { .. })) => {}
            other => panic!("Expected PendingSlotOccupied, got: {:?}", other),
        }
    }

    /// Assert that every id was destroyed exactly once.
    #[track_caller]
    pub fn assert_destroyed_once(log: &DestroyLog, ids: &[InstanceId]) {
        for id in ids {
            assert_eq!(
                log.times_destroyed(*id),
                1,
                "Instance {} should be destroyed exactly once",
                id
            );
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
