//! Render-tree node descriptors and the component instance seam

use serde::{Deserialize, Serialize};

use crate::{resolve_key, CacheKey, ConstructorId, InstanceId};

/// A live component instance owned by the host renderer.
///
/// Implementations are cheap handles: cloning one must refer to the same
/// underlying instance, and [`ComponentInstance::id`] must be stable across
/// clones. The cache calls [`ComponentInstance::destroy`] at most once per
/// instance it owns.
pub trait ComponentInstance: Clone {
    /// Identity used to recognize the instance currently on screen.
    fn id(&self) -> InstanceId;

    /// Tear the instance down. Failures are the host's concern.
    fn destroy(&self);
}

/// Blueprint information attached to a component node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub constructor: ConstructorId,
    /// Name declared by the component itself
    pub declared_name: Option<String>,
    /// Local tag the component was registered under
    pub tag: Option<String>,
}

impl ComponentDescriptor {
    pub fn new(constructor: ConstructorId) -> Self {
        Self {
            constructor,
            declared_name: None,
            tag: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.declared_name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Name used for filtering: the declared name, falling back to the tag.
    pub fn name(&self) -> Option<&str> {
        self.declared_name.as_deref().or(self.tag.as_deref())
    }
}

/// A render-tree node handed to the cache for one render pass.
#[derive(Debug, Clone)]
pub struct RenderNode<I> {
    /// Explicit key supplied by the host
    pub key: Option<String>,
    /// `None` for plain element or text nodes
    pub component: Option<ComponentDescriptor>,
    /// Instance backing the node, fresh or substituted from cache
    pub instance: Option<I>,
    /// Set when the node participates in caching
    pub keep_alive: bool,
}

impl<I: ComponentInstance> RenderNode<I> {
    /// A component node backed by a freshly created instance.
    pub fn component(component: ComponentDescriptor, instance: I) -> Self {
        Self {
            key: None,
            component: Some(component),
            instance: Some(instance),
            keep_alive: false,
        }
    }

    /// A non-component node.
    pub fn element() -> Self {
        Self {
            key: None,
            component: None,
            instance: None,
            keep_alive: false,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn is_component(&self) -> bool {
        self.component.is_some()
    }

    /// Filter name of the node's component.
    pub fn name(&self) -> Option<&str> {
        self.component.as_ref().and_then(ComponentDescriptor::name)
    }

    /// Cache key of the node, `None` for non-component nodes.
    pub fn cache_key(&self) -> Option<CacheKey> {
        self.component
            .as_ref()
            .map(|component| resolve_key(self.key.as_deref(), component))
    }

    pub fn instance_id(&self) -> Option<InstanceId> {
        self.instance.as_ref().map(|instance| instance.id())
    }
}

/// Index of the first child that is a component node.
pub fn first_component_child<I: ComponentInstance>(children: &[RenderNode<I>]) -> Option<usize> {
    children.iter().position(RenderNode::is_component)
}
