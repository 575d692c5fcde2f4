//! Defines the capabilities the copy engine needs from its host: a live object
//! model, a way to resolve component types by name, and a component
//! serializer.
//!
//! None of these are implemented by the engine itself. The `rig` module
//! contains an in-memory implementation of all three.

use std::{borrow::Borrow, fmt};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies a component implementation, like
/// `nadena.dev.modular_avatar.core.ModularAvatarBoneProxy`.
///
/// Everything before the last `.` is treated as the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentType(String);

impl ComponentType {
    pub fn new(identifier: impl Into<String>) -> Self {
        ComponentType(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(namespace, _)| namespace)
    }

    /// The type name without its namespace.
    pub fn name(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl Borrow<str> for ComponentType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentType {
    fn from(identifier: &str) -> Self {
        ComponentType::new(identifier)
    }
}

/// Serialized component state. The engine never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(String);

impl Payload {
    pub fn new(text: impl Into<String>) -> Self {
        Payload(text.into())
    }

    /// The payload recorded when a component could not be serialized.
    pub fn empty_object() -> Self {
        Payload("{}".to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The local transform fields of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    MissingNode(String),

    #[error("component {0} does not exist")]
    MissingComponent(String),

    #[error("{0}")]
    Host(String),
}

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Custom(String),
}

/// A live, mutable view of a hierarchy of nodes with attached components.
///
/// Child and component enumeration must be stable: the engine relies on
/// sibling order and attachment order being the same between calls.
pub trait NodeTree {
    type NodeId: Copy + Eq + fmt::Debug;
    type ComponentId: Copy + Eq + fmt::Debug;

    fn name(&self, node: Self::NodeId) -> Result<&str, TreeError>;

    fn children(&self, node: Self::NodeId) -> Result<&[Self::NodeId], TreeError>;

    fn transform(&self, node: Self::NodeId) -> Result<LocalTransform, TreeError>;

    fn set_transform(
        &mut self,
        node: Self::NodeId,
        transform: LocalTransform,
    ) -> Result<(), TreeError>;

    /// Components attached directly to the node, in attachment order. The
    /// node's own transform is exposed through `transform` and must not be
    /// listed here.
    fn components(&self, node: Self::NodeId) -> Result<Vec<Self::ComponentId>, TreeError>;

    fn component_type(&self, component: Self::ComponentId) -> Result<&ComponentType, TreeError>;

    fn add_component(
        &mut self,
        node: Self::NodeId,
        component_type: &ComponentType,
    ) -> Result<Self::ComponentId, TreeError>;

    /// Whether the node is active in the host. Hosts without the concept can
    /// rely on the default.
    fn is_active(&self, _node: Self::NodeId) -> bool {
        true
    }

    /// Returns the first child of `parent` whose name is exactly `name`.
    fn find_child(
        &self,
        parent: Self::NodeId,
        name: &str,
    ) -> Result<Option<Self::NodeId>, TreeError> {
        for &child in self.children(parent)? {
            if self.name(child)? == name {
                return Ok(Some(child));
            }
        }

        Ok(None)
    }

    /// Returns the first component on `node` with the given type.
    fn find_component(
        &self,
        node: Self::NodeId,
        component_type: &ComponentType,
    ) -> Result<Option<Self::ComponentId>, TreeError> {
        for component in self.components(node)? {
            if self.component_type(component)? == component_type {
                return Ok(Some(component));
            }
        }

        Ok(None)
    }

    /// Follows a `/`-separated chain of child names starting at `root`. An
    /// empty path refers to `root` itself.
    ///
    /// Each segment takes the first child with that name, so later siblings
    /// sharing a name are unreachable. Nodes whose names contain `/` can't be
    /// reached either; walk them with `find_child` instead.
    fn find_path(&self, root: Self::NodeId, path: &str) -> Result<Option<Self::NodeId>, TreeError> {
        let mut current = root;

        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            match self.find_child(current, segment)? {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }
}

/// Maps a type identifier to a type the host knows how to construct.
///
/// Unknown or renamed types resolve to `None`.
pub trait TypeResolver {
    fn resolve(&self, type_id: &str) -> Option<ComponentType>;
}

/// Converts component state to and from an opaque [`Payload`].
pub trait ComponentSerializer<T: NodeTree + ?Sized> {
    fn serialize(&self, tree: &T, component: T::ComponentId) -> Result<Payload, SerializeError>;

    /// Writes the payload's state into an existing component, overwriting the
    /// fields the payload describes.
    fn deserialize(
        &self,
        tree: &mut T,
        component: T::ComponentId,
        payload: &Payload,
    ) -> Result<(), SerializeError>;
}
