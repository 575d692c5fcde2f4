//! Defines the structure of a hierarchy snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ComponentType, LocalTransform, Payload};

/// A detached copy of the relevant state of a source hierarchy.
///
/// Only the descendants of the source root are captured; `roots` are the
/// source root's children. Once built, a snapshot is never modified and can be
/// applied to any number of targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    roots: Vec<SnapshotNode>,
}

impl Snapshot {
    pub fn new(roots: Vec<SnapshotNode>) -> Self {
        Snapshot { roots }
    }

    pub fn roots(&self) -> &[SnapshotNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes in the snapshot, at every depth.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(SnapshotNode::subtree_len).sum()
    }

    /// Total number of component records in the snapshot.
    pub fn component_count(&self) -> usize {
        self.roots.iter().map(SnapshotNode::subtree_component_count).sum()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        for root in &self.roots {
            root.fmt_outline(formatter, 0)?;
        }

        Ok(())
    }
}

/// A captured node: its name, local transform, selected components and
/// children.
///
/// Children keep the sibling order of the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub name: String,

    /// All three transform fields are always captured. Which of them are
    /// written back is decided when the snapshot is applied.
    pub transform: LocalTransform,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    pub fn new(name: impl Into<String>) -> Self {
        SnapshotNode {
            name: name.into(),
            transform: LocalTransform::default(),
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn transform(self, transform: LocalTransform) -> Self {
        Self { transform, ..self }
    }

    pub fn component(mut self, record: ComponentRecord) -> Self {
        self.components.push(record);
        self
    }

    pub fn children(self, children: Vec<SnapshotNode>) -> Self {
        Self { children, ..self }
    }

    /// The number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SnapshotNode::subtree_len).sum::<usize>()
    }

    fn subtree_component_count(&self) -> usize {
        self.components.len()
            + self
                .children
                .iter()
                .map(SnapshotNode::subtree_component_count)
                .sum::<usize>()
    }

    fn fmt_outline(&self, formatter: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        writeln!(
            formatter,
            "{:indent$}• {} - {} components",
            "",
            self.name,
            self.components.len(),
            indent = depth * 2
        )?;

        for child in &self.children {
            child.fmt_outline(formatter, depth + 1)?;
        }

        Ok(())
    }
}

/// A single serialized component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    #[serde(rename = "type")]
    pub type_id: ComponentType,
    pub payload: Payload,
}

impl ComponentRecord {
    pub fn new(type_id: impl Into<ComponentType>, payload: Payload) -> Self {
        ComponentRecord {
            type_id: type_id.into(),
            payload,
        }
    }
}
