use std::{collections::HashMap, fmt};

use serde_json::{Map, Value};

use crate::copy::{ComponentType, LocalTransform, NodeTree, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "component#{}", self.0)
    }
}

/// An in-memory hierarchy of named nodes with transforms and components.
///
/// Nodes and components live in flat maps keyed by ID. IDs are handed out
/// sequentially. Nodes are never removed.
#[derive(Debug, Clone)]
pub struct RigTree {
    nodes: HashMap<NodeId, RigNode>,
    components: HashMap<ComponentId, RigComponent>,
    root_id: NodeId,
    next_id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    components: Vec<ComponentId>,

    pub name: String,
    pub active: bool,
    pub transform: LocalTransform,
}

impl RigNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }
}

/// A component attached to a node. Its state is a flat map of named JSON
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct RigComponent {
    pub component_type: ComponentType,
    pub fields: Map<String, Value>,
}

impl RigTree {
    pub fn new(root_name: impl Into<String>) -> RigTree {
        let root_id = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root_id, RigNode::new(None, root_name.into()));

        RigTree {
            nodes,
            components: HashMap::new(),
            root_id,
            next_id: 1,
        }
    }

    pub fn get_root_id(&self) -> NodeId {
        self.root_id
    }

    pub fn get_node(&self, id: NodeId) -> Option<&RigNode> {
        self.nodes.get(&id)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut RigNode> {
        self.nodes.get_mut(&id)
    }

    pub fn get_component(&self, id: ComponentId) -> Option<&RigComponent> {
        self.components.get(&id)
    }

    pub fn get_component_mut(&mut self, id: ComponentId) -> Option<&mut RigComponent> {
        self.components.get_mut(&id)
    }

    /// Appends a new child to `parent_id` and returns its ID.
    pub fn insert_node(
        &mut self,
        parent_id: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let id = NodeId(self.allocate_id());

        self.node_mut(parent_id)?.children.push(id);
        self.nodes.insert(id, RigNode::new(Some(parent_id), name.into()));

        Ok(id)
    }

    /// Attaches a component with the given state to a node.
    pub fn attach_component(
        &mut self,
        node_id: NodeId,
        component_type: ComponentType,
        fields: Map<String, Value>,
    ) -> Result<ComponentId, TreeError> {
        let id = ComponentId(self.allocate_id());

        self.node_mut(node_id)?.components.push(id);
        self.components.insert(
            id,
            RigComponent {
                component_type,
                fields,
            },
        );

        Ok(id)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn node(&self, id: NodeId) -> Result<&RigNode, TreeError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| TreeError::MissingNode(id.to_string()))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut RigNode, TreeError> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| TreeError::MissingNode(id.to_string()))
    }

    fn component(&self, id: ComponentId) -> Result<&RigComponent, TreeError> {
        self.components
            .get(&id)
            .ok_or_else(|| TreeError::MissingComponent(id.to_string()))
    }
}

impl RigNode {
    fn new(parent: Option<NodeId>, name: String) -> RigNode {
        RigNode {
            parent,
            children: Vec::new(),
            components: Vec::new(),
            name,
            active: true,
            transform: LocalTransform::default(),
        }
    }
}

impl NodeTree for RigTree {
    type NodeId = NodeId;
    type ComponentId = ComponentId;

    fn name(&self, node: NodeId) -> Result<&str, TreeError> {
        Ok(&self.node(node)?.name)
    }

    fn children(&self, node: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(&self.node(node)?.children)
    }

    fn transform(&self, node: NodeId) -> Result<LocalTransform, TreeError> {
        Ok(self.node(node)?.transform)
    }

    fn set_transform(&mut self, node: NodeId, transform: LocalTransform) -> Result<(), TreeError> {
        self.node_mut(node)?.transform = transform;
        Ok(())
    }

    fn components(&self, node: NodeId) -> Result<Vec<ComponentId>, TreeError> {
        Ok(self.node(node)?.components.clone())
    }

    fn component_type(&self, component: ComponentId) -> Result<&ComponentType, TreeError> {
        Ok(&self.component(component)?.component_type)
    }

    fn add_component(
        &mut self,
        node: NodeId,
        component_type: &ComponentType,
    ) -> Result<ComponentId, TreeError> {
        self.attach_component(node, component_type.clone(), Map::new())
    }

    fn is_active(&self, node: NodeId) -> bool {
        self.nodes.get(&node).map_or(false, |node| node.active)
    }
}
