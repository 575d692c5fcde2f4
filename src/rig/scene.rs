//! Scene files: a JSON description of a rig hierarchy that can be loaded into
//! a [`RigTree`] and written back out.
//!
//! A minimal scene looks like this:
//!
//! ```json
//! {
//!   "name": "Avatar",
//!   "children": [
//!     {
//!       "name": "Armature",
//!       "children": [
//!         {
//!           "name": "Hips",
//!           "scale": [1.0, 1.1, 1.0],
//!           "components": [
//!             {
//!               "type": "nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster",
//!               "fields": { "scale": [1.0, 1.1, 1.0] }
//!             }
//!           ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::{io, path::Path, path::PathBuf};

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::copy::{ComponentType, LocalTransform, TreeError};

use super::{NodeId, RigTree, TypeRegistry};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed scene file at path {}", .path.display())]
    Malformed {
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("could not encode scene")]
    Encode {
        #[from]
        source: serde_json::Error,
    },

    #[error("scene does not describe a valid tree")]
    Tree {
        #[from]
        source: TreeError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SceneNode {
    pub name: String,

    #[serde(default = "default_active", skip_serializing_if = "is_true")]
    pub active: bool,

    #[serde(default = "default_position", skip_serializing_if = "is_zero")]
    pub position: Vec3,

    #[serde(default = "default_rotation", skip_serializing_if = "is_identity")]
    pub rotation: Quat,

    #[serde(default = "default_scale", skip_serializing_if = "is_one")]
    pub scale: Vec3,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<SceneComponent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SceneComponent {
    #[serde(rename = "type")]
    pub component_type: ComponentType,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        SceneNode {
            name: name.into(),
            active: true,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn read(path: &Path) -> Result<SceneNode, SceneError> {
        let contents = fs_err::read_to_string(path)?;

        serde_json::from_str(&contents).map_err(|source| SceneError::Malformed {
            source,
            path: path.to_owned(),
        })
    }

    pub fn write(&self, path: &Path) -> Result<(), SceneError> {
        let mut encoded = serde_json::to_string_pretty(self)?;
        encoded.push('\n');

        fs_err::write(path, encoded)?;
        Ok(())
    }

    /// Builds a tree from this scene. Every component type the scene uses is
    /// added to `registry`.
    pub fn into_tree(self, registry: &mut TypeRegistry) -> Result<RigTree, SceneError> {
        let mut tree = RigTree::new(self.name.clone());
        let root_id = tree.get_root_id();

        populate_node(&mut tree, registry, root_id, self)?;
        Ok(tree)
    }

    /// Describes the subtree rooted at `id` as a scene.
    pub fn from_tree(tree: &RigTree, id: NodeId) -> Result<SceneNode, SceneError> {
        let node = tree
            .get_node(id)
            .ok_or_else(|| TreeError::MissingNode(id.to_string()))?;

        let mut components = Vec::with_capacity(node.components().len());
        for &component_id in node.components() {
            let component = tree
                .get_component(component_id)
                .ok_or_else(|| TreeError::MissingComponent(component_id.to_string()))?;

            components.push(SceneComponent {
                component_type: component.component_type.clone(),
                fields: component.fields.clone(),
            });
        }

        let children = node
            .children()
            .iter()
            .map(|&child_id| SceneNode::from_tree(tree, child_id))
            .collect::<Result<_, _>>()?;

        Ok(SceneNode {
            name: node.name.clone(),
            active: node.active,
            position: node.transform.position,
            rotation: node.transform.rotation,
            scale: node.transform.scale,
            components,
            children,
        })
    }

    fn local_transform(&self) -> LocalTransform {
        LocalTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

fn populate_node(
    tree: &mut RigTree,
    registry: &mut TypeRegistry,
    id: NodeId,
    scene: SceneNode,
) -> Result<(), SceneError> {
    let transform = scene.local_transform();

    if let Some(node) = tree.get_node_mut(id) {
        node.active = scene.active;
        node.transform = transform;
    }

    for component in scene.components {
        registry.register(component.component_type.clone());
        tree.attach_component(id, component.component_type, component.fields)?;
    }

    for child in scene.children {
        let child_id = tree.insert_node(id, child.name.clone())?;
        populate_node(tree, registry, child_id, child)?;
    }

    Ok(())
}

fn default_active() -> bool {
    true
}

fn default_position() -> Vec3 {
    Vec3::ZERO
}

fn default_rotation() -> Quat {
    Quat::IDENTITY
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_zero(value: &Vec3) -> bool {
    *value == Vec3::ZERO
}

fn is_identity(value: &Quat) -> bool {
    *value == Quat::IDENTITY
}

fn is_one(value: &Vec3) -> bool {
    *value == Vec3::ONE
}

#[cfg(test)]
mod test {
    use super::*;

    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::copy::{NodeTree, TypeResolver};

    fn sample() -> SceneNode {
        serde_json::from_value(json!({
            "name": "Avatar",
            "children": [{
                "name": "Armature",
                "children": [{
                    "name": "Hips",
                    "position": [0.0, 0.9, 0.0],
                    "scale": [1.0, 1.1, 1.0],
                    "components": [{
                        "type": "nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster",
                        "fields": { "scale": [1.0, 1.1, 1.0] }
                    }],
                    "children": [{ "name": "Spine", "active": false }]
                }]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn load_into_tree() {
        let mut registry = TypeRegistry::new();
        let tree = sample().into_tree(&mut registry).unwrap();
        let root_id = tree.get_root_id();

        assert_eq!(tree.name(root_id).unwrap(), "Avatar");

        let hips = tree.find_path(root_id, "Armature/Hips").unwrap().unwrap();
        let transform = tree.transform(hips).unwrap();
        assert_eq!(transform.position, Vec3::new(0.0, 0.9, 0.0));
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.scale, Vec3::new(1.0, 1.1, 1.0));
        assert_eq!(tree.components(hips).unwrap().len(), 1);

        let spine = tree.find_path(hips, "Spine").unwrap().unwrap();
        assert!(!tree.is_active(spine));

        assert_eq!(
            registry.resolve("nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster"),
            Some(ComponentType::new(
                "nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster"
            ))
        );
    }

    #[test]
    fn tree_back_to_scene() {
        let scene = sample();
        let tree = scene.clone().into_tree(&mut TypeRegistry::new()).unwrap();

        assert_eq!(SceneNode::from_tree(&tree, tree.get_root_id()).unwrap(), scene);
    }

    #[test]
    fn defaults_are_omitted() {
        let encoded = serde_json::to_value(SceneNode::new("Hips")).unwrap();
        assert_eq!(encoded, json!({ "name": "Hips" }));

        let mut hips = SceneNode::new("Hips");
        hips.scale = Vec3::new(1.0, 1.5, 1.0);
        hips.components.push(SceneComponent {
            component_type: ComponentType::new("A.B"),
            fields: json!({ "pull": 0.5 }).as_object().cloned().unwrap(),
        });

        assert_snapshot!(serde_json::to_string_pretty(&hips).unwrap(), @r###"
        {
          "name": "Hips",
          "scale": [
            1.0,
            1.5,
            1.0
          ],
          "components": [
            {
              "type": "A.B",
              "fields": {
                "pull": 0.5
              }
            }
          ]
        }
        "###);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<SceneNode>(json!({ "name": "Hips", "size": 2 }));
        assert!(result.is_err());
    }

    #[test]
    fn read_and_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.scene.json");

        sample().write(&path).unwrap();
        assert_eq!(SceneNode::read(&path).unwrap(), sample());

        fs_err::write(&path, "{ not json").unwrap();
        assert!(matches!(
            SceneNode::read(&path),
            Err(SceneError::Malformed { .. })
        ));
    }
}
