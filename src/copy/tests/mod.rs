//! Behavioural tests for capture and apply, run against the in-memory rig.


use serde_json::Value;

use crate::rig::{NodeId, RigTree, SceneNode, TypeRegistry};

pub const SCALE_ADJUSTER: &str = "nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster";
pub const BONE_PROXY: &str = "nadena.dev.modular_avatar.core.ModularAvatarBoneProxy";
pub const PHYS_BONE: &str = "VRC.SDK3.Dynamics.PhysBone.Components.VRCPhysBone";
pub const PARENT_CONSTRAINT: &str = "UnityEngine.Animations.ParentConstraint";

/// Loads a rig from a JSON scene description, registering its component
/// types with `registry`.
pub fn rig(registry: &mut TypeRegistry, scene: Value) -> RigTree {
    let scene: SceneNode = serde_json::from_value(scene).expect("invalid test scene");
    scene.into_tree(registry).expect("could not build test scene")
}

pub fn node(tree: &RigTree, path: &str) -> NodeId {
    use crate::copy::NodeTree;

    tree.find_path(tree.get_root_id(), path)
        .unwrap()
        .unwrap_or_else(|| panic!("no node at {}", path))
}

pub fn scene_at(tree: &RigTree, path: &str) -> SceneNode {
    SceneNode::from_tree(tree, node(tree, path)).unwrap()
}
