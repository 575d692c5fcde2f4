//! Finding and validating armature hierarchies.

use super::{NodeTree, TreeError};

/// Whether a node name looks like an armature, e.g. `Armature` or
/// `Kikyo_Armature.001`.
pub fn is_armature(name: &str) -> bool {
    name.to_lowercase().contains("armature")
}

/// A usable copy source is an armature with at least one child to capture.
pub fn is_valid_source<T: NodeTree>(tree: &T, node: T::NodeId) -> Result<bool, TreeError> {
    Ok(is_armature(tree.name(node)?) && !tree.children(node)?.is_empty())
}

/// A usable copy target is an armature other than the source itself.
pub fn is_valid_target<T: NodeTree>(
    tree: &T,
    node: T::NodeId,
    source: Option<T::NodeId>,
) -> Result<bool, TreeError> {
    if source == Some(node) {
        return Ok(false);
    }

    Ok(is_armature(tree.name(node)?))
}

/// Lists every armature in `search_root` and its descendants, sorted by name.
///
/// `source`, if given, is left out of the result. Inactive nodes and
/// everything below them are ignored unless `include_inactive` is set.
pub fn find_armatures<T: NodeTree>(
    tree: &T,
    search_root: T::NodeId,
    source: Option<T::NodeId>,
    include_inactive: bool,
) -> Result<Vec<T::NodeId>, TreeError> {
    let mut found = Vec::new();
    let mut stack = vec![search_root];

    while let Some(node) = stack.pop() {
        if !include_inactive && !tree.is_active(node) {
            continue;
        }

        if is_valid_target(tree, node, source)? {
            found.push((tree.name(node)?.to_owned(), node));
        }

        stack.extend(tree.children(node)?.iter().rev().copied());
    }

    found.sort_by(|(a, _), (b, _)| a.cmp(b));

    Ok(found.into_iter().map(|(_, node)| node).collect())
}
