//! Defines the algorithm for capturing a snapshot from a live hierarchy.

use crate::error::ErrorDisplay;

use super::{
    CaptureFilter, ComponentRecord, ComponentSerializer, NodeTree, Payload, Snapshot,
    SnapshotNode, TreeError,
};

/// Captures the descendants of `root` into a new [`Snapshot`].
///
/// Every visited node records its full local transform. Components accepted
/// by `filter` are serialized in attachment order; a component that fails to
/// serialize is recorded with an empty-object payload instead of aborting the
/// capture. The source tree is only read.
pub fn capture<T, F, S>(
    tree: &T,
    root: T::NodeId,
    filter: &F,
    serializer: &S,
) -> Result<Snapshot, TreeError>
where
    T: NodeTree,
    F: CaptureFilter + ?Sized,
    S: ComponentSerializer<T> + ?Sized,
{
    let mut context = CaptureContext {
        filter,
        serializer,
        fallback_payloads: 0,
    };

    let mut roots = Vec::new();
    for &child in tree.children(root)? {
        roots.push(capture_node(&mut context, tree, child)?);
    }

    let snapshot = Snapshot::new(roots);

    log::debug!(
        "Captured {} nodes and {} components ({} with fallback payloads)",
        snapshot.node_count(),
        snapshot.component_count(),
        context.fallback_payloads
    );

    Ok(snapshot)
}

struct CaptureContext<'a, F: ?Sized, S: ?Sized> {
    filter: &'a F,
    serializer: &'a S,
    fallback_payloads: usize,
}

fn capture_node<T, F, S>(
    context: &mut CaptureContext<'_, F, S>,
    tree: &T,
    id: T::NodeId,
) -> Result<SnapshotNode, TreeError>
where
    T: NodeTree,
    F: CaptureFilter + ?Sized,
    S: ComponentSerializer<T> + ?Sized,
{
    let name = tree.name(id)?.to_owned();
    log::trace!("Capturing {}", name);

    let mut node = SnapshotNode::new(name).transform(tree.transform(id)?);

    for component in tree.components(id)? {
        let type_id = tree.component_type(component)?;

        if !context.filter.accepts(type_id) {
            continue;
        }

        let payload = match context.serializer.serialize(tree, component) {
            Ok(payload) => payload,
            Err(err) => {
                log::warn!(
                    "Could not serialize {} on {}, recording it as empty: {}",
                    type_id,
                    node.name,
                    ErrorDisplay(err)
                );

                context.fallback_payloads += 1;
                Payload::empty_object()
            }
        };

        node.components.push(ComponentRecord {
            type_id: type_id.clone(),
            payload,
        });
    }

    for &child in tree.children(id)? {
        let child_node = capture_node(context, tree, child)?;
        node.children.push(child_node);
    }

    Ok(node)
}
