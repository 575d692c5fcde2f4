//! Defines the algorithm for merging a snapshot into target hierarchies.

use std::fmt;

use thiserror::Error;

use crate::error::ErrorDisplay;

use super::{
    ApplyOptions, ComponentRecord, ComponentSerializer, LocalTransform, NodeTree, Snapshot,
    SnapshotNode, TreeError, TypeResolver,
};

/// A non-fatal problem encountered while applying a snapshot. The record in
/// question was skipped and the pass continued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyWarning {
    #[error("{node}: component type {type_id} could not be resolved")]
    UnresolvedType { node: String, type_id: String },

    #[error("{node}: could not look up component {type_id}: {reason}")]
    Lookup {
        node: String,
        type_id: String,
        reason: String,
    },

    #[error("{node}: could not add component {type_id}: {reason}")]
    CannotAdd {
        node: String,
        type_id: String,
        reason: String,
    },

    #[error("{node}: could not write component {type_id}: {reason}")]
    Deserialize {
        node: String,
        type_id: String,
        reason: String,
    },
}

/// Counts of what a single apply pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub matched_nodes: usize,

    /// Snapshot nodes that were never visited because they, or one of their
    /// ancestors, had no counterpart in the target.
    pub skipped_nodes: usize,

    pub components_updated: usize,
    pub components_created: usize,

    /// Components left alone because they already existed and overwriting
    /// was turned off.
    pub components_skipped: usize,

    pub components_failed: usize,
    pub warnings: Vec<ApplyWarning>,
}

impl ApplyReport {
    fn merge(&mut self, other: &ApplyReport) {
        self.matched_nodes += other.matched_nodes;
        self.skipped_nodes += other.skipped_nodes;
        self.components_updated += other.components_updated;
        self.components_created += other.components_created;
        self.components_skipped += other.components_skipped;
        self.components_failed += other.components_failed;
        self.warnings.extend(other.warnings.iter().cloned());
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "{} nodes matched, {} skipped; components: {} updated, {} created, {} kept, {} failed",
            self.matched_nodes,
            self.skipped_nodes,
            self.components_updated,
            self.components_created,
            self.components_skipped,
            self.components_failed
        )
    }
}

/// A failure that stopped an apply pass for one target partway through.
/// Whatever was applied before the failure stays applied.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("target tree could not be read or modified")]
    Tree {
        #[from]
        source: TreeError,
    },
}

/// Merges `snapshot` into the hierarchy below `target_root`.
///
/// Snapshot roots are matched against the children of `target_root` by exact
/// name, first match wins, and the walk continues into matched nodes only.
/// Snapshot subtrees without a match are skipped whole; they are never looked
/// for anywhere else in the target.
pub fn apply<T, R, S>(
    snapshot: &Snapshot,
    tree: &mut T,
    target_root: T::NodeId,
    options: &ApplyOptions,
    resolver: &R,
    serializer: &S,
) -> Result<ApplyReport, ApplyError>
where
    T: NodeTree,
    R: TypeResolver + ?Sized,
    S: ComponentSerializer<T> + ?Sized,
{
    let mut context = ApplyContext {
        options,
        resolver,
        serializer,
        report: ApplyReport::default(),
    };

    for root in snapshot.roots() {
        apply_node(&mut context, tree, target_root, root, "")?;
    }

    Ok(context.report)
}

/// The result of applying one snapshot to one of several targets.
#[derive(Debug)]
pub struct TargetOutcome<Id> {
    pub target: Id,
    pub result: Result<ApplyReport, ApplyError>,
}

#[derive(Debug)]
pub struct BatchReport<Id> {
    pub outcomes: Vec<TargetOutcome<Id>>,
}

impl<Id: Copy> BatchReport<Id> {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .count()
    }

    pub fn failed_targets(&self) -> Vec<Id> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .map(|outcome| outcome.target)
            .collect()
    }

    /// Sums the reports of every target that completed.
    pub fn totals(&self) -> ApplyReport {
        let mut totals = ApplyReport::default();

        for outcome in &self.outcomes {
            if let Ok(report) = &outcome.result {
                totals.merge(report);
            }
        }

        totals
    }
}

/// Applies `snapshot` to each target in turn.
///
/// Each target gets its own independent pass. A pass that fails is recorded
/// in its outcome and the remaining targets are still processed.
pub fn apply_to_targets<T, R, S>(
    snapshot: &Snapshot,
    tree: &mut T,
    targets: &[T::NodeId],
    options: &ApplyOptions,
    resolver: &R,
    serializer: &S,
) -> BatchReport<T::NodeId>
where
    T: NodeTree,
    R: TypeResolver + ?Sized,
    S: ComponentSerializer<T> + ?Sized,
{
    let mut outcomes = Vec::with_capacity(targets.len());

    for &target in targets {
        let result = apply(snapshot, tree, target, options, resolver, serializer);

        match &result {
            Ok(report) => log::debug!("Applied snapshot to {:?}: {}", target, report),
            Err(err) => log::error!(
                "Applying snapshot to {:?} failed: {}",
                target,
                ErrorDisplay(err)
            ),
        }

        outcomes.push(TargetOutcome { target, result });
    }

    BatchReport { outcomes }
}

struct ApplyContext<'a, R: ?Sized, S: ?Sized> {
    options: &'a ApplyOptions,
    resolver: &'a R,
    serializer: &'a S,
    report: ApplyReport,
}

fn apply_node<T, R, S>(
    context: &mut ApplyContext<'_, R, S>,
    tree: &mut T,
    parent: T::NodeId,
    snapshot_node: &SnapshotNode,
    parent_path: &str,
) -> Result<(), TreeError>
where
    T: NodeTree,
    R: TypeResolver + ?Sized,
    S: ComponentSerializer<T> + ?Sized,
{
    let path = if parent_path.is_empty() {
        snapshot_node.name.clone()
    } else {
        format!("{}/{}", parent_path, snapshot_node.name)
    };

    let target = match tree.find_child(parent, &snapshot_node.name)? {
        Some(target) => target,
        None => {
            let skipped = snapshot_node.subtree_len();
            log::debug!("{} has no counterpart, skipping {} nodes", path, skipped);

            context.report.skipped_nodes += skipped;
            return Ok(());
        }
    };

    log::trace!("Applying {} to {:?}", path, target);
    context.report.matched_nodes += 1;

    apply_transform(context.options, tree, target, &snapshot_node.transform)?;

    for record in &snapshot_node.components {
        apply_component(context, tree, target, record, &path);
    }

    for child in &snapshot_node.children {
        apply_node(context, tree, target, child, &path)?;
    }

    Ok(())
}

fn apply_transform<T: NodeTree>(
    options: &ApplyOptions,
    tree: &mut T,
    target: T::NodeId,
    captured: &LocalTransform,
) -> Result<(), TreeError> {
    if !options.copies_transform() {
        return Ok(());
    }

    let mut transform = tree.transform(target)?;

    if options.copy_position {
        transform.position = captured.position;
    }

    if options.copy_rotation {
        transform.rotation = captured.rotation;
    }

    if options.copy_scale {
        transform.scale = captured.scale;
    }

    tree.set_transform(target, transform)
}

fn apply_component<T, R, S>(
    context: &mut ApplyContext<'_, R, S>,
    tree: &mut T,
    target: T::NodeId,
    record: &ComponentRecord,
    path: &str,
) where
    T: NodeTree,
    R: TypeResolver + ?Sized,
    S: ComponentSerializer<T> + ?Sized,
{
    if !context.options.allowed_component_types.contains(&record.type_id) {
        return;
    }

    let component_type = match context.resolver.resolve(record.type_id.as_str()) {
        Some(component_type) => component_type,
        None => {
            context.warn(ApplyWarning::UnresolvedType {
                node: path.to_owned(),
                type_id: record.type_id.to_string(),
            });
            return;
        }
    };

    let existing = match tree.find_component(target, &component_type) {
        Ok(existing) => existing,
        Err(err) => {
            context.warn(ApplyWarning::Lookup {
                node: path.to_owned(),
                type_id: record.type_id.to_string(),
                reason: ErrorDisplay(err).to_string(),
            });
            return;
        }
    };

    let (component, created) = match existing {
        Some(existing) => {
            if !context.options.overwrite_existing {
                context.report.components_skipped += 1;
                return;
            }

            (existing, false)
        }
        None => match tree.add_component(target, &component_type) {
            Ok(component) => (component, true),
            Err(err) => {
                context.warn(ApplyWarning::CannotAdd {
                    node: path.to_owned(),
                    type_id: record.type_id.to_string(),
                    reason: ErrorDisplay(err).to_string(),
                });
                return;
            }
        },
    };

    // A freshly added component stays attached even if writing its state
    // fails, like it would in the editor.
    match context
        .serializer
        .deserialize(tree, component, &record.payload)
    {
        Ok(()) if created => context.report.components_created += 1,
        Ok(()) => context.report.components_updated += 1,
        Err(err) => context.warn(ApplyWarning::Deserialize {
            node: path.to_owned(),
            type_id: record.type_id.to_string(),
            reason: ErrorDisplay(err).to_string(),
        }),
    }
}

impl<R: ?Sized, S: ?Sized> ApplyContext<'_, R, S> {
    fn warn(&mut self, warning: ApplyWarning) {
        log::warn!("{}", warning);

        self.report.components_failed += 1;
        self.report.warnings.push(warning);
    }
}
