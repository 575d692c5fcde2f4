use std::{collections::BTreeSet, env, path::PathBuf};

use anyhow::{bail, Context};
use clap::Parser;

use crate::{
    config::CopyProfile,
    copy::{
        apply_to_targets, find_armatures, is_valid_target, ApplyOptions, ComponentType,
        ComponentTypeSet, SelectionFilter,
    },
    rig::{JsonFieldSerializer, NodeId, RigTree, SceneNode, TypeRegistry},
};

use super::{
    find_node, load_scene, node_path, resolve_path,
    snapshot::{capture_source, read_snapshot},
};

/// Copies bone transforms and components from one armature onto others.
///
/// The source is either an armature in the same scene or a snapshot file
/// written earlier by `rigcopy snapshot`.
#[derive(Debug, Parser)]
pub struct ApplyCommand {
    /// Path to the scene file containing the targets.
    pub scene: PathBuf,

    /// Path of the source armature below the scene root.
    #[clap(long, conflicts_with = "snapshot", required_unless_present = "snapshot")]
    pub source: Option<String>,

    /// Snapshot file to apply instead of capturing a source armature.
    #[clap(long)]
    pub snapshot: Option<PathBuf>,

    /// Path of a target armature below the scene root. Can be given multiple
    /// times.
    #[clap(long = "target", required_unless_present = "all-targets")]
    pub targets: Vec<String>,

    /// Apply to every active armature in the scene other than the source.
    #[clap(long, conflicts_with = "targets")]
    pub all_targets: bool,

    /// Where to write the modified scene. Defaults to overwriting the input
    /// scene.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Copy profile to read. Defaults to rigcopy.json in the current
    /// directory, if there is one.
    #[clap(long)]
    pub profile: Option<PathBuf>,

    /// Also copy bone positions.
    #[clap(long)]
    pub position: bool,

    /// Also copy bone rotations.
    #[clap(long)]
    pub rotation: bool,

    /// Do not copy bone scale.
    #[clap(long)]
    pub no_scale: bool,

    /// Leave components that already exist on the targets untouched.
    #[clap(long)]
    pub keep_existing: bool,

    /// Only write components of this type. Can be given multiple times.
    #[clap(long = "only")]
    pub only_types: Vec<String>,

    /// Capture every component of the source instead of the profile's
    /// selection.
    #[clap(long)]
    pub all_components: bool,
}

impl ApplyCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let scene_path = resolve_path(&self.scene)?;
        let profile = CopyProfile::load_fuzzy(self.profile.as_deref(), &env::current_dir()?)?;
        let options = self.apply_options(&profile);

        if options.is_noop() {
            bail!(
                "Nothing to copy: enable at least one of position, rotation or scale, \
                 or allow some component types"
            );
        }

        let mut registry = TypeRegistry::new();
        let mut tree = load_scene(&scene_path, &mut registry)?;
        profile.register_known_types(&mut registry);

        let (snapshot, source) = match (&self.source, &self.snapshot) {
            (Some(source_path), _) => {
                let filter = if self.all_components {
                    SelectionFilter::everything(profile.classifier.clone())
                } else {
                    profile.selection_filter()
                };

                let snapshot = capture_source(&tree, source_path, &filter)?;
                (snapshot, Some(find_node(&tree, source_path)?))
            }
            (None, Some(snapshot_path)) => (read_snapshot(&resolve_path(snapshot_path)?)?, None),
            (None, None) => bail!("Either --source or --snapshot must be given"),
        };

        let targets = self.resolve_targets(&tree, source)?;
        if targets.is_empty() {
            bail!("No target armatures found in {}", scene_path.display());
        }

        log::info!(
            "Copying {} objects to {} targets",
            snapshot.node_count(),
            targets.len()
        );

        let batch = apply_to_targets(
            &snapshot,
            &mut tree,
            &targets,
            &options,
            &registry,
            &JsonFieldSerializer,
        );

        for outcome in &batch.outcomes {
            if let Ok(report) = &outcome.result {
                log::info!("{}: {}", node_path(&tree, outcome.target), report);
            }
        }

        let output_path = match &self.output {
            Some(output) => resolve_path(output)?.into_owned(),
            None => scene_path.into_owned(),
        };

        SceneNode::from_tree(&tree, tree.get_root_id())?
            .write(&output_path)
            .with_context(|| format!("Could not write scene to {}", output_path.display()))?;

        let failed = batch.failed_targets();
        if !failed.is_empty() {
            let names: Vec<String> = failed.iter().map(|&id| node_path(&tree, id)).collect();
            bail!(
                "{} of {} targets could not be updated: {}",
                failed.len(),
                batch.outcomes.len(),
                names.join(", ")
            );
        }

        log::info!("Done: {}", batch.totals());
        Ok(())
    }

    /// The profile's options with command line flags applied on top.
    fn apply_options(&self, profile: &CopyProfile) -> ApplyOptions {
        let mut options = profile.apply_options();

        if self.position {
            options.copy_position = true;
        }

        if self.rotation {
            options.copy_rotation = true;
        }

        if self.no_scale {
            options.copy_scale = false;
        }

        if self.keep_existing {
            options.overwrite_existing = false;
        }

        if !self.only_types.is_empty() {
            let types: BTreeSet<ComponentType> = self
                .only_types
                .iter()
                .map(|type_id| ComponentType::new(type_id.as_str()))
                .collect();

            options.allowed_component_types = ComponentTypeSet::Only(types);
        }

        options
    }

    fn resolve_targets(
        &self,
        tree: &RigTree,
        source: Option<NodeId>,
    ) -> anyhow::Result<Vec<NodeId>> {
        if self.all_targets {
            return Ok(find_armatures(tree, tree.get_root_id(), source, false)?);
        }

        let mut targets = Vec::with_capacity(self.targets.len());

        for path in &self.targets {
            let target = find_node(tree, path)?;

            if !is_valid_target(tree, target, source)? {
                bail!(
                    "'{}' cannot be used as a target: expected an armature other than the source",
                    path
                );
            }

            if targets.contains(&target) {
                log::warn!("Target {} was given more than once", path);
                continue;
            }

            targets.push(target);
        }

        Ok(targets)
    }
}
