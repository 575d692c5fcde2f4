use std::{
    env,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::Parser;
use fs_err::File;

use crate::{
    config::CopyProfile,
    copy::{capture, is_valid_source, SelectionFilter, Snapshot},
    rig::{JsonFieldSerializer, RigTree, TypeRegistry},
};

use super::{find_node, load_scene, resolve_path};

/// Captures an armature into a snapshot file that can be applied later.
#[derive(Debug, Parser)]
pub struct SnapshotCommand {
    /// Path to the scene file to read.
    pub scene: PathBuf,

    /// Path of the source armature below the scene root, like `Armature`.
    #[clap(long)]
    pub source: String,

    /// Where to write the snapshot. Omit this to only print an outline.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Copy profile to read. Defaults to rigcopy.json in the current
    /// directory, if there is one.
    #[clap(long)]
    pub profile: Option<PathBuf>,

    /// Capture every component instead of the profile's selection.
    #[clap(long)]
    pub all_components: bool,
}

impl SnapshotCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let scene_path = resolve_path(&self.scene)?;
        let profile = CopyProfile::load_fuzzy(self.profile.as_deref(), &env::current_dir()?)?;

        let mut registry = TypeRegistry::new();
        let tree = load_scene(&scene_path, &mut registry)?;

        let filter = if self.all_components {
            SelectionFilter::everything(profile.classifier.clone())
        } else {
            profile.selection_filter()
        };

        let snapshot = capture_source(&tree, &self.source, &filter)?;

        log::info!(
            "Captured {} objects and {} components from {}",
            snapshot.node_count(),
            snapshot.component_count(),
            self.source
        );

        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", snapshot)?;
        stdout.flush()?;

        if let Some(output_path) = self.output {
            write_snapshot(&snapshot, &resolve_path(&output_path)?)?;
        }

        Ok(())
    }
}

/// Validates the source armature at `path` and captures it.
pub(super) fn capture_source(
    tree: &RigTree,
    path: &str,
    filter: &SelectionFilter,
) -> anyhow::Result<Snapshot> {
    let source = find_node(tree, path)?;

    if !is_valid_source(tree, source)? {
        bail!(
            "'{}' cannot be used as a source: expected an armature with at least one bone",
            path
        );
    }

    if filter.is_empty() {
        log::debug!("No components selected, capturing transforms only");
    }

    Ok(capture(tree, source, filter, &JsonFieldSerializer)?)
}

pub(super) fn read_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let contents = fs_err::read(path)?;

    serde_json::from_slice(&contents)
        .with_context(|| format!("Malformed snapshot file at {}", path.display()))
}

fn write_snapshot(snapshot: &Snapshot, path: &Path) -> anyhow::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, snapshot).context("Could not encode snapshot")?;
    file.flush()?;

    log::info!("Wrote snapshot to {}", path.display());
    Ok(())
}
