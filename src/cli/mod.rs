//! Defines rigcopy's CLI through clap types.

mod apply;
mod components;
mod find;
mod snapshot;

use std::{borrow::Cow, env, path::Path, str::FromStr};

use anyhow::{bail, Context};
use clap::Parser;
use thiserror::Error;

use crate::{
    copy::NodeTree,
    rig::{NodeId, RigTree, SceneNode, TypeRegistry},
};

pub use self::apply::ApplyCommand;
pub use self::components::ComponentsCommand;
pub use self::find::FindCommand;
pub use self::snapshot::SnapshotCommand;

/// Command line options that rigcopy accepts, defined using the clap crate.
#[derive(Debug, Parser)]
#[clap(name = "rigcopy", version, about)]
pub struct Options {
    #[clap(flatten)]
    pub global: GlobalOptions,

    /// Subcommand to run in this invocation.
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Options {
    pub fn run(self) -> anyhow::Result<()> {
        match self.subcommand {
            Subcommand::Snapshot(subcommand) => subcommand.run(),
            Subcommand::Apply(subcommand) => subcommand.run(),
            Subcommand::Components(subcommand) => subcommand.run(),
            Subcommand::Find(subcommand) => subcommand.run(),
        }
    }
}

#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Sets verbosity level. Can be specified multiple times.
    #[clap(long("verbose"), short, global(true), parse(from_occurrences))]
    pub verbosity: u8,

    /// Set color behavior. Valid values are auto, always, and never.
    #[clap(long("color"), global(true), default_value("auto"))]
    pub color: ColorChoice,
}

#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl FromStr for ColorChoice {
    type Err = ColorChoiceParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(ColorChoiceParseError {
                attempted: source.to_owned(),
            }),
        }
    }
}

impl From<ColorChoice> for env_logger::WriteStyle {
    fn from(value: ColorChoice) -> Self {
        match value {
            ColorChoice::Auto => env_logger::WriteStyle::Auto,
            ColorChoice::Always => env_logger::WriteStyle::Always,
            ColorChoice::Never => env_logger::WriteStyle::Never,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid color choice '{attempted}'. Valid values are: auto, always, never")]
pub struct ColorChoiceParseError {
    attempted: String,
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Snapshot(SnapshotCommand),
    Apply(ApplyCommand),
    Components(ComponentsCommand),
    Find(FindCommand),
}

pub(super) fn resolve_path(path: &Path) -> anyhow::Result<Cow<'_, Path>> {
    if path.is_absolute() {
        Ok(Cow::Borrowed(path))
    } else {
        let current_dir = env::current_dir().context("Could not read the working directory")?;
        Ok(Cow::Owned(current_dir.join(path)))
    }
}

/// Reads a scene file into a tree, registering every component type it uses.
fn load_scene(path: &Path, registry: &mut TypeRegistry) -> anyhow::Result<RigTree> {
    let scene = SceneNode::read(path)?;

    scene
        .into_tree(registry)
        .with_context(|| format!("Could not load scene {}", path.display()))
}

/// Looks up a node by its `/`-separated path below the scene root.
fn find_node(tree: &RigTree, path: &str) -> anyhow::Result<NodeId> {
    match tree.find_path(tree.get_root_id(), path)? {
        Some(id) => Ok(id),
        None => bail!("No node at path '{}' in the scene", path),
    }
}

/// Formats the `/`-separated path of a node below the scene root.
///
/// The result only finds its way back to the node through `find_node` when
/// no name on the way contains `/` and no earlier sibling shares a name.
fn node_path(tree: &RigTree, id: NodeId) -> String {
    let mut segments = Vec::new();
    let mut current = tree.get_node(id);

    while let Some(node) = current {
        if node.parent().is_none() {
            break;
        }

        segments.push(node.name.as_str());
        current = node.parent().and_then(|parent| tree.get_node(parent));
    }

    segments.reverse();
    segments.join("/")
}
