use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;

use crate::{copy::find_armatures, rig::TypeRegistry};

use super::{find_node, load_scene, node_path, resolve_path};

/// Lists the armatures in a scene that can be copied to.
#[derive(Debug, Parser)]
pub struct FindCommand {
    /// Path to the scene file to read.
    pub scene: PathBuf,

    /// Only search below this node. Defaults to the whole scene.
    #[clap(long, default_value = "")]
    pub root: String,

    /// Source armature to leave out of the results.
    #[clap(long)]
    pub source: Option<String>,

    /// Also list armatures that are inactive or below an inactive node.
    #[clap(long)]
    pub include_inactive: bool,
}

impl FindCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let scene_path = resolve_path(&self.scene)?;
        let tree = load_scene(&scene_path, &mut TypeRegistry::new())?;

        let search_root = find_node(&tree, &self.root)?;
        let source = match &self.source {
            Some(path) => Some(find_node(&tree, path)?),
            None => None,
        };

        let armatures = find_armatures(&tree, search_root, source, self.include_inactive)?;
        log::debug!("Found {} armatures", armatures.len());

        let mut stdout = io::stdout().lock();
        for id in armatures {
            writeln!(stdout, "{}", node_path(&tree, id))?;
        }
        stdout.flush()?;

        Ok(())
    }
}
