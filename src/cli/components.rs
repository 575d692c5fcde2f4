use std::{
    env,
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;

use crate::{
    config::CopyProfile,
    copy::{Category, Classifier, ComponentCatalog},
    rig::TypeRegistry,
};

use super::{find_node, load_scene, resolve_path};

/// Lists the component types found on an armature, grouped by category.
#[derive(Debug, Parser)]
pub struct ComponentsCommand {
    /// Path to the scene file to read.
    pub scene: PathBuf,

    /// Path of the armature to inspect, below the scene root.
    #[clap(long)]
    pub source: String,

    /// Copy profile to read the classifier settings from.
    #[clap(long)]
    pub profile: Option<PathBuf>,
}

impl ComponentsCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let scene_path = resolve_path(&self.scene)?;
        let profile = CopyProfile::load_fuzzy(self.profile.as_deref(), &env::current_dir()?)?;

        let tree = load_scene(&scene_path, &mut TypeRegistry::new())?;
        let source = find_node(&tree, &self.source)?;

        let catalog = ComponentCatalog::collect(&tree, source, &profile.classifier)?;

        if catalog.is_empty() {
            log::info!("No components found below {}", self.source);
            return Ok(());
        }

        let mut stdout = io::stdout().lock();
        write_catalog(&mut stdout, &catalog, &profile.classifier)?;
        stdout.flush()?;

        Ok(())
    }
}

fn write_catalog(
    output: &mut impl Write,
    catalog: &ComponentCatalog,
    classifier: &Classifier,
) -> io::Result<()> {
    for (category, types) in catalog.iter() {
        if types.is_empty() || category == Category::Transform {
            continue;
        }

        writeln!(output, "{} ({}):", category, types.len())?;

        for component_type in types {
            if classifier.is_safe_to_copy(component_type) {
                writeln!(output, "  {}", component_type)?;
            } else {
                writeln!(output, "  {} (not safe to copy)", component_type)?;
            }
        }
    }

    Ok(())
}
