//! Copy profiles: the JSONC file that stores what to copy and how to classify
//! components.
//!
//! A profile looks like this, every field being optional:
//!
//! ```jsonc
//! {
//!   // Outfits usually only need the bone scale.
//!   "copyPosition": false,
//!   "copyRotation": false,
//!   "copyScale": true,
//!   "overwriteExisting": true,
//!   "capture": {
//!     "categories": ["pluginFramework"],
//!     "types": ["VRC.SDK3.Dynamics.PhysBone.Components.VRCPhysBone"]
//!   },
//!   "allowedTypes": ["nadena.dev.modular_avatar.core.ModularAvatarScaleAdjuster"],
//!   "classifier": { "thirdPartyPrefixes": ["VRC", "lilToon"] },
//!   "knownTypes": []
//! }
//! ```

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    copy::{ApplyOptions, Category, Classifier, ComponentType, ComponentTypeSet, SelectionFilter},
    rig::TypeRegistry,
};

pub const PROFILE_FILE_NAME: &str = "rigcopy.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CopyProfile {
    pub copy_position: bool,
    pub copy_rotation: bool,
    pub copy_scale: bool,
    pub overwrite_existing: bool,

    /// Which components are captured into snapshots.
    pub capture: CaptureSelection,

    /// Which captured component types may be written to targets. When
    /// absent, every type may be.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<BTreeSet<ComponentType>>,

    pub classifier: Classifier,

    /// Extra component types the host can construct, on top of the ones
    /// already present in the scene.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub known_types: Vec<ComponentType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CaptureSelection {
    pub categories: BTreeSet<Category>,
    pub types: BTreeSet<ComponentType>,
}

impl Default for CaptureSelection {
    fn default() -> Self {
        CaptureSelection {
            categories: [Category::PluginFramework].into_iter().collect(),
            types: BTreeSet::new(),
        }
    }
}

impl Default for CopyProfile {
    fn default() -> Self {
        let options = ApplyOptions::default();

        CopyProfile {
            copy_position: options.copy_position,
            copy_rotation: options.copy_rotation,
            copy_scale: options.copy_scale,
            overwrite_existing: options.overwrite_existing,
            capture: CaptureSelection::default(),
            allowed_types: None,
            classifier: Classifier::default(),
            known_types: Vec::new(),
        }
    }
}

impl CopyProfile {
    pub fn from_slice(contents: &[u8], path: &Path) -> anyhow::Result<Self> {
        crate::json::from_slice_with_context(contents, || {
            format!("Error parsing copy profile at {}", path.display())
        })
    }

    pub fn load_exact(path: &Path) -> anyhow::Result<Self> {
        let contents = fs_err::read(path)?;
        Self::from_slice(&contents, path)
    }

    /// Loads the profile at `path` if one is given. Otherwise looks for
    /// `rigcopy.json` in `search_dir` and falls back to the default profile
    /// if there is none.
    pub fn load_fuzzy(path: Option<&Path>, search_dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load_exact(path)
                .with_context(|| format!("Could not load copy profile {}", path.display()));
        }

        let candidate: PathBuf = search_dir.join(PROFILE_FILE_NAME);
        if candidate.is_file() {
            log::debug!("Using copy profile at {}", candidate.display());
            Self::load_exact(&candidate)
        } else {
            log::trace!("No {} found, using the default profile", PROFILE_FILE_NAME);
            Ok(Self::default())
        }
    }

    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            copy_position: self.copy_position,
            copy_rotation: self.copy_rotation,
            copy_scale: self.copy_scale,
            overwrite_existing: self.overwrite_existing,
            allowed_component_types: match &self.allowed_types {
                Some(types) => ComponentTypeSet::Only(types.clone()),
                None => ComponentTypeSet::All,
            },
        }
    }

    pub fn selection_filter(&self) -> SelectionFilter {
        let mut filter = SelectionFilter::new(self.classifier.clone());

        for &category in &self.capture.categories {
            filter = filter.with_category(category);
        }

        for component_type in &self.capture.types {
            filter = filter.with_type(component_type.clone());
        }

        filter
    }

    pub fn register_known_types(&self, registry: &mut TypeRegistry) {
        registry.extend(self.known_types.iter().cloned());
    }
}
