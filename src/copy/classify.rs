//! Groups component types into a handful of categories by namespace.
//!
//! Categories only drive selection; they have no effect on how a snapshot is
//! captured or applied once the selection is made.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::{ComponentType, NodeTree, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Transform,
    PluginFramework,
    EngineBuiltin,
    ThirdPartyRuntime,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Transform,
        Category::PluginFramework,
        Category::EngineBuiltin,
        Category::ThirdPartyRuntime,
        Category::Other,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Category::Transform => "Transform",
            Category::PluginFramework => "Plugin framework",
            Category::EngineBuiltin => "Engine built-in",
            Category::ThirdPartyRuntime => "Third-party runtime",
            Category::Other => "Other",
        };

        formatter.write_str(label)
    }
}

/// Namespace-prefix rules used to categorize component types.
///
/// The defaults describe a Unity avatar project using Modular Avatar and the
/// VRChat SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Classifier {
    pub transform_type: ComponentType,
    pub plugin_framework_prefix: String,

    /// Set by the host once it knows whether the plugin framework is loaded.
    /// While unavailable, nothing is categorized as `PluginFramework`.
    pub plugin_framework_available: bool,

    pub engine_prefix: String,
    pub third_party_prefixes: Vec<String>,

    /// Engine types whose name ends with one of these are not safe to copy.
    pub unsafe_suffixes: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            transform_type: ComponentType::new("UnityEngine.Transform"),
            plugin_framework_prefix: "nadena.dev.modular_avatar".to_owned(),
            plugin_framework_available: true,
            engine_prefix: "UnityEngine".to_owned(),
            third_party_prefixes: vec!["VRC".to_owned()],
            unsafe_suffixes: vec![
                "Renderer".to_owned(),
                "Collider".to_owned(),
                "Rigidbody".to_owned(),
            ],
        }
    }
}

impl Classifier {
    pub fn classify(&self, component_type: &ComponentType) -> Category {
        if *component_type == self.transform_type {
            return Category::Transform;
        }

        let namespace = match component_type.namespace() {
            Some(namespace) => namespace,
            None => return Category::Other,
        };

        if self.plugin_framework_available
            && namespace.starts_with(self.plugin_framework_prefix.as_str())
        {
            Category::PluginFramework
        } else if namespace.starts_with(self.engine_prefix.as_str()) {
            Category::EngineBuiltin
        } else if self
            .third_party_prefixes
            .iter()
            .any(|prefix| namespace.starts_with(prefix.as_str()))
        {
            Category::ThirdPartyRuntime
        } else {
            Category::Other
        }
    }

    /// Whether copying components of this type between hierarchies is
    /// expected to behave. Renderers, colliders and rigidbodies carry
    /// references that rarely survive the copy.
    pub fn is_safe_to_copy(&self, component_type: &ComponentType) -> bool {
        match self.classify(component_type) {
            Category::Transform => false,
            Category::PluginFramework => true,
            Category::EngineBuiltin => !self
                .unsafe_suffixes
                .iter()
                .any(|suffix| component_type.name().ends_with(suffix.as_str())),
            _ => true,
        }
    }
}

/// Every distinct component type present under a root, grouped by category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComponentCatalog {
    by_category: BTreeMap<Category, Vec<ComponentType>>,
}

impl ComponentCatalog {
    /// Walks `root` and all of its descendants. Transform components are left
    /// out. Within a category, types keep the order they were first seen in.
    pub fn collect<T: NodeTree>(
        tree: &T,
        root: T::NodeId,
        classifier: &Classifier,
    ) -> Result<Self, TreeError> {
        let mut catalog = ComponentCatalog::default();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            for component in tree.components(node)? {
                let component_type = tree.component_type(component)?;
                let category = classifier.classify(component_type);

                if category == Category::Transform {
                    continue;
                }

                let bucket = catalog.by_category.entry(category).or_default();
                if !bucket.contains(component_type) {
                    bucket.push(component_type.clone());
                }
            }

            stack.extend(tree.children(node)?.iter().rev().copied());
        }

        Ok(catalog)
    }

    pub fn get(&self, category: Category) -> &[ComponentType] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[ComponentType])> {
        self.by_category
            .iter()
            .map(|(category, types)| (*category, types.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
