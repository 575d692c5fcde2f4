//! Selection rules for capturing and applying snapshots.

use std::collections::{BTreeSet, HashSet};

use super::{Category, Classifier, ComponentType};

/// Decides whether a component is captured into a snapshot.
///
/// Implemented for closures taking the component's type. Custom filters
/// should reject the host's transform type; [`SelectionFilter`] always does.
pub trait CaptureFilter {
    fn accepts(&self, component_type: &ComponentType) -> bool;
}

impl<F> CaptureFilter for F
where
    F: Fn(&ComponentType) -> bool,
{
    fn accepts(&self, component_type: &ComponentType) -> bool {
        self(component_type)
    }
}

/// The usual capture filter: a set of whole categories plus an allow-list of
/// individual types. A component is captured if either one admits it.
///
/// Transform-category components are never captured, even when listed
/// explicitly; node transforms are recorded separately. An empty filter
/// captures no components, only transforms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionFilter {
    classifier: Classifier,
    categories: HashSet<Category>,
    types: HashSet<ComponentType>,
}

impl SelectionFilter {
    pub fn new(classifier: Classifier) -> Self {
        SelectionFilter {
            classifier,
            categories: HashSet::new(),
            types: HashSet::new(),
        }
    }

    /// Captures every component except transforms.
    pub fn everything(classifier: Classifier) -> Self {
        let mut filter = SelectionFilter::new(classifier);
        filter.categories.extend(
            Category::ALL
                .into_iter()
                .filter(|&category| category != Category::Transform),
        );
        filter
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category);
        self
    }

    pub fn with_type(mut self, component_type: impl Into<ComponentType>) -> Self {
        self.types.insert(component_type.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.types.is_empty()
    }
}

impl CaptureFilter for SelectionFilter {
    fn accepts(&self, component_type: &ComponentType) -> bool {
        let category = self.classifier.classify(component_type);

        if category == Category::Transform {
            return false;
        }

        self.types.contains(component_type) || self.categories.contains(&category)
    }
}

/// Which component types may be written to targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ComponentTypeSet {
    #[default]
    All,
    Only(BTreeSet<ComponentType>),
}

impl ComponentTypeSet {
    pub fn contains(&self, component_type: &ComponentType) -> bool {
        match self {
            ComponentTypeSet::All => true,
            ComponentTypeSet::Only(types) => types.contains(component_type),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ComponentTypeSet::All => false,
            ComponentTypeSet::Only(types) => types.is_empty(),
        }
    }
}

impl FromIterator<ComponentType> for ComponentTypeSet {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        ComponentTypeSet::Only(iter.into_iter().collect())
    }
}

/// Options controlling how a snapshot is merged into a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    pub copy_position: bool,
    pub copy_rotation: bool,
    pub copy_scale: bool,

    /// When false, components that already exist on a target node keep their
    /// current state. Missing components are created either way.
    pub overwrite_existing: bool,

    pub allowed_component_types: ComponentTypeSet,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        ApplyOptions {
            copy_position: false,
            copy_rotation: false,
            copy_scale: true,
            overwrite_existing: true,
            allowed_component_types: ComponentTypeSet::All,
        }
    }
}

impl ApplyOptions {
    /// Copies every transform field and every component, overwriting.
    pub fn everything() -> Self {
        ApplyOptions {
            copy_position: true,
            copy_rotation: true,
            copy_scale: true,
            overwrite_existing: true,
            allowed_component_types: ComponentTypeSet::All,
        }
    }

    pub fn copies_transform(&self) -> bool {
        self.copy_position || self.copy_rotation || self.copy_scale
    }

    /// True when applying with these options could not change anything.
    pub fn is_noop(&self) -> bool {
        !self.copies_transform() && self.allowed_component_types.is_empty()
    }
}
