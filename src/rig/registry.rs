use std::collections::BTreeSet;

use crate::copy::{ComponentType, TypeResolver};

/// The component types the host knows how to construct.
///
/// Populated once by the host, typically from every type found in the loaded
/// scenes plus any extra types the copy profile lists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    types: BTreeSet<ComponentType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component_type: ComponentType) {
        self.types.insert(component_type);
    }
}

impl Extend<ComponentType> for TypeRegistry {
    fn extend<I: IntoIterator<Item = ComponentType>>(&mut self, iter: I) {
        self.types.extend(iter);
    }
}

impl FromIterator<ComponentType> for TypeRegistry {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        TypeRegistry {
            types: iter.into_iter().collect(),
        }
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, type_id: &str) -> Option<ComponentType> {
        self.types.get(type_id).cloned()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolves_registered_types_only() {
        let registry: TypeRegistry = vec![ComponentType::new("A.B")].into_iter().collect();

        assert_eq!(registry.resolve("A.B"), Some(ComponentType::new("A.B")));
        assert_eq!(registry.resolve("A.C"), None);
        assert_eq!(registry.resolve("a.b"), None);
    }
}
