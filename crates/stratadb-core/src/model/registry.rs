use crate::model::{MetadataError, class::ClassDescriptor};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// MetadataProvider
///
/// Read-only descriptor lookup. The persister consults this for the root
/// entity and for each registered subclass; it never mutates metadata.
///

pub trait MetadataProvider {
    fn descriptor(&self, name: &str) -> Result<&ClassDescriptor, MetadataError>;
}

///
/// MetadataRegistry
///
/// Owned provider implementation keyed by qualified class name.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct MetadataRegistry {
    classes: BTreeMap<String, ClassDescriptor>,
}

impl MetadataRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: ClassDescriptor) {
        self.classes.insert(class.name.clone(), class);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MetadataProvider for MetadataRegistry {
    fn descriptor(&self, name: &str) -> Result<&ClassDescriptor, MetadataError> {
        self.classes
            .get(name)
            .ok_or_else(|| MetadataError::unknown_class(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_is_a_configuration_fault() {
        let registry = MetadataRegistry::new();
        let err = registry
            .descriptor("Ghost")
            .expect_err("empty registry should miss");

        assert_eq!(
            err,
            MetadataError::UnknownClass {
                name: "Ghost".to_string()
            }
        );
    }

    #[test]
    fn registered_descriptor_resolves_by_name() {
        let mut registry = MetadataRegistry::new();
        registry.register(ClassDescriptor::new("Vehicle", "vehicles"));

        let class = registry
            .descriptor("Vehicle")
            .expect("registered class should resolve");
        assert_eq!(class.table, "vehicles");
        assert!(class.is_root());
    }
}
