//! Runtime metadata for mapped class hierarchies.
//!
//! Descriptors are externally owned and read-only from the persister's point
//! of view; this module never validates upstream consistency, it only
//! surfaces lookup failures as configuration faults.

pub mod association;
pub mod class;
pub mod discriminator;
pub mod field;
pub mod registry;

use thiserror::Error as ThisError;

// re-exports
pub use association::{AssociationKind, AssociationMapping, JoinColumn};
pub use class::{ClassDescriptor, InheritanceKind};
pub use discriminator::{DiscriminatorColumn, DiscriminatorGeneration, DiscriminatorMap};
pub use field::{FieldMapping, SqlType};
pub use registry::{MetadataProvider, MetadataRegistry};

///
/// MetadataError
///
/// Configuration faults surfaced by metadata lookups. The persister performs
/// no repair; a miss here means the mapping layer produced inconsistent
/// descriptors and the fault propagates to the caller.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MetadataError {
    #[error("unknown class: {name}")]
    UnknownClass { name: String },

    #[error("class {class} has no field or column named {field}")]
    UnknownField { class: String, field: String },

    #[error("class {class} declares no discriminator column")]
    MissingDiscriminatorColumn { class: String },

    #[error("class {class} has no discriminator map entry")]
    MissingDiscriminator { class: String },
}

impl MetadataError {
    pub(crate) fn unknown_class(name: impl Into<String>) -> Self {
        Self::UnknownClass { name: name.into() }
    }

    pub(crate) fn unknown_field(class: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            class: class.into(),
            field: field.into(),
        }
    }

    pub(crate) fn missing_discriminator_column(class: impl Into<String>) -> Self {
        Self::MissingDiscriminatorColumn {
            class: class.into(),
        }
    }

    pub(crate) fn missing_discriminator(class: impl Into<String>) -> Self {
        Self::MissingDiscriminator {
            class: class.into(),
        }
    }
}
