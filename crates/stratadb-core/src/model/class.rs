use crate::{
    model::{
        association::AssociationMapping,
        discriminator::{DiscriminatorColumn, DiscriminatorMap},
        field::FieldMapping,
    },
    value::Value,
};
use serde::Serialize;

///
/// InheritanceKind
///
/// Mapping strategy the descriptor's hierarchy uses. Joined-table mapping is
/// a separate strategy outside this crate.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum InheritanceKind {
    #[default]
    None,
    SingleTable,
}

///
/// ClassDescriptor
///
/// One node in a mapped class hierarchy.
///
/// `table` is the physical table for this class. The mapping layer assigns
/// every member of a single-table hierarchy the root's table name, so the
/// persister reads it directly; only aliasing re-resolves against the root.
/// `subclasses` is flattened: it lists every transitive subclass, in
/// registration order, and the persister never recurses.
///

#[derive(Clone, Debug, Serialize)]
pub struct ClassDescriptor {
    pub name: String,
    pub root_entity: String,
    pub table: String,
    pub inheritance: InheritanceKind,

    pub discriminator_column: Option<DiscriminatorColumn>,
    pub discriminator_value: Option<Value>,
    pub discriminator_map: DiscriminatorMap,

    pub fields: Vec<FieldMapping>,
    pub associations: Vec<AssociationMapping>,

    pub identifier: Vec<String>,
    pub identifier_generated: bool,

    pub subclasses: Vec<String>,
}

impl ClassDescriptor {
    /// Descriptor for a class outside any hierarchy; it is its own root.
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        let name = name.into();

        Self {
            root_entity: name.clone(),
            name,
            table: table.into(),
            inheritance: InheritanceKind::None,
            discriminator_column: None,
            discriminator_value: None,
            discriminator_map: DiscriminatorMap::default(),
            fields: Vec::new(),
            associations: Vec::new(),
            identifier: Vec::new(),
            identifier_generated: false,
            subclasses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_root(mut self, root_entity: impl Into<String>) -> Self {
        self.root_entity = root_entity.into();
        self
    }

    #[must_use]
    pub const fn with_inheritance(mut self, inheritance: InheritanceKind) -> Self {
        self.inheritance = inheritance;
        self
    }

    #[must_use]
    pub fn with_discriminator(
        mut self,
        column: DiscriminatorColumn,
        value: Option<Value>,
        map: DiscriminatorMap,
    ) -> Self {
        self.discriminator_column = Some(column);
        self.discriminator_value = value;
        self.discriminator_map = map;
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_association(mut self, association: AssociationMapping) -> Self {
        self.associations.push(association);
        self
    }

    #[must_use]
    pub fn with_identifier(mut self, field: impl Into<String>) -> Self {
        self.identifier.push(field.into());
        self
    }

    #[must_use]
    pub const fn with_generated_identifier(mut self) -> Self {
        self.identifier_generated = true;
        self
    }

    #[must_use]
    pub fn with_subclass(mut self, name: impl Into<String>) -> Self {
        self.subclasses.push(name.into());
        self
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.name == self.root_entity
    }

    /// Resolve a field name to its column. Returns None for names that are
    /// not mapped fields (callers fall back to treating them as raw column
    /// names, e.g. meta columns in criteria).
    #[must_use]
    pub fn column_of(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.column.as_str())
    }

    /// True when the named field is part of the identifier.
    #[must_use]
    pub fn is_identifier(&self, field: &str) -> bool {
        self.identifier.iter().any(|id| id == field)
    }
}
