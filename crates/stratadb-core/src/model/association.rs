use crate::model::field::SqlType;
use serde::Serialize;

///
/// AssociationKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum AssociationKind {
    ToOne,
    ToMany,
}

///
/// JoinColumn
///
/// Foreign-key column held by the owning side of a to-one association. The
/// referenced column's type is carried here so select rendering never has to
/// chase the target descriptor.
///

#[derive(Clone, Debug, Serialize)]
pub struct JoinColumn {
    pub name: String,
    pub referenced_column: String,
    pub sql_type: SqlType,
}

impl JoinColumn {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        referenced_column: impl Into<String>,
        sql_type: SqlType,
    ) -> Self {
        Self {
            name: name.into(),
            referenced_column: referenced_column.into(),
            sql_type,
        }
    }
}

///
/// AssociationMapping
///

#[derive(Clone, Debug, Serialize)]
pub struct AssociationMapping {
    pub name: String,
    pub kind: AssociationKind,
    pub owning_side: bool,
    pub inherited: bool,
    pub target_class: String,
    pub join_columns: Vec<JoinColumn>,
}

impl AssociationMapping {
    /// Owning-side to-one association with its foreign-key columns.
    #[must_use]
    pub fn to_one(
        name: impl Into<String>,
        target_class: impl Into<String>,
        join_columns: Vec<JoinColumn>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::ToOne,
            owning_side: true,
            inherited: false,
            target_class: target_class.into(),
            join_columns,
        }
    }

    /// Inverse-side or to-many association; carries no local columns.
    #[must_use]
    pub fn to_many(name: impl Into<String>, target_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AssociationKind::ToMany,
            owning_side: false,
            inherited: false,
            target_class: target_class.into(),
            join_columns: Vec::new(),
        }
    }

    /// Mark the mapping as inherited from a superclass.
    #[must_use]
    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    /// Mark the mapping as the inverse side.
    #[must_use]
    pub fn inverse(mut self) -> Self {
        self.owning_side = false;
        self
    }

    /// True when the association holds foreign-key columns in this table.
    #[must_use]
    pub fn carries_join_columns(&self) -> bool {
        self.owning_side && self.kind == AssociationKind::ToOne
    }
}
