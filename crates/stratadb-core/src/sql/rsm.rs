use crate::model::SqlType;
use serde::Serialize;

///
/// ResultSetMapping
///
/// Row-reconstruction metadata accumulated while the column list is built.
/// The row mapper reads the discriminator registration to decide which
/// concrete class a row is, and the meta results to resolve foreign keys.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ResultSetMapping {
    discriminator: Option<DiscriminatorResult>,
    fields: Vec<FieldResult>,
    meta: Vec<MetaResult>,
}

///
/// DiscriminatorResult
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DiscriminatorResult {
    pub entity_alias: String,
    pub result_name: String,
}

///
/// FieldResult
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldResult {
    pub entity_alias: String,
    pub result_name: String,
    pub field: String,
    pub class: String,
}

///
/// MetaResult
///
/// Non-entity column needed for object reconstruction: the discriminator
/// itself, or a foreign-key column.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MetaResult {
    pub entity_alias: String,
    pub result_name: String,
    pub column: String,
    pub sql_type: SqlType,
    pub is_identifier: bool,
}

impl ResultSetMapping {
    pub fn set_discriminator_column(
        &mut self,
        entity_alias: impl Into<String>,
        result_name: impl Into<String>,
    ) {
        self.discriminator = Some(DiscriminatorResult {
            entity_alias: entity_alias.into(),
            result_name: result_name.into(),
        });
    }

    pub fn add_field_result(
        &mut self,
        entity_alias: impl Into<String>,
        result_name: impl Into<String>,
        field: impl Into<String>,
        class: impl Into<String>,
    ) {
        self.fields.push(FieldResult {
            entity_alias: entity_alias.into(),
            result_name: result_name.into(),
            field: field.into(),
            class: class.into(),
        });
    }

    pub fn add_meta_result(
        &mut self,
        entity_alias: impl Into<String>,
        result_name: impl Into<String>,
        column: impl Into<String>,
        sql_type: SqlType,
        is_identifier: bool,
    ) {
        self.meta.push(MetaResult {
            entity_alias: entity_alias.into(),
            result_name: result_name.into(),
            column: column.into(),
            sql_type,
            is_identifier,
        });
    }

    #[must_use]
    pub const fn discriminator(&self) -> Option<&DiscriminatorResult> {
        self.discriminator.as_ref()
    }

    #[must_use]
    pub fn field_results(&self) -> &[FieldResult] {
        &self.fields
    }

    #[must_use]
    pub fn meta_results(&self) -> &[MetaResult] {
        &self.meta
    }
}
