use crate::{
    error::PersistError,
    model::{ClassDescriptor, MetadataError},
    sql::{
        context::QueryContext,
        criteria::Criteria,
        persister::{ENTITY_ALIAS, Persister},
        policy::InheritancePolicy,
        predicate::Predicate,
    },
};

///
/// SingleTablePolicy
///
/// SQL generation for hierarchies stored in one physical table, told apart
/// by a discriminator column. A fetched row may belong to any class in the
/// hierarchy, so reads select every subclass's columns and every WHERE
/// condition carries a discriminator restriction.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SingleTablePolicy;

impl SingleTablePolicy {
    /// `alias.discriminator IN (...)` restricting rows to the target class
    /// and every registered subclass. Values are quoted through the driver.
    /// A declared value of zero is still a value; only an absent declaration
    /// is skipped.
    fn discriminator_condition(
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
    ) -> Result<String, PersistError> {
        let class = persister.class();
        let column = class
            .discriminator_column
            .as_ref()
            .ok_or_else(|| MetadataError::missing_discriminator_column(&class.name))?;

        let mut values: Vec<String> = Vec::new();

        if let Some(own) = &class.discriminator_value {
            values.push(persister.driver().quote_literal(own)?);
        }

        for subclass in &class.subclasses {
            let value = class
                .discriminator_map
                .value_of(subclass)
                .ok_or_else(|| MetadataError::missing_discriminator(subclass))?;
            let quoted = persister.driver().quote_literal(value)?;
            if !values.contains(&quoted) {
                values.push(quoted);
            }
        }

        let table_alias = persister.table_alias(ctx, &class.name, "");
        let column_name = &column.name;
        let list = values.join(", ");

        Ok(format!("{table_alias}.{column_name} IN ({list})"))
    }
}

impl InheritancePolicy for SingleTablePolicy {
    fn select_columns(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
    ) -> Result<String, PersistError> {
        let class = persister.class();
        let mut columns = vec![persister.base_select_columns(ctx)?];

        let root = persister.metadata().descriptor(&class.root_entity)?;
        let table_alias = persister.table_alias(ctx, &root.name, "");

        // discriminator column
        let discriminator = class
            .discriminator_column
            .as_ref()
            .ok_or_else(|| MetadataError::missing_discriminator_column(&class.name))?;
        let column_name = &discriminator.name;
        columns.push(format!("{table_alias}.{column_name}"));

        let result_name = persister.driver().result_casing(column_name);
        ctx.rsm_mut()
            .set_discriminator_column(ENTITY_ALIAS, &result_name);
        ctx.rsm_mut().add_meta_result(
            ENTITY_ALIAS,
            &result_name,
            column_name,
            discriminator.sql_type,
            false,
        );

        // subclass columns; the list is flattened, depth does not matter
        for subclass_name in &class.subclasses {
            let subclass = persister.metadata().descriptor(subclass_name)?;

            // regular columns
            for field in &subclass.fields {
                if field.inherited {
                    continue;
                }
                columns.push(persister.select_column_sql(ctx, field, &table_alias, subclass_name));
            }

            // foreign key columns
            for assoc in &subclass.associations {
                if !assoc.carries_join_columns() || assoc.inherited {
                    continue;
                }
                for join_column in &assoc.join_columns {
                    columns.push(persister.select_join_column_sql(ctx, &table_alias, join_column));
                }
            }
        }

        Ok(columns.join(", "))
    }

    fn insert_columns(&self, persister: &Persister<'_>) -> Result<Vec<String>, PersistError> {
        let class = persister.class();
        let mut columns = persister.base_insert_columns()?;

        let discriminator = class
            .discriminator_column
            .as_ref()
            .ok_or_else(|| MetadataError::missing_discriminator_column(&class.name))?;

        // under Insert/Always generation the database writes the value itself
        if !discriminator.generation.is_database_supplied() {
            columns.push(discriminator.name.clone());
        }

        Ok(columns)
    }

    fn table_alias(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        _class_name: &str,
        assoc: &str,
    ) -> String {
        // one physical table; every alias resolves against the root entity
        persister.base_table_alias(ctx, &persister.class().root_entity, assoc)
    }

    fn select_condition(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        criteria: &Criteria,
    ) -> Result<String, PersistError> {
        let mut sql = persister.base_select_condition(ctx, criteria)?;
        if !sql.is_empty() {
            sql.push_str(" AND ");
        }
        sql.push_str(&Self::discriminator_condition(persister, ctx)?);

        Ok(sql)
    }

    fn predicate_condition(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        predicate: &Predicate,
    ) -> Result<String, PersistError> {
        let mut sql = persister.base_predicate_condition(ctx, predicate)?;
        if !sql.is_empty() {
            sql.push_str(" AND ");
        }
        sql.push_str(&Self::discriminator_condition(persister, ctx)?);

        Ok(sql)
    }

    fn filter_condition(
        &self,
        persister: &Persister<'_>,
        class: &ClassDescriptor,
        table_alias: &str,
    ) -> Result<Option<String>, PersistError> {
        // filters apply to the whole table, and there is only one table;
        // target the root of the hierarchy
        let root = persister.metadata().descriptor(&class.root_entity)?;

        persister.base_filter_condition(root, table_alias)
    }
}
