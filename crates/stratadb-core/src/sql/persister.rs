use crate::{
    driver::Driver,
    error::PersistError,
    model::{
        ClassDescriptor, FieldMapping, InheritanceKind, JoinColumn, MetadataError,
        MetadataProvider,
    },
    obs::metrics,
    sql::{
        context::QueryContext,
        criteria::Criteria,
        filter::FilterRegistry,
        policy::{InheritancePolicy, NoInheritancePolicy},
        predicate::{CompareOp, ComparePredicate, Predicate},
        single_table::SingleTablePolicy,
    },
    value::Value,
};

/// Entity alias every result-set registration is keyed under.
pub(crate) const ENTITY_ALIAS: &str = "r";

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

///
/// SelectOptions
///
/// Ordering and row-window parameters for SELECT assembly. Field names in
/// `order_by` resolve through the target class; unmapped names pass through
/// as raw column names.
///

#[derive(Clone, Debug, Default)]
pub struct SelectOptions {
    pub order_by: Vec<(String, OrderDirection)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

///
/// Persister
///
/// Generic SQL generator for one target class. A pure translation layer:
/// (metadata + query parameters) → (SQL text + result mapping). Owns no
/// connection and performs no I/O; literal quoting and casing go through
/// the driver collaborator.
///
/// Inheritance-sensitive steps route through the composed policy; the
/// `base_*` methods are the generic building blocks policies extend.
///

pub struct Persister<'a> {
    class: &'a ClassDescriptor,
    metadata: &'a dyn MetadataProvider,
    driver: &'a dyn Driver,
    filters: &'a FilterRegistry,
    policy: Box<dyn InheritancePolicy>,
}

impl<'a> Persister<'a> {
    /// Compose a persister with the policy the descriptor's inheritance
    /// kind calls for.
    #[must_use]
    pub fn new(
        class: &'a ClassDescriptor,
        metadata: &'a dyn MetadataProvider,
        driver: &'a dyn Driver,
        filters: &'a FilterRegistry,
    ) -> Self {
        let policy: Box<dyn InheritancePolicy> = match class.inheritance {
            InheritanceKind::None => Box::new(NoInheritancePolicy),
            InheritanceKind::SingleTable => Box::new(SingleTablePolicy),
        };

        Self::with_policy(class, metadata, driver, filters, policy)
    }

    #[must_use]
    pub fn with_policy(
        class: &'a ClassDescriptor,
        metadata: &'a dyn MetadataProvider,
        driver: &'a dyn Driver,
        filters: &'a FilterRegistry,
        policy: Box<dyn InheritancePolicy>,
    ) -> Self {
        Self {
            class,
            metadata,
            driver,
            filters,
            policy,
        }
    }

    #[must_use]
    pub const fn class(&self) -> &'a ClassDescriptor {
        self.class
    }

    #[must_use]
    pub const fn metadata(&self) -> &'a dyn MetadataProvider {
        self.metadata
    }

    #[must_use]
    pub const fn driver(&self) -> &'a dyn Driver {
        self.driver
    }

    // ------------------------------------------------------------------
    // Policy surface
    // ------------------------------------------------------------------

    /// SELECT column list, cached in the context after the first build.
    pub fn select_columns(&self, ctx: &mut QueryContext) -> Result<String, PersistError> {
        if let Some(cached) = &ctx.select_column_list {
            metrics::record_select_cache_hit(&self.class.name);
            return Ok(cached.clone());
        }

        let list = self.policy.select_columns(self, ctx)?;
        ctx.select_column_list = Some(list.clone());
        metrics::record_select_build(&self.class.name);

        Ok(list)
    }

    pub fn insert_columns(&self) -> Result<Vec<String>, PersistError> {
        let columns = self.policy.insert_columns(self)?;
        metrics::record_insert_build(&self.class.name);

        Ok(columns)
    }

    pub fn table_alias(&self, ctx: &mut QueryContext, class_name: &str, assoc: &str) -> String {
        self.policy.table_alias(self, ctx, class_name, assoc)
    }

    pub fn select_condition(
        &self,
        ctx: &mut QueryContext,
        criteria: &Criteria,
    ) -> Result<String, PersistError> {
        let sql = self.policy.select_condition(self, ctx, criteria)?;
        metrics::record_condition_build(&self.class.name);

        Ok(sql)
    }

    pub fn predicate_condition(
        &self,
        ctx: &mut QueryContext,
        predicate: &Predicate,
    ) -> Result<String, PersistError> {
        let sql = self.policy.predicate_condition(self, ctx, predicate)?;
        metrics::record_condition_build(&self.class.name);

        Ok(sql)
    }

    pub fn filter_condition(
        &self,
        class: &ClassDescriptor,
        table_alias: &str,
    ) -> Result<Option<String>, PersistError> {
        let rendered = self.policy.filter_condition(self, class, table_alias)?;
        metrics::record_filter_render(&self.class.name);

        Ok(rendered)
    }

    // ------------------------------------------------------------------
    // Statement assembly
    // ------------------------------------------------------------------

    pub fn select_sql(
        &self,
        ctx: &mut QueryContext,
        criteria: &Criteria,
        options: &SelectOptions,
    ) -> Result<String, PersistError> {
        let columns = self.select_columns(ctx)?;
        let table_alias = self.table_alias(ctx, &self.class.name, "");
        let condition = self.select_condition(ctx, criteria)?;
        let filter = self.filter_condition(self.class, &table_alias)?;

        let table = &self.class.table;
        let mut sql = format!("SELECT {columns} FROM {table} {table_alias}");

        let mut where_parts = Vec::new();
        if !condition.is_empty() {
            where_parts.push(condition);
        }
        if let Some(filter) = filter {
            where_parts.push(filter);
        }
        if !where_parts.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_parts.join(" AND "));
        }

        if !options.order_by.is_empty() {
            let order = options
                .order_by
                .iter()
                .map(|(field, direction)| {
                    let column = self.class.column_of(field).unwrap_or(field);
                    format!("{table_alias}.{column} {}", direction.sql())
                })
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }

        self.driver.apply_limit(&mut sql, options.limit, options.offset);

        Ok(sql)
    }

    pub fn insert_sql(&self) -> Result<String, PersistError> {
        let columns = self.insert_columns()?;
        let table = &self.class.table;

        if columns.is_empty() {
            return Ok(self.driver.empty_insert_sql(table));
        }

        let column_list = columns.join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");

        Ok(format!(
            "INSERT INTO {table} ({column_list}) VALUES ({placeholders})"
        ))
    }

    pub fn update_sql(&self, fields: &[&str]) -> Result<String, PersistError> {
        let mut sets = Vec::with_capacity(fields.len());
        for &field in fields {
            let column = self.class.column_of(field).unwrap_or(field);
            sets.push(format!("{column} = ?"));
        }

        let table = &self.class.table;
        let set_list = sets.join(", ");
        let condition = self.identifier_condition()?;

        Ok(format!("UPDATE {table} SET {set_list} WHERE {condition}"))
    }

    pub fn delete_sql(&self) -> Result<String, PersistError> {
        let table = &self.class.table;
        let condition = self.identifier_condition()?;

        Ok(format!("DELETE FROM {table} WHERE {condition}"))
    }

    // WHERE fragment addressing one row by identifier columns. Rows in a
    // single table are identified by primary key alone; no discriminator.
    fn identifier_condition(&self) -> Result<String, PersistError> {
        let mut parts = Vec::with_capacity(self.class.identifier.len());
        for field in &self.class.identifier {
            let column = self
                .class
                .column_of(field)
                .ok_or_else(|| MetadataError::unknown_field(&self.class.name, field))?;
            parts.push(format!("{column} = ?"));
        }

        Ok(parts.join(" AND "))
    }

    // ------------------------------------------------------------------
    // Base building blocks
    // ------------------------------------------------------------------

    /// Column list contribution of the target class itself: its field
    /// mappings and the join columns of its owning to-one associations.
    pub fn base_select_columns(&self, ctx: &mut QueryContext) -> Result<String, PersistError> {
        let table_alias = self.table_alias(ctx, &self.class.name, "");
        let mut columns = Vec::new();

        for field in &self.class.fields {
            columns.push(self.select_column_sql(ctx, field, &table_alias, &self.class.name));
        }

        for assoc in &self.class.associations {
            if !assoc.carries_join_columns() {
                continue;
            }
            for join_column in &assoc.join_columns {
                columns.push(self.select_join_column_sql(ctx, &table_alias, join_column));
            }
        }

        Ok(columns.join(", "))
    }

    pub(crate) fn select_column_sql(
        &self,
        ctx: &mut QueryContext,
        field: &FieldMapping,
        table_alias: &str,
        class_name: &str,
    ) -> String {
        let result_alias = ctx.next_result_alias(&field.column, self.driver);
        ctx.rsm_mut()
            .add_field_result(ENTITY_ALIAS, &result_alias, &field.field, class_name);

        let column = &field.column;
        format!("{table_alias}.{column} AS {result_alias}")
    }

    pub(crate) fn select_join_column_sql(
        &self,
        ctx: &mut QueryContext,
        table_alias: &str,
        join_column: &JoinColumn,
    ) -> String {
        let result_alias = ctx.next_result_alias(&join_column.name, self.driver);
        ctx.rsm_mut().add_meta_result(
            ENTITY_ALIAS,
            &result_alias,
            &join_column.name,
            join_column.sql_type,
            false,
        );

        let column = &join_column.name;
        format!("{table_alias}.{column} AS {result_alias}")
    }

    /// Insert column contribution of the target class: every field column
    /// (a single-table row carries the whole class, inherited fields
    /// included), minus database-generated identifiers, plus owning to-one
    /// join columns.
    pub fn base_insert_columns(&self) -> Result<Vec<String>, PersistError> {
        let mut columns = Vec::new();

        for field in &self.class.fields {
            if self.class.identifier_generated && self.class.is_identifier(&field.field) {
                continue;
            }
            columns.push(field.column.clone());
        }

        for assoc in &self.class.associations {
            if !assoc.carries_join_columns() {
                continue;
            }
            for join_column in &assoc.join_columns {
                columns.push(join_column.name.clone());
            }
        }

        Ok(columns)
    }

    pub fn base_table_alias(
        &self,
        ctx: &mut QueryContext,
        class_name: &str,
        assoc: &str,
    ) -> String {
        ctx.table_alias(class_name, assoc)
    }

    pub fn base_select_condition(
        &self,
        ctx: &mut QueryContext,
        criteria: &Criteria,
    ) -> Result<String, PersistError> {
        let table_alias = self.table_alias(ctx, &self.class.name, "");
        let parts: Vec<String> = criteria
            .entries()
            .iter()
            .map(|(name, value)| self.comparison_sql(&table_alias, name, value))
            .collect();

        Ok(parts.join(" AND "))
    }

    fn comparison_sql(&self, table_alias: &str, name: &str, value: &Value) -> String {
        let column = self.class.column_of(name).unwrap_or(name);

        match value {
            Value::Null => format!("{table_alias}.{column} IS NULL"),
            Value::List(items) => {
                let placeholders = vec!["?"; items.len()].join(", ");
                format!("{table_alias}.{column} IN ({placeholders})")
            }
            _ => format!("{table_alias}.{column} = ?"),
        }
    }

    pub fn base_predicate_condition(
        &self,
        ctx: &mut QueryContext,
        predicate: &Predicate,
    ) -> Result<String, PersistError> {
        let table_alias = self.table_alias(ctx, &self.class.name, "");

        Ok(self.predicate_sql(&table_alias, predicate))
    }

    fn predicate_sql(&self, table_alias: &str, predicate: &Predicate) -> String {
        match predicate {
            Predicate::Compare(cmp) => self.compare_sql(table_alias, cmp),
            Predicate::And(children) => Self::group_sql(
                children.iter().map(|c| self.predicate_sql(table_alias, c)),
                " AND ",
            ),
            Predicate::Or(children) => Self::group_sql(
                children.iter().map(|c| self.predicate_sql(table_alias, c)),
                " OR ",
            ),
        }
    }

    fn group_sql(rendered: impl Iterator<Item = String>, joiner: &str) -> String {
        let mut parts: Vec<String> = rendered.filter(|part| !part.is_empty()).collect();

        match parts.len() {
            0 => String::new(),
            1 => parts.remove(0),
            _ => format!("({})", parts.join(joiner)),
        }
    }

    fn compare_sql(&self, table_alias: &str, cmp: &ComparePredicate) -> String {
        let column = self.class.column_of(&cmp.field).unwrap_or(&cmp.field);

        match (cmp.op, &cmp.value) {
            (CompareOp::Eq, Value::Null) => format!("{table_alias}.{column} IS NULL"),
            (CompareOp::Ne, Value::Null) => format!("{table_alias}.{column} IS NOT NULL"),
            (CompareOp::In | CompareOp::NotIn, value) => {
                let count = match value {
                    Value::List(items) => items.len(),
                    _ => 1,
                };
                let placeholders = vec!["?"; count].join(", ");
                let op = cmp.op.sql();
                format!("{table_alias}.{column} {op} ({placeholders})")
            }
            _ => {
                let op = cmp.op.sql();
                format!("{table_alias}.{column} {op} ?")
            }
        }
    }

    /// Render every registered filter's constraint for a class/alias pair,
    /// parenthesized and AND-joined; None when nothing applies.
    pub fn base_filter_condition(
        &self,
        class: &ClassDescriptor,
        table_alias: &str,
    ) -> Result<Option<String>, PersistError> {
        let mut parts = Vec::new();
        for (_, filter) in self.filters.iter() {
            if let Some(constraint) = filter.constraint(class, table_alias) {
                if !constraint.is_empty() {
                    parts.push(format!("({constraint})"));
                }
            }
        }

        if parts.is_empty() {
            Ok(None)
        } else {
            Ok(Some(parts.join(" AND ")))
        }
    }
}
