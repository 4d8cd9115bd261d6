use crate::{
    error::PersistError,
    model::ClassDescriptor,
    sql::{context::QueryContext, criteria::Criteria, persister::Persister, predicate::Predicate},
};

///
/// InheritancePolicy
///
/// Strategy hooks for the steps of SQL generation that vary with the
/// inheritance mapping. The persister composes exactly one implementation,
/// chosen from the descriptor's inheritance kind. Hooks build on the
/// persister's `base_*` building blocks and may replace or extend them.
///

pub trait InheritancePolicy {
    /// SELECT column list for the target class.
    fn select_columns(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
    ) -> Result<String, PersistError>;

    /// Ordered column names written by an INSERT of the target class.
    fn insert_columns(&self, persister: &Persister<'_>) -> Result<Vec<String>, PersistError>;

    /// Table alias for a class name, with an optional association qualifier.
    fn table_alias(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        class_name: &str,
        assoc: &str,
    ) -> String;

    /// WHERE condition from flat criteria.
    fn select_condition(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        criteria: &Criteria,
    ) -> Result<String, PersistError>;

    /// WHERE condition from a structured predicate tree.
    fn predicate_condition(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        predicate: &Predicate,
    ) -> Result<String, PersistError>;

    /// Rendered constraints of registered row filters for a target class.
    fn filter_condition(
        &self,
        persister: &Persister<'_>,
        class: &ClassDescriptor,
        table_alias: &str,
    ) -> Result<Option<String>, PersistError>;
}

///
/// NoInheritancePolicy
///
/// Pass-through for classes outside any hierarchy; every hook delegates to
/// the persister's base building blocks unchanged.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoInheritancePolicy;

impl InheritancePolicy for NoInheritancePolicy {
    fn select_columns(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
    ) -> Result<String, PersistError> {
        persister.base_select_columns(ctx)
    }

    fn insert_columns(&self, persister: &Persister<'_>) -> Result<Vec<String>, PersistError> {
        persister.base_insert_columns()
    }

    fn table_alias(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        class_name: &str,
        assoc: &str,
    ) -> String {
        persister.base_table_alias(ctx, class_name, assoc)
    }

    fn select_condition(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        criteria: &Criteria,
    ) -> Result<String, PersistError> {
        persister.base_select_condition(ctx, criteria)
    }

    fn predicate_condition(
        &self,
        persister: &Persister<'_>,
        ctx: &mut QueryContext,
        predicate: &Predicate,
    ) -> Result<String, PersistError> {
        persister.base_predicate_condition(ctx, predicate)
    }

    fn filter_condition(
        &self,
        persister: &Persister<'_>,
        class: &ClassDescriptor,
        table_alias: &str,
    ) -> Result<Option<String>, PersistError> {
        persister.base_filter_condition(class, table_alias)
    }
}
