use derive_more::Display;
use serde::Serialize;

///
/// SqlType
///
/// Lossy projection of column types; only what result mapping and meta
/// columns need, not a full type system.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum SqlType {
    Boolean,
    Integer,
    BigInt,
    Double,
    Text,
    Bytes,
}

///
/// FieldMapping
///
/// One scalar field → column mapping. `inherited` marks entries copied down
/// from a superclass; they are listed on the subclass but contributed to
/// column lists only once, by the class that declares them.
///

#[derive(Clone, Debug, Serialize)]
pub struct FieldMapping {
    pub field: String,
    pub column: String,
    pub sql_type: SqlType,
    pub inherited: bool,
}

impl FieldMapping {
    #[must_use]
    pub fn new(field: impl Into<String>, column: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
            sql_type,
            inherited: false,
        }
    }

    /// Mark the mapping as inherited from a superclass.
    #[must_use]
    pub const fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }
}
