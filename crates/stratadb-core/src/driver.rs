//! Dialect seam between SQL generation and the database driver.
//!
//! The persister owns no connection lifecycle; it calls through this trait
//! for literal quoting and result-alias casing and nothing else.

use crate::value::Value;
use thiserror::Error as ThisError;

///
/// DriverError
///
/// Quoting/escaping faults raised by a driver implementation. Propagated
/// unchanged through SQL generation; the persister never repairs them.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("driver fault: {message}")]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// Driver
///

pub trait Driver {
    /// Render a scalar literal, escaped for inline inclusion in SQL text.
    fn quote_literal(&self, value: &Value) -> Result<String, DriverError>;

    /// Normalize a result column alias to the platform's casing.
    fn result_casing(&self, name: &str) -> String {
        name.to_string()
    }

    /// Append row-window clauses to a rendered statement.
    fn apply_limit(&self, sql: &mut String, limit: Option<u64>, offset: Option<u64>) {
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }

    /// Statement used when an INSERT has no columns to write.
    fn empty_insert_sql(&self, table: &str) -> String {
        format!("INSERT INTO {table} DEFAULT VALUES")
    }
}

///
/// AnsiDriver
///
/// Reference driver: ANSI string quoting (doubled single quotes) and
/// lowercase result aliases. Real deployments substitute their own dialect.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct AnsiDriver;

impl Driver for AnsiDriver {
    fn quote_literal(&self, value: &Value) -> Result<String, DriverError> {
        match value {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(true) => Ok("TRUE".to_string()),
            Value::Bool(false) => Ok("FALSE".to_string()),
            Value::Int(v) => Ok(v.to_string()),
            Value::Uint(v) => Ok(v.to_string()),
            Value::Float(v) => Ok(v.to_string()),
            Value::Text(v) => Ok(format!("'{}'", v.replace('\'', "''"))),
            Value::List(_) => Err(DriverError::new("list is not a scalar literal")),
        }
    }

    fn result_casing(&self, name: &str) -> String {
        name.to_lowercase()
    }
}
