use crate::value::Value;

///
/// Criteria
///
/// Ordered field/column → value pairs for plain equality filtering. Entries
/// are appended verbatim; the persister resolves field names to columns but
/// never interprets caller values.
///

#[derive(Clone, Debug, Default)]
pub struct Criteria {
    entries: Vec<(String, Value)>,
}

impl Criteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((field.into(), value.into()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Bind values in placeholder order. Null entries render IS NULL and
    /// therefore contribute no placeholder; list entries contribute one per
    /// element.
    #[must_use]
    pub fn params(&self) -> Vec<&Value> {
        let mut params = Vec::new();
        for (_, value) in &self.entries {
            match value {
                Value::Null => {}
                Value::List(items) => params.extend(items.iter()),
                other => params.push(other),
            }
        }

        params
    }
}
