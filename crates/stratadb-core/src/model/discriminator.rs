use crate::{model::field::SqlType, value::Value};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// DiscriminatorGeneration
///
/// Who supplies the discriminator value on writes.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum DiscriminatorGeneration {
    /// The application writes the value.
    #[default]
    None,
    /// The database supplies the value on INSERT.
    Insert,
    /// The database supplies the value on every write.
    Always,
}

impl DiscriminatorGeneration {
    /// True when the database or a trigger writes the value itself; the
    /// application must not include the column in INSERT column lists.
    #[must_use]
    pub const fn is_database_supplied(self) -> bool {
        matches!(self, Self::Insert | Self::Always)
    }
}

///
/// DiscriminatorColumn
///

#[derive(Clone, Debug, Serialize)]
pub struct DiscriminatorColumn {
    pub name: String,
    pub sql_type: SqlType,
    pub generation: DiscriminatorGeneration,
}

impl DiscriminatorColumn {
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            generation: DiscriminatorGeneration::None,
        }
    }

    #[must_use]
    pub const fn with_generation(mut self, generation: DiscriminatorGeneration) -> Self {
        self.generation = generation;
        self
    }
}

///
/// DiscriminatorMap
///
/// Bidirectional class ↔ value mapping. Both directions are built together
/// at construction time; neither is derived from the other afterwards.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct DiscriminatorMap {
    by_class: BTreeMap<String, Value>,

    // same entries, keyed the other way; not serialized (by_class carries
    // the full mapping and Value keys do not serialize as map keys)
    #[serde(skip)]
    by_value: BTreeMap<Value, String>,
}

impl DiscriminatorMap {
    #[must_use]
    pub fn new<C, I>(entries: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = (C, Value)>,
    {
        let mut by_class = BTreeMap::new();
        let mut by_value = BTreeMap::new();

        for (class, value) in entries {
            let class = class.into();
            by_value.insert(value.clone(), class.clone());
            by_class.insert(class, value);
        }

        Self { by_class, by_value }
    }

    /// Discriminator value declared for a class name.
    #[must_use]
    pub fn value_of(&self, class: &str) -> Option<&Value> {
        self.by_class.get(class)
    }

    /// Class name declared for a discriminator value.
    #[must_use]
    pub fn class_of(&self, value: &Value) -> Option<&str> {
        self.by_value.get(value).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> DiscriminatorMap {
        DiscriminatorMap::new([
            ("Vehicle", Value::Text("car".to_string())),
            ("Truck", Value::Text("truck".to_string())),
            ("Sentinel", Value::Int(0)),
        ])
    }

    #[test]
    fn both_directions_resolve() {
        let map = map();

        assert_eq!(
            map.value_of("Truck"),
            Some(&Value::Text("truck".to_string()))
        );
        assert_eq!(
            map.class_of(&Value::Text("truck".to_string())),
            Some("Truck")
        );
    }

    #[test]
    fn zero_is_a_declared_value() {
        let map = map();

        assert_eq!(map.value_of("Sentinel"), Some(&Value::Int(0)));
        assert_eq!(map.class_of(&Value::Int(0)), Some("Sentinel"));
    }

    #[test]
    fn unmapped_class_is_a_miss() {
        assert_eq!(map().value_of("Bus"), None);
    }
}
