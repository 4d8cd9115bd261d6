use crate::model::ClassDescriptor;
use std::{collections::BTreeMap, fmt};

///
/// SqlFilter
///
/// Externally registered row filter. Returns a boolean SQL constraint for a
/// class/alias pair, or None when the filter does not apply to that class.
///

pub trait SqlFilter {
    fn constraint(&self, class: &ClassDescriptor, table_alias: &str) -> Option<String>;
}

///
/// FilterRegistry
///
/// Named filters applied to every query the persister renders. Iteration is
/// name-ordered so rendered conditions are deterministic.
///

#[derive(Default)]
pub struct FilterRegistry {
    filters: BTreeMap<String, Box<dyn SqlFilter>>,
}

impl FilterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, filter: Box<dyn SqlFilter>) {
        self.filters.insert(name.into(), filter);
    }

    /// Remove a filter by name; true when one was registered.
    pub fn remove(&mut self, name: &str) -> bool {
        self.filters.remove(name).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &dyn SqlFilter)> {
        self.filters
            .iter()
            .map(|(name, filter)| (name.as_str(), filter.as_ref()))
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.filters.keys()).finish()
    }
}
