//! Canonical hierarchy fixtures shared by unit tests.

use crate::{
    driver::{Driver, DriverError},
    model::{
        AssociationMapping, ClassDescriptor, DiscriminatorColumn, DiscriminatorMap, FieldMapping,
        InheritanceKind, JoinColumn, MetadataError, MetadataProvider, MetadataRegistry, SqlType,
    },
    value::Value,
};
use std::cell::Cell;

fn vehicle_map() -> DiscriminatorMap {
    DiscriminatorMap::new([
        ("Vehicle", Value::Text("car".to_string())),
        ("Truck", Value::Text("truck".to_string())),
        ("Van", Value::Text("van".to_string())),
    ])
}

pub(crate) fn vehicle_class() -> ClassDescriptor {
    ClassDescriptor::new("Vehicle", "vehicles")
        .with_inheritance(InheritanceKind::SingleTable)
        .with_discriminator(
            DiscriminatorColumn::new("type", SqlType::Text),
            Some(Value::Text("car".to_string())),
            vehicle_map(),
        )
        .with_field(FieldMapping::new("id", "id", SqlType::BigInt))
        .with_field(FieldMapping::new("name", "name", SqlType::Text))
        .with_identifier("id")
        .with_generated_identifier()
        .with_subclass("Truck")
        .with_subclass("Van")
}

pub(crate) fn truck_class() -> ClassDescriptor {
    ClassDescriptor::new("Truck", "vehicles")
        .with_root("Vehicle")
        .with_inheritance(InheritanceKind::SingleTable)
        .with_discriminator(
            DiscriminatorColumn::new("type", SqlType::Text),
            Some(Value::Text("truck".to_string())),
            vehicle_map(),
        )
        .with_field(FieldMapping::new("id", "id", SqlType::BigInt).inherited())
        .with_field(FieldMapping::new("name", "name", SqlType::Text).inherited())
        .with_field(FieldMapping::new(
            "payload_capacity",
            "payload_capacity",
            SqlType::Integer,
        ))
        .with_identifier("id")
        .with_generated_identifier()
}

pub(crate) fn van_class() -> ClassDescriptor {
    ClassDescriptor::new("Van", "vehicles")
        .with_root("Vehicle")
        .with_inheritance(InheritanceKind::SingleTable)
        .with_discriminator(
            DiscriminatorColumn::new("type", SqlType::Text),
            Some(Value::Text("van".to_string())),
            vehicle_map(),
        )
        .with_field(FieldMapping::new("id", "id", SqlType::BigInt).inherited())
        .with_field(FieldMapping::new("name", "name", SqlType::Text).inherited())
        .with_association(AssociationMapping::to_one(
            "operator",
            "Person",
            vec![JoinColumn::new("operator_id", "id", SqlType::BigInt)],
        ))
        .with_identifier("id")
        .with_generated_identifier()
}

pub(crate) fn person_class() -> ClassDescriptor {
    ClassDescriptor::new("Person", "people")
        .with_field(FieldMapping::new("id", "id", SqlType::BigInt))
        .with_field(FieldMapping::new("full_name", "full_name", SqlType::Text))
        .with_identifier("id")
}

pub(crate) fn vehicle_registry() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    registry.register(vehicle_class());
    registry.register(truck_class());
    registry.register(van_class());
    registry.register(person_class());

    registry
}

///
/// CountingProvider
///
/// Wraps a registry and counts descriptor lookups so tests can observe
/// recomputation (or the absence of it).
///

pub(crate) struct CountingProvider {
    inner: MetadataRegistry,
    lookups: Cell<usize>,
}

impl CountingProvider {
    pub(crate) const fn new(inner: MetadataRegistry) -> Self {
        Self {
            inner,
            lookups: Cell::new(0),
        }
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl MetadataProvider for CountingProvider {
    fn descriptor(&self, name: &str) -> Result<&ClassDescriptor, MetadataError> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.descriptor(name)
    }
}

///
/// FailingDriver
///
/// Driver whose quoting always faults; used to assert propagation.
///

pub(crate) struct FailingDriver;

impl Driver for FailingDriver {
    fn quote_literal(&self, _value: &Value) -> Result<String, DriverError> {
        Err(DriverError::new("quoting unavailable"))
    }
}
