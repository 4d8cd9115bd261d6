use crate::{
    driver::AnsiDriver,
    error::PersistError,
    model::{
        ClassDescriptor, DiscriminatorColumn, DiscriminatorGeneration, DiscriminatorMap,
        FieldMapping, InheritanceKind, MetadataError, MetadataRegistry, SqlType,
    },
    obs::metrics_report,
    sql::{
        Criteria, FilterRegistry, OrderDirection, Persister, QueryContext, SelectOptions,
        SqlFilter,
        predicate::{ComparePredicate, Predicate},
    },
    test_fixtures::{
        CountingProvider, FailingDriver, person_class, truck_class, vehicle_class,
        vehicle_registry,
    },
    value::Value,
};

const VEHICLE_COLUMNS: &str = "t0.id AS id0, t0.name AS name1, t0.type, \
     t0.payload_capacity AS payload_capacity2, t0.operator_id AS operator_id3";

fn measure_class() -> ClassDescriptor {
    let map = DiscriminatorMap::new([
        ("Measure", Value::Int(0)),
        ("Pressure", Value::Int(1)),
    ]);

    ClassDescriptor::new("Measure", "measures")
        .with_inheritance(InheritanceKind::SingleTable)
        .with_discriminator(
            DiscriminatorColumn::new("kind", SqlType::Integer),
            Some(Value::Int(0)),
            map,
        )
        .with_field(FieldMapping::new("id", "id", SqlType::BigInt))
        .with_identifier("id")
        .with_subclass("Pressure")
}

// ------------------------------------------------------------------
// Column lists
// ------------------------------------------------------------------

#[test]
fn select_columns_cover_base_discriminator_and_all_subclasses() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let columns = persister
        .select_columns(&mut ctx)
        .expect("column list should build");

    assert_eq!(columns, VEHICLE_COLUMNS);
    assert_eq!(columns.matches("t0.type").count(), 1);
}

#[test]
fn select_columns_skip_inherited_subclass_fields() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let columns = persister
        .select_columns(&mut ctx)
        .expect("column list should build");

    // id and name appear once, from the base contribution only
    assert_eq!(columns.matches("t0.id AS").count(), 1);
    assert_eq!(columns.matches("t0.name AS").count(), 1);
}

#[test]
fn select_columns_register_result_mapping() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    persister
        .select_columns(&mut ctx)
        .expect("column list should build");

    let rsm = ctx.rsm();
    let discriminator = rsm
        .discriminator()
        .expect("discriminator column should be registered");
    assert_eq!(discriminator.entity_alias, "r");
    assert_eq!(discriminator.result_name, "type");

    let fields: Vec<(&str, &str)> = rsm
        .field_results()
        .iter()
        .map(|f| (f.field.as_str(), f.class.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("id", "Vehicle"),
            ("name", "Vehicle"),
            ("payload_capacity", "Truck")
        ]
    );

    let meta: Vec<&str> = rsm.meta_results().iter().map(|m| m.column.as_str()).collect();
    assert_eq!(meta, vec!["type", "operator_id"]);
}

#[test]
fn result_mapping_serializes_for_inspection() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    persister
        .select_columns(&mut ctx)
        .expect("column list should build");

    let json = serde_json::to_value(ctx.rsm()).expect("result mapping should serialize");
    assert_eq!(json["discriminator"]["result_name"], "type");
    assert_eq!(json["meta"][1]["column"], "operator_id");
}

#[test]
fn select_columns_are_cached_per_context() {
    let provider = CountingProvider::new(vehicle_registry());
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &provider, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let first = persister
        .select_columns(&mut ctx)
        .expect("column list should build");
    let lookups_after_first = provider.lookups();

    let second = persister
        .select_columns(&mut ctx)
        .expect("cached column list should return");

    assert_eq!(first, second);
    assert_eq!(provider.lookups(), lookups_after_first);

    // a fresh context is the invalidation point
    let mut fresh = QueryContext::new();
    persister
        .select_columns(&mut fresh)
        .expect("column list should rebuild");
    assert_eq!(provider.lookups(), lookups_after_first * 2);
}

#[test]
fn select_cache_activity_is_counted() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let before = metrics_report();
    persister
        .select_columns(&mut ctx)
        .expect("column list should build");
    persister
        .select_columns(&mut ctx)
        .expect("cached column list should return");
    let after = metrics_report();

    assert_eq!(
        after.ops.select_list_builds - before.ops.select_list_builds,
        1
    );
    assert_eq!(
        after.ops.select_list_cache_hits - before.ops.select_list_cache_hits,
        1
    );
}

// ------------------------------------------------------------------
// Discriminator conditions
// ------------------------------------------------------------------

#[test]
fn discriminator_condition_covers_class_and_subclasses() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let sql = persister
        .select_condition(&mut ctx, &Criteria::new())
        .expect("condition should build");

    assert_eq!(sql, "t0.type IN ('car', 'truck', 'van')");
}

#[test]
fn leaf_class_condition_has_only_its_own_value() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = truck_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let sql = persister
        .select_condition(&mut ctx, &Criteria::new())
        .expect("condition should build");

    assert_eq!(sql, "t0.type IN ('truck')");
}

#[test]
fn criteria_condition_is_joined_before_the_discriminator() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let criteria = Criteria::new().with("name", "hauler");
    let sql = persister
        .select_condition(&mut ctx, &criteria)
        .expect("condition should build");

    assert_eq!(sql, "t0.name = ? AND t0.type IN ('car', 'truck', 'van')");
}

#[test]
fn zero_discriminator_value_is_not_dropped() {
    let registry = MetadataRegistry::new();
    let filters = FilterRegistry::new();
    let class = measure_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let sql = persister
        .select_condition(&mut ctx, &Criteria::new())
        .expect("condition should build");

    assert_eq!(sql, "t0.kind IN (0, 1)");
}

#[test]
fn duplicate_discriminator_values_render_once() {
    let map = DiscriminatorMap::new([
        ("Shape", Value::Text("poly".to_string())),
        ("Square", Value::Text("poly".to_string())),
    ]);
    let class = ClassDescriptor::new("Shape", "shapes")
        .with_inheritance(InheritanceKind::SingleTable)
        .with_discriminator(
            DiscriminatorColumn::new("kind", SqlType::Text),
            Some(Value::Text("poly".to_string())),
            map,
        )
        .with_field(FieldMapping::new("id", "id", SqlType::BigInt))
        .with_identifier("id")
        .with_subclass("Square");

    let registry = MetadataRegistry::new();
    let filters = FilterRegistry::new();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let sql = persister
        .select_condition(&mut ctx, &Criteria::new())
        .expect("condition should build");

    assert_eq!(sql, "t0.kind IN ('poly')");
}

#[test]
fn predicate_condition_also_carries_the_discriminator() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let predicate = Predicate::from(ComparePredicate::eq("name", "hauler"))
        & Predicate::from(ComparePredicate::in_(
            "payload_capacity",
            vec![Value::Int(1), Value::Int(2)],
        ));
    let sql = persister
        .predicate_condition(&mut ctx, &predicate)
        .expect("condition should build");

    assert_eq!(
        sql,
        "(t0.name = ? AND t0.payload_capacity IN (?, ?)) \
         AND t0.type IN ('car', 'truck', 'van')"
    );
    assert_eq!(
        predicate.params(),
        vec![
            &Value::Text("hauler".to_string()),
            &Value::Int(1),
            &Value::Int(2)
        ]
    );
}

#[test]
fn subclass_missing_from_the_map_is_a_fault() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class().with_subclass("Bus");
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let err = persister
        .select_condition(&mut ctx, &Criteria::new())
        .expect_err("unmapped subclass must fault");

    assert_eq!(
        err,
        PersistError::Metadata(MetadataError::MissingDiscriminator {
            class: "Bus".to_string()
        })
    );
}

#[test]
fn classes_outside_a_hierarchy_get_no_discriminator_restriction() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = person_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let condition = persister
        .select_condition(&mut ctx, &Criteria::new().with("full_name", "Ada"))
        .expect("condition should build");
    assert_eq!(condition, "t0.full_name = ?");

    let columns = persister
        .select_columns(&mut ctx)
        .expect("column list should build");
    assert_eq!(columns, "t0.id AS id0, t0.full_name AS full_name1");
    assert!(ctx.rsm().discriminator().is_none());
}

#[test]
fn driver_quoting_faults_propagate_unchanged() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &FailingDriver, &filters);
    let mut ctx = QueryContext::new();

    let err = persister
        .select_condition(&mut ctx, &Criteria::new())
        .expect_err("driver fault must propagate");

    assert!(matches!(err, PersistError::Driver(_)));
}

// ------------------------------------------------------------------
// Insert column lists
// ------------------------------------------------------------------

#[test]
fn insert_columns_carry_the_discriminator_when_application_written() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);

    let columns = persister
        .insert_columns()
        .expect("insert columns should build");

    assert_eq!(columns, vec!["name".to_string(), "type".to_string()]);
}

#[test]
fn database_supplied_discriminator_is_excluded_from_inserts() {
    for generation in [DiscriminatorGeneration::Insert, DiscriminatorGeneration::Always] {
        let registry = vehicle_registry();
        let filters = FilterRegistry::new();
        let mut class = vehicle_class();
        class.discriminator_column =
            Some(DiscriminatorColumn::new("type", SqlType::Text).with_generation(generation));
        let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);

        let columns = persister
            .insert_columns()
            .expect("insert columns should build");

        assert_eq!(columns, vec!["name".to_string()]);
    }
}

#[test]
fn insert_columns_target_only_the_persisted_class() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = truck_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);

    let columns = persister
        .insert_columns()
        .expect("insert columns should build");

    // the row carries the whole class, inherited fields included, but no
    // sibling subclass columns
    assert_eq!(
        columns,
        vec![
            "name".to_string(),
            "payload_capacity".to_string(),
            "type".to_string()
        ]
    );
}

// ------------------------------------------------------------------
// Aliasing
// ------------------------------------------------------------------

#[test]
fn every_hierarchy_member_aliases_to_the_root() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = truck_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let for_truck = persister.table_alias(&mut ctx, "Truck", "");
    let for_root = persister.table_alias(&mut ctx, "Vehicle", "");

    assert_eq!(for_truck, for_root);
    assert_eq!(for_truck, "t0");
}

#[test]
fn association_qualifier_passes_through_alias_resolution() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = truck_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let bare = persister.table_alias(&mut ctx, "Truck", "");
    let qualified = persister.table_alias(&mut ctx, "Truck", "owner");
    let qualified_again = persister.table_alias(&mut ctx, "Vehicle", "owner");

    assert_ne!(bare, qualified);
    assert_eq!(qualified, qualified_again);
}

// ------------------------------------------------------------------
// Filters
// ------------------------------------------------------------------

struct ScopeFilter;

impl SqlFilter for ScopeFilter {
    fn constraint(&self, class: &ClassDescriptor, table_alias: &str) -> Option<String> {
        let scope = class.name.to_lowercase();
        Some(format!("{table_alias}.{scope}_scope = 1"))
    }
}

struct InertFilter;

impl SqlFilter for InertFilter {
    fn constraint(&self, _class: &ClassDescriptor, _table_alias: &str) -> Option<String> {
        None
    }
}

#[test]
fn filters_target_the_root_of_the_hierarchy() {
    let registry = vehicle_registry();
    let mut filters = FilterRegistry::new();
    filters.register("scope", Box::new(ScopeFilter));

    let truck = truck_class();
    let truck_persister = Persister::new(&truck, &registry, &AnsiDriver, &filters);
    let for_truck = truck_persister
        .filter_condition(&truck, "t0")
        .expect("filter should render");

    let vehicle = vehicle_class();
    let vehicle_persister = Persister::new(&vehicle, &registry, &AnsiDriver, &filters);
    let for_vehicle = vehicle_persister
        .filter_condition(&vehicle, "t0")
        .expect("filter should render");

    assert_eq!(for_truck, for_vehicle);
    assert_eq!(for_truck, Some("(t0.vehicle_scope = 1)".to_string()));
}

#[test]
fn non_applicable_filters_contribute_nothing() {
    let registry = vehicle_registry();
    let mut filters = FilterRegistry::new();
    filters.register("inert", Box::new(InertFilter));

    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let rendered = persister
        .filter_condition(&class, "t0")
        .expect("filter should render");

    assert_eq!(rendered, None);
}

// ------------------------------------------------------------------
// Statement assembly
// ------------------------------------------------------------------

#[test]
fn select_sql_assembles_columns_conditions_and_ordering() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = vehicle_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
    let mut ctx = QueryContext::new();

    let criteria = Criteria::new().with("name", "hauler");
    let options = SelectOptions::new()
        .order_by("name", OrderDirection::Asc)
        .with_limit(10);
    let sql = persister
        .select_sql(&mut ctx, &criteria, &options)
        .expect("select should assemble");

    assert_eq!(
        sql,
        format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles t0 \
             WHERE t0.name = ? AND t0.type IN ('car', 'truck', 'van') \
             ORDER BY t0.name ASC LIMIT 10"
        )
    );
}

#[test]
fn insert_sql_renders_placeholders_per_column() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = truck_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);

    let sql = persister.insert_sql().expect("insert should assemble");

    assert_eq!(
        sql,
        "INSERT INTO vehicles (name, payload_capacity, type) VALUES (?, ?, ?)"
    );
}

#[test]
fn empty_insert_falls_back_to_the_driver_form() {
    let registry = MetadataRegistry::new();
    let filters = FilterRegistry::new();
    let class = ClassDescriptor::new("Marker", "markers")
        .with_field(FieldMapping::new("id", "id", SqlType::BigInt))
        .with_identifier("id")
        .with_generated_identifier();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);

    let sql = persister.insert_sql().expect("insert should assemble");

    assert_eq!(sql, "INSERT INTO markers DEFAULT VALUES");
}

#[test]
fn update_and_delete_address_rows_by_identifier() {
    let registry = vehicle_registry();
    let filters = FilterRegistry::new();
    let class = truck_class();
    let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);

    let update = persister
        .update_sql(&["payload_capacity"])
        .expect("update should assemble");
    let delete = persister.delete_sql().expect("delete should assemble");

    assert_eq!(update, "UPDATE vehicles SET payload_capacity = ? WHERE id = ?");
    assert_eq!(delete, "DELETE FROM vehicles WHERE id = ?");
}

#[test]
fn criteria_params_follow_placeholder_order() {
    let criteria = Criteria::new()
        .with("name", "hauler")
        .with("retired", Value::Null)
        .with(
            "payload_capacity",
            Value::List(vec![Value::Int(1), Value::Int(2)]),
        );

    assert_eq!(
        criteria.params(),
        vec![
            &Value::Text("hauler".to_string()),
            &Value::Int(1),
            &Value::Int(2)
        ]
    );
}

// ------------------------------------------------------------------
// Properties
// ------------------------------------------------------------------

mod property {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    proptest! {
        #[test]
        fn discriminator_in_list_never_contains_duplicates(
            values in prop::collection::vec(0_i64..4, 1..8)
        ) {
            let mut entries = vec![("Shape".to_string(), Value::Int(9))];
            let mut class = ClassDescriptor::new("Shape", "shapes")
                .with_inheritance(InheritanceKind::SingleTable)
                .with_field(FieldMapping::new("id", "id", SqlType::BigInt))
                .with_identifier("id");

            for (i, value) in values.iter().enumerate() {
                let name = format!("Shape{i}");
                entries.push((name.clone(), Value::Int(*value)));
                class = class.with_subclass(name);
            }

            let class = class.with_discriminator(
                DiscriminatorColumn::new("kind", SqlType::Integer),
                Some(Value::Int(9)),
                DiscriminatorMap::new(entries),
            );

            let registry = MetadataRegistry::new();
            let filters = FilterRegistry::new();
            let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
            let mut ctx = QueryContext::new();

            let sql = persister
                .select_condition(&mut ctx, &Criteria::new())
                .expect("condition should build");
            let list = sql
                .strip_prefix("t0.kind IN (")
                .and_then(|rest| rest.strip_suffix(')'))
                .expect("condition should be an IN list");

            let items: Vec<&str> = list.split(", ").collect();
            let unique: BTreeSet<&str> = items.iter().copied().collect();
            prop_assert_eq!(items.len(), unique.len());
        }

        #[test]
        fn table_alias_is_stable_within_a_context(calls in 1_usize..6) {
            let registry = vehicle_registry();
            let filters = FilterRegistry::new();
            let class = truck_class();
            let persister = Persister::new(&class, &registry, &AnsiDriver, &filters);
            let mut ctx = QueryContext::new();

            let first = persister.table_alias(&mut ctx, "Truck", "");
            for _ in 0..calls {
                let next = persister.table_alias(&mut ctx, "Vehicle", "");
                prop_assert_eq!(&next, &first);
            }
        }
    }
}
