//! Property-based tests for write order, lookup ranges and enum lists

use proptest::prelude::*;
use tablecloth::{
    compile, CompileOptions, CompiledPackage, Directive, Field, FieldType, ListOrigin,
    ListSource, LookupRange, Package, Platform, Table, Value,
};

fn arb_platform() -> impl Strategy<Value = Platform> {
    prop_oneof![Just(Platform::Excel), Just(Platform::GoogleSheets)]
}

/// Tables `t0..tn`, each optionally referencing an earlier one, declared in
/// reverse order
fn arb_forest() -> impl Strategy<Value = Package> {
    prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 1..7).prop_map(
        |parents| {
            let mut package = Package::new();
            for (i, parent) in parents.iter().enumerate().rev() {
                let mut table = Table::new(format!("t{}", i))
                    .with_field(Field::new("id", FieldType::Integer).required().unique());
                if let Some(parent) = parent.filter(|_| i > 0) {
                    let target = format!("t{}", parent.index(i));
                    table = table
                        .with_field(Field::new("parent_id", FieldType::Integer))
                        .with_foreign_key(["parent_id"], Some(target.as_str()), ["id"]);
                }
                package = package.with_table(table);
            }
            package
        },
    )
}

fn arb_enum() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z ]{1,12}", 1..40)
}

fn foreign_key_lookup(compiled: &CompiledPackage, table: &str) -> Option<LookupRange> {
    compiled
        .column(table, "parent_id")?
        .checks
        .iter()
        .find_map(|check| match &check.directive {
            Directive::ListCheck {
                origin: ListOrigin::ForeignKey { .. },
                source: ListSource::Range(lookup),
            } => Some(lookup.clone()),
            _ => None,
        })
}

proptest! {
    /// Every referenced table is written before the tables referencing it
    #[test]
    fn prop_write_order_respects_references(package in arb_forest(), platform in arb_platform()) {
        let compiled = compile(&package, &CompileOptions::new(platform)).unwrap();
        prop_assert_eq!(compiled.order.len(), package.tables.len());

        let position = |name: &str| compiled.order.iter().position(|t| t == name);
        for table in &package.tables {
            for fk in &table.foreign_keys {
                let target = fk.reference.table_or(&table.name);
                prop_assert!(position(target) < position(&table.name));
            }
        }
    }

    /// A foreign key's lookup range is the referenced column's data range
    #[test]
    fn prop_foreign_key_lookup_matches_layout(package in arb_forest()) {
        let options = CompileOptions::default().with_data_rows(25);
        let compiled = compile(&package, &options).unwrap();

        for table in &package.tables {
            if let Some(fk) = table.foreign_keys.first() {
                let target = compiled.sheet(fk.reference.table_or(&table.name)).unwrap();
                prop_assert_eq!(foreign_key_lookup(&compiled, &table.name), target.layout.lookup("id"));
                prop_assert_eq!(compiled.lookups.get(&target.table, "id").cloned(), target.layout.lookup("id"));
            }
        }
    }

    /// Compiling twice gives the same result
    #[test]
    fn prop_compile_is_idempotent(package in arb_forest(), platform in arb_platform()) {
        let options = CompileOptions::new(platform);
        prop_assert_eq!(compile(&package, &options), compile(&package, &options));
    }

    /// The permissible values of an enum list are the declared values, in order
    #[test]
    fn prop_enum_values_are_preserved(values in arb_enum(), platform in arb_platform()) {
        let package = Package::new().with_table(
            Table::new("t").with_field(Field::new("kind", FieldType::String).enumeration(values.clone())),
        );
        let compiled = compile(&package, &CompileOptions::new(platform)).unwrap();

        let column = compiled.column("t", "kind").unwrap();
        let source = column
            .checks
            .iter()
            .find_map(|check| match &check.directive {
                Directive::ListCheck { origin: ListOrigin::Enum, source } => Some(source),
                _ => None,
            })
            .unwrap();
        let expected: Vec<Value> = values.into_iter().map(Value::from).collect();
        prop_assert_eq!(compiled.permissible_values(source), Some(expected));
    }
}
