//! Reference resolver
//!
//! Checks the package as a whole, resolves every foreign key to the column it
//! references, pools enum lists on the hidden enum sheet and computes the
//! order tables must be written in.
//!
//! Lookup ranges of table columns depend on the final layout, so they are
//! published to the [`LookupRegistry`] table by table, in write order, as each
//! table is laid out.

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};
use tablecloth_core::{
    CapabilityProfile, ConstraintKind, Error, Field, FieldType, LookupRange, NativeKind,
    Package, Realization, Result, RowSpan, Table, Value,
};

use crate::graph::DependencyGraph;
use crate::layout::TableLayout;
use crate::options::CompileOptions;
use crate::package::CompileWarning;

/// A column referenced by a foreign key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignLink {
    /// Referenced table
    pub table: String,
    /// Referenced field
    pub field: String,
}

/// Hidden sheet holding enum lists, one list per column
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSheet {
    /// Sheet name
    pub name: String,
    /// Lists, by column
    pub columns: Vec<Vec<Value>>,
}

impl EnumSheet {
    /// Values of a column
    pub fn values(&self, column: u16) -> Option<&[Value]> {
        self.columns.get(column as usize).map(Vec::as_slice)
    }

    /// Lookup range of a column (values start on the first row)
    pub fn lookup(&self, column: u16) -> Option<LookupRange> {
        self.values(column).map(|values| {
            LookupRange::new(
                self.name.clone(),
                column,
                RowSpan::new(0, values.len() as u32),
            )
        })
    }
}

/// Key for enum list lookup
///
/// Lists are equal when their field types and formula texts are, so `1` and
/// `1.0` stay in separate columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ListKey(FieldType, Vec<String>);

impl ListKey {
    fn new(field_type: FieldType, values: &[Value]) -> Self {
        ListKey(field_type, values.iter().map(Value::to_formula).collect())
    }
}

/// Enum list pool for deduplication
///
/// Fields declaring the same list share one column of the enum sheet.
/// Columns are assigned in first-use order.
#[derive(Debug, Default)]
struct EnumPool {
    lists: Vec<Vec<Value>>,
    index_map: AHashMap<ListKey, u16>,
}

impl EnumPool {
    /// Get or add a list, returning its column
    fn get_or_insert(&mut self, field_type: FieldType, values: &[Value]) -> u16 {
        let key = ListKey::new(field_type, values);
        if let Some(&col) = self.index_map.get(&key) {
            return col;
        }
        let col = self.lists.len() as u16;
        self.index_map.insert(key, col);
        self.lists.push(values.to_vec());
        col
    }

    fn len(&self) -> usize {
        self.lists.len()
    }

    fn into_sheet(self, name: &str) -> Option<EnumSheet> {
        (!self.lists.is_empty()).then(|| EnumSheet {
            name: name.to_string(),
            columns: self.lists,
        })
    }
}

/// Lookup ranges of table columns
///
/// Each table's ranges are published once, when the table is laid out, and
/// read by the tables compiled after it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupRegistry {
    tables: BTreeMap<String, BTreeMap<String, LookupRange>>,
}

impl LookupRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the column ranges of a laid-out table
    ///
    /// Returns `false`, leaving the registry unchanged, if the table was
    /// already published.
    pub fn publish(&mut self, layout: &TableLayout) -> bool {
        if self.tables.contains_key(&layout.table) {
            return false;
        }
        let ranges = layout
            .columns
            .iter()
            .map(|c| {
                (
                    c.field.clone(),
                    LookupRange::new(layout.sheet.clone(), c.index, layout.data_rows),
                )
            })
            .collect();
        self.tables.insert(layout.table.clone(), ranges);
        true
    }

    /// Check if a table has been published
    pub fn is_published(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Get the lookup range of a column
    pub fn get(&self, table: &str, field: &str) -> Option<&LookupRange> {
        self.tables.get(table).and_then(|fields| fields.get(field))
    }

    /// Iterate over all (table, field, range) entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &LookupRange)> {
        self.tables.iter().flat_map(|(table, fields)| {
            fields
                .iter()
                .map(move |(field, range)| (table.as_str(), field.as_str(), range))
        })
    }
}

/// Resolved references of one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableResolution {
    /// Foreign key targets, by field (unique, in declaration order)
    pub links: Vec<Vec<ForeignLink>>,
    /// Enum sheet column, by field, for enums not written inline
    pub enum_columns: Vec<Option<u16>>,
}

/// Output of the resolver
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Table indices, in write order
    pub order: Vec<usize>,
    /// Resolved references, by table index
    pub tables: Vec<TableResolution>,
    /// Hidden enum sheet, if any enum needs one
    pub enum_sheet: Option<EnumSheet>,
    /// Non-fatal problems
    pub warnings: Vec<CompileWarning>,
}

/// Check whether a list can be written inline in a data-validation rule
pub fn fits_inline(values: &[Value], profile: &CapabilityProfile) -> bool {
    let texts: Vec<String> = values.iter().map(ToString::to_string).collect();
    if texts.iter().any(|t| t.contains(',')) {
        return false;
    }
    let len = texts.iter().map(String::len).sum::<usize>() + texts.len().saturating_sub(1);
    profile.max_inline_list_len.map_or(true, |max| len <= max)
}

/// Resolves references across a package
#[derive(Debug)]
pub struct Resolver<'a> {
    package: &'a Package,
    options: &'a CompileOptions,
    profile: &'static CapabilityProfile,
}

impl<'a> Resolver<'a> {
    /// Create a resolver
    pub fn new(package: &'a Package, options: &'a CompileOptions) -> Self {
        Self {
            package,
            options,
            profile: options.profile(),
        }
    }

    /// Check the package and resolve its references
    pub fn resolve(&self) -> Result<Resolution> {
        self.options.check_rows()?;
        self.check_tables()?;

        let mut graph = DependencyGraph::new(self.package.tables.iter().map(|t| t.name.as_str()));
        let mut pool = EnumPool::default();
        let mut warnings = Vec::new();
        let mut tables = Vec::with_capacity(self.package.tables.len());

        for (index, table) in self.package.tables.iter().enumerate() {
            let links = self.resolve_foreign_keys(index, table, &mut graph)?;

            let mut enum_columns = Vec::with_capacity(table.fields.len());
            for field in &table.fields {
                self.check_constraints(table, field)?;
                let column = match &field.constraints.enumeration {
                    Some(values) => {
                        if let Some(warning) = formula_like(table, field, values) {
                            tracing::warn!("{}", warning);
                            warnings.push(warning);
                        }
                        self.needs_enum_sheet(field, values)
                            .then(|| pool.get_or_insert(field.field_type, values))
                    }
                    None => None,
                };
                enum_columns.push(column);
            }

            tables.push(TableResolution {
                links,
                enum_columns,
            });
        }

        if pool.len() > self.profile.max_cols as usize {
            return Err(Error::TooManyColumns {
                table: self.options.enum_sheet.clone(),
                needed: pool.len() as u32,
                max: self.profile.max_cols,
            });
        }

        let order = graph.write_order()?;
        tracing::debug!(
            "Write order: {}",
            order
                .iter()
                .map(|&i| self.package.tables[i].name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Resolution {
            order,
            tables,
            enum_sheet: pool.into_sheet(&self.options.enum_sheet),
            warnings,
        })
    }

    /// Check table, field and sheet names
    fn check_tables(&self) -> Result<()> {
        let mut table_names = AHashSet::new();
        let mut sheet_names = AHashSet::new();

        if let Some(reason) = self.profile.check_sheet_name(&self.options.enum_sheet) {
            return Err(Error::InvalidSheetName {
                name: self.options.enum_sheet.clone(),
                reason,
            });
        }
        sheet_names.insert(self.options.enum_sheet.to_lowercase());

        for table in &self.package.tables {
            if !table_names.insert(table.name.as_str()) {
                return Err(Error::DuplicateTable(table.name.clone()));
            }

            let sheet = table.sheet_name();
            if let Some(reason) = self.profile.check_sheet_name(sheet) {
                return Err(Error::InvalidSheetName {
                    name: sheet.to_string(),
                    reason,
                });
            }
            // Sheet names are case-insensitive
            if !sheet_names.insert(sheet.to_lowercase()) {
                return Err(Error::DuplicateSheetName(sheet.to_string()));
            }

            let needed = self.options.start_col as u32 + table.fields.len() as u32;
            if needed > self.profile.max_cols {
                return Err(Error::TooManyColumns {
                    table: table.name.clone(),
                    needed,
                    max: self.profile.max_cols,
                });
            }

            let mut field_names = AHashSet::new();
            for field in &table.fields {
                if !field_names.insert(field.name.as_str()) {
                    return Err(Error::DuplicateField {
                        table: table.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Check constraint values that no platform could realize
    fn check_constraints(&self, table: &Table, field: &Field) -> Result<()> {
        let c = &field.constraints;
        let invalid = |constraint: ConstraintKind, reason: String| Error::InvalidConstraint {
            table: table.name.clone(),
            field: field.name.clone(),
            constraint,
            reason,
        };
        let conflicting = |reason: String| Error::ConflictingConstraint {
            table: table.name.clone(),
            field: field.name.clone(),
            reason,
        };

        for (kind, bound) in [
            (ConstraintKind::Minimum, c.minimum),
            (ConstraintKind::Maximum, c.maximum),
        ] {
            if let Some(bound) = bound.filter(|b| !b.is_finite()) {
                return Err(invalid(kind, format!("{} is not a finite number", bound)));
            }
        }
        if let (Some(min), Some(max)) = (c.minimum, c.maximum) {
            if min > max {
                return Err(conflicting(format!(
                    "minimum {} is greater than maximum {}",
                    min, max
                )));
            }
        }
        if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
            if min > max {
                return Err(conflicting(format!(
                    "minLength {} is greater than maxLength {}",
                    min, max
                )));
            }
        }

        if let Some(pattern) = &c.pattern {
            if let Err(err) = regex::Regex::new(pattern) {
                return Err(invalid(ConstraintKind::Pattern, err.to_string()));
            }
        }

        if let Some(values) = &c.enumeration {
            if values.is_empty() {
                return Err(invalid(ConstraintKind::Enum, "no values".into()));
            }
            if let Some(value) = values.iter().find(|v| !v.matches_type(field.field_type)) {
                return Err(invalid(
                    ConstraintKind::Enum,
                    format!("value {} is not of type {}", value, field.field_type),
                ));
            }
        }
        Ok(())
    }

    /// Resolve a table's foreign keys to the columns they reference
    fn resolve_foreign_keys(
        &self,
        index: usize,
        table: &Table,
        graph: &mut DependencyGraph,
    ) -> Result<Vec<Vec<ForeignLink>>> {
        let mut links = vec![Vec::new(); table.fields.len()];

        for fk in &table.foreign_keys {
            if fk.fields.is_empty() || fk.fields.len() != fk.reference.fields.len() {
                return Err(Error::InvalidConstraint {
                    table: table.name.clone(),
                    field: fk.fields.join(", "),
                    constraint: ConstraintKind::ForeignKey,
                    reason: format!(
                        "{} local fields but {} referenced fields",
                        fk.fields.len(),
                        fk.reference.fields.len()
                    ),
                });
            }

            let ref_name = fk.reference.table_or(&table.name);
            let ref_index =
                self.package
                    .table_index(ref_name)
                    .ok_or_else(|| Error::UnknownReference {
                        table: table.name.clone(),
                        reference: format!("table '{}'", ref_name),
                    })?;
            let ref_table = &self.package.tables[ref_index];

            for (local, target) in fk.pairs() {
                let local_index =
                    table
                        .field_index(local)
                        .ok_or_else(|| Error::UnknownReference {
                            table: table.name.clone(),
                            reference: format!("field '{}'", local),
                        })?;
                let target_field =
                    ref_table
                        .field(target)
                        .ok_or_else(|| Error::UnknownReference {
                            table: table.name.clone(),
                            reference: format!("field '{}.{}'", ref_name, target),
                        })?;

                let field = &table.fields[local_index];
                if field.field_type != target_field.field_type {
                    return Err(Error::TypeMismatch {
                        table: table.name.clone(),
                        field: field.name.clone(),
                        field_type: field.field_type,
                        ref_table: ref_table.name.clone(),
                        ref_field: target_field.name.clone(),
                        ref_type: target_field.field_type,
                    });
                }

                let link = ForeignLink {
                    table: ref_table.name.clone(),
                    field: target_field.name.clone(),
                };
                if !links[local_index].contains(&link) {
                    links[local_index].push(link);
                }
            }

            graph.add_dependency(index, ref_index);
        }

        Ok(links)
    }

    /// Whether an enum list must be written to the enum sheet
    fn needs_enum_sheet(&self, field: &Field, values: &[Value]) -> bool {
        match self.profile.resolve(field.field_type, ConstraintKind::Enum) {
            Realization::Native(NativeKind::InlineList) => !fits_inline(values, self.profile),
            Realization::Unsupported => false,
            _ => true,
        }
    }
}

/// Warning for enum values starting with `+`, `=` or `'`
fn formula_like(table: &Table, field: &Field, values: &[Value]) -> Option<CompileWarning> {
    let flagged: Vec<String> = values
        .iter()
        .filter(|v| v.looks_like_formula())
        .map(ToString::to_string)
        .collect();
    (!flagged.is_empty()).then(|| CompileWarning::FormulaLikeEnum {
        table: table.name.clone(),
        field: field.name.clone(),
        values: flagged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tablecloth_core::{FieldType, Platform};

    fn resolve(package: &Package, options: &CompileOptions) -> Result<Resolution> {
        Resolver::new(package, options).resolve()
    }

    fn main_and_secondary() -> Package {
        Package::new()
            .with_table(
                Table::new("secondary")
                    .with_field(Field::new("main_id", FieldType::Integer))
                    .with_foreign_key(["main_id"], Some("main"), ["id"]),
            )
            .with_table(Table::new("main").with_field(Field::new("id", FieldType::Integer)))
    }

    #[test]
    fn test_foreign_keys_resolve_and_order() {
        let resolution = resolve(&main_and_secondary(), &CompileOptions::default()).unwrap();
        assert_eq!(resolution.order, vec![1, 0]);
        assert_eq!(
            resolution.tables[0].links,
            vec![vec![ForeignLink {
                table: "main".into(),
                field: "id".into(),
            }]]
        );
        assert!(resolution.enum_sheet.is_none());
    }

    #[test]
    fn test_self_reference() {
        let package = Package::new().with_table(
            Table::new("tree")
                .with_field(Field::new("id", FieldType::String))
                .with_field(Field::new("parent", FieldType::String))
                .with_foreign_key(["parent"], None, ["id"]),
        );
        let resolution = resolve(&package, &CompileOptions::default()).unwrap();
        assert_eq!(resolution.order, vec![0]);
        assert_eq!(resolution.tables[0].links[1][0].table, "tree");
    }

    #[test]
    fn test_duplicate_links_are_reduced() {
        let package = Package::new().with_table(
            Table::new("t")
                .with_field(Field::new("a", FieldType::String))
                .with_field(Field::new("b", FieldType::String))
                .with_foreign_key(["a"], None, ["b"])
                .with_foreign_key(["a", "b"], Some("t"), ["b", "a"]),
        );
        let resolution = resolve(&package, &CompileOptions::default()).unwrap();
        assert_eq!(resolution.tables[0].links[0].len(), 1);
        assert_eq!(resolution.tables[0].links[1].len(), 1);
    }

    #[test]
    fn test_unknown_references() {
        let package = Package::new().with_table(
            Table::new("t")
                .with_field(Field::new("a", FieldType::String))
                .with_foreign_key(["a"], Some("missing"), ["id"]),
        );
        assert_eq!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::UnknownReference {
                table: "t".into(),
                reference: "table 'missing'".into(),
            })
        );

        let package = Package::new().with_table(
            Table::new("t")
                .with_field(Field::new("a", FieldType::String))
                .with_foreign_key(["a"], None, ["nope"]),
        );
        assert!(matches!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::UnknownReference { reference, .. }) if reference == "field 't.nope'"
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let package = Package::new()
            .with_table(Table::new("main").with_field(Field::new("id", FieldType::Integer)))
            .with_table(
                Table::new("other")
                    .with_field(Field::new("main_id", FieldType::String))
                    .with_foreign_key(["main_id"], Some("main"), ["id"]),
            );
        assert!(matches!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::TypeMismatch { field_type: FieldType::String, ref_type: FieldType::Integer, .. })
        ));
    }

    #[test]
    fn test_mismatched_key_lengths() {
        let package = Package::new().with_table(
            Table::new("t")
                .with_field(Field::new("a", FieldType::String))
                .with_field(Field::new("b", FieldType::String))
                .with_foreign_key(["a", "b"], None, ["a"]),
        );
        assert!(matches!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::InvalidConstraint { constraint: ConstraintKind::ForeignKey, .. })
        ));
    }

    #[test]
    fn test_cycle() {
        let package = Package::new()
            .with_table(
                Table::new("a")
                    .with_field(Field::new("b_id", FieldType::Integer))
                    .with_foreign_key(["b_id"], Some("b"), ["a_id"]),
            )
            .with_table(
                Table::new("b")
                    .with_field(Field::new("a_id", FieldType::Integer))
                    .with_foreign_key(["a_id"], Some("a"), ["b_id"]),
            );
        assert_eq!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::CyclicReference {
                cycle: vec!["a".into(), "b".into(), "a".into()],
            })
        );
    }

    #[test]
    fn test_names() {
        let package = Package::new()
            .with_table(Table::new("a"))
            .with_table(Table::new("a"));
        assert_eq!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::DuplicateTable("a".into()))
        );

        let package = Package::new()
            .with_table(Table::new("a").with_sheet("Data"))
            .with_table(Table::new("b").with_sheet("data"));
        assert_eq!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::DuplicateSheetName("data".into()))
        );

        let package = Package::new().with_table(Table::new("lists"));
        assert_eq!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::DuplicateSheetName("lists".into()))
        );

        let package = Package::new().with_table(Table::new("x".repeat(40)));
        assert!(matches!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::InvalidSheetName { .. })
        ));
        assert!(resolve(&package, &CompileOptions::new(Platform::GoogleSheets)).is_ok());

        let package = Package::new().with_table(
            Table::new("t")
                .with_field(Field::new("a", FieldType::String))
                .with_field(Field::new("a", FieldType::Integer)),
        );
        assert!(matches!(
            resolve(&package, &CompileOptions::default()),
            Err(Error::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_constraint_values() {
        let check = |field: Field| {
            let package = Package::new().with_table(Table::new("t").with_field(field));
            resolve(&package, &CompileOptions::default())
        };

        assert!(matches!(
            check(Field::new("x", FieldType::Integer).minimum(5.0).maximum(1.0)),
            Err(Error::ConflictingConstraint { .. })
        ));
        assert!(matches!(
            check(Field::new("x", FieldType::String).min_length(5).max_length(1)),
            Err(Error::ConflictingConstraint { .. })
        ));
        assert!(matches!(
            check(Field::new("x", FieldType::String).pattern("(")),
            Err(Error::InvalidConstraint { constraint: ConstraintKind::Pattern, .. })
        ));
        assert!(matches!(
            check(Field::new("x", FieldType::Integer).enumeration(["a"])),
            Err(Error::InvalidConstraint { constraint: ConstraintKind::Enum, .. })
        ));
        assert!(matches!(
            check(Field::new("x", FieldType::String).enumeration(Vec::<Value>::new())),
            Err(Error::InvalidConstraint { constraint: ConstraintKind::Enum, .. })
        ));
        assert!(matches!(
            check(Field::new("x", FieldType::Number).maximum(f64::NAN)),
            Err(Error::InvalidConstraint { constraint: ConstraintKind::Maximum, .. })
        ));
        assert!(check(Field::new("x", FieldType::Integer).minimum(1.0).maximum(1.0)).is_ok());
    }

    #[test]
    fn test_enum_pool() {
        let long: Vec<String> = (0..100).map(|i| format!("value {}", i)).collect();
        let package = Package::new()
            .with_table(
                Table::new("a")
                    .with_field(Field::new("short", FieldType::String).enumeration(["x", "y"]))
                    .with_field(Field::new("long", FieldType::String).enumeration(long.clone()))
                    .with_field(Field::new("comma", FieldType::String).enumeration(["a,b"])),
            )
            .with_table(
                Table::new("b")
                    .with_field(Field::new("same", FieldType::String).enumeration(long.clone())),
            );

        // Short lists stay inline on Excel; long lists and lists with commas are pooled
        let resolution = resolve(&package, &CompileOptions::default()).unwrap();
        assert_eq!(resolution.tables[0].enum_columns, vec![None, Some(0), Some(1)]);
        assert_eq!(resolution.tables[1].enum_columns, vec![Some(0)]);
        let sheet = resolution.enum_sheet.unwrap();
        assert_eq!(sheet.name, "lists");
        assert_eq!(sheet.columns.len(), 2);
        assert_eq!(
            sheet.lookup(1),
            Some(LookupRange::new("lists", 1, RowSpan::new(0, 1)))
        );

        // Every list is pooled on Google Sheets
        let resolution = resolve(&package, &CompileOptions::new(Platform::GoogleSheets)).unwrap();
        assert_eq!(
            resolution.tables[0].enum_columns,
            vec![Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn test_enum_pool_keeps_field_types_apart() {
        let package = Package::new().with_table(
            Table::new("t")
                .with_field(Field::new("count", FieldType::Integer).enumeration([1i64, 2]))
                .with_field(Field::new("ratio", FieldType::Number).enumeration([1.0, 2.0]))
                .with_field(Field::new("again", FieldType::Integer).enumeration([1i64, 2])),
        );
        let resolution = resolve(&package, &CompileOptions::new(Platform::GoogleSheets)).unwrap();
        assert_eq!(
            resolution.tables[0].enum_columns,
            vec![Some(0), Some(1), Some(0)]
        );

        let sheet = resolution.enum_sheet.unwrap();
        assert_eq!(sheet.values(0), Some(&[Value::Integer(1), Value::Integer(2)][..]));
        assert_eq!(sheet.values(1), Some(&[Value::Number(1.0), Value::Number(2.0)][..]));
    }

    #[test]
    fn test_formula_like_enum_warning() {
        let package = Package::new().with_table(
            Table::new("t")
                .with_field(Field::new("x", FieldType::String).enumeration(["=A1", "ok", "+1"])),
        );
        let resolution = resolve(&package, &CompileOptions::default()).unwrap();
        assert_eq!(
            resolution.warnings,
            vec![CompileWarning::FormulaLikeEnum {
                table: "t".into(),
                field: "x".into(),
                values: vec!["=A1".into(), "+1".into()],
            }]
        );
    }

    #[test]
    fn test_registry_is_write_once() {
        use crate::layout::LayoutEngine;

        let options = CompileOptions::default();
        let table = Table::new("main").with_field(Field::new("id", FieldType::Integer));
        let layout = LayoutEngine::new(&options).layout(&table, 0, 0);

        let mut registry = LookupRegistry::new();
        assert!(!registry.is_published("main"));
        assert!(registry.publish(&layout));
        assert!(!registry.publish(&layout));
        assert_eq!(
            registry.get("main", "id"),
            Some(&LookupRange::new("main", 0, RowSpan::new(1, 1000)))
        );
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn test_fits_inline() {
        let excel = CapabilityProfile::for_platform(Platform::Excel);
        assert!(fits_inline(&[Value::from("a"), Value::from("b")], excel));
        assert!(!fits_inline(&[Value::from("a,b")], excel));
        let long: Vec<Value> = (0..60).map(|i| Value::from(format!("v{:03}", i))).collect();
        assert!(!fits_inline(&long, excel));

        let sheets = CapabilityProfile::for_platform(Platform::GoogleSheets);
        assert!(fits_inline(&long, sheets));
    }
}
