//! # tablecloth-compiler
//!
//! Compiles a tabular data package into spreadsheet data-validation rules.
//!
//! This crate provides:
//! - Schema resolution (foreign keys, write order, enum lists)
//! - Sheet layout (columns, header comments, frozen panes, widths)
//! - Rule compilation against a platform [`CapabilityProfile`]
//! - Check formula templates
//!
//! Compilation is pure: the same package and options always produce the same
//! [`CompiledPackage`], and nothing is written until a writer is handed one.
//!
//! ## Example
//!
//! ```rust
//! use tablecloth_compiler::{compile, CompileOptions};
//! use tablecloth_core::{Field, FieldType, Package, Table};
//!
//! let package = Package::new()
//!     .with_table(
//!         Table::new("main")
//!             .with_field(Field::new("id", FieldType::Integer).required().unique().minimum(1.0)),
//!     )
//!     .with_table(
//!         Table::new("secondary")
//!             .with_field(Field::new("main_id", FieldType::Integer))
//!             .with_foreign_key(["main_id"], Some("main"), ["id"]),
//!     );
//!
//! let compiled = compile(&package, &CompileOptions::default())?;
//! assert_eq!(compiled.order, vec!["main", "secondary"]);
//! # Ok::<(), tablecloth_core::Error>(())
//! ```
//!
//! [`CapabilityProfile`]: tablecloth_core::CapabilityProfile

pub mod formula;
pub mod graph;
pub mod layout;
pub mod options;
pub mod package;
pub mod resolver;
pub mod rules;

pub use graph::DependencyGraph;
pub use layout::{ColumnLayout, FreezePanes, HeaderCell, LayoutEngine, TableLayout};
pub use options::{CompileOptions, Mode, DEFAULT_DATA_ROWS, DEFAULT_ENUM_SHEET};
pub use package::{CompileWarning, CompiledColumn, CompiledPackage, CompiledSheet};
pub use resolver::{EnumSheet, ForeignLink, LookupRegistry, Resolver};
pub use rules::RuleCompiler;

use tablecloth_core::{Package, Result};

/// Compile `package` for the platform and settings in `options`
///
/// Tables are laid out and compiled in write order, so every foreign key
/// finds its referenced table already published in the lookup registry.
/// Any error aborts the whole compilation.
pub fn compile(package: &Package, options: &CompileOptions) -> Result<CompiledPackage> {
    let resolution = Resolver::new(package, options).resolve()?;
    let engine = LayoutEngine::new(options);
    let mut registry = LookupRegistry::new();
    let mut warnings = resolution.warnings;
    let mut sheets = Vec::with_capacity(resolution.order.len());

    for &index in &resolution.order {
        let table = &package.tables[index];
        let layout = engine.layout(table, options.start_row, options.start_col);
        let published = registry.publish(&layout);
        debug_assert!(published, "table '{}' is laid out twice", table.name);

        let columns = RuleCompiler::new(options, &registry, resolution.enum_sheet.as_ref())
            .compile_table(table, &layout, &resolution.tables[index], &mut warnings)?;
        sheets.push(CompiledSheet {
            table: table.name.clone(),
            layout,
            columns,
        });
    }

    tracing::debug!(
        "Compiled {} tables for {} ({} warnings)",
        sheets.len(),
        options.platform,
        warnings.len()
    );

    Ok(CompiledPackage {
        platform: options.platform,
        order: sheets.iter().map(|s| s.table.clone()).collect(),
        enum_sheet: resolution.enum_sheet,
        sheets,
        lookups: registry,
        invalid_format: options.invalid_format,
        warnings,
    })
}
