//! # tablecloth
//!
//! Compile tabular data packages into spreadsheet templates with data
//! validation.
//!
//! A package's tables become sheets, its fields become columns, and field
//! constraints become the data-validation rules and invalid-cell highlights
//! a spreadsheet application enforces while data is entered.
//!
//! ## Features
//!
//! - Excel and Google Sheets capability profiles
//! - Foreign keys as dropdowns over the referenced column
//! - Enum lists inline or pooled on a hidden sheet
//! - Strict or best-effort handling of unsupported constraints
//! - Header comments, frozen panes and column widths
//!
//! ## Example
//!
//! ```rust
//! use tablecloth::prelude::*;
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
//! let mut writer = RecordingWriter::new();
//! let compiled = build(&package, &CompileOptions::default(), &mut writer).unwrap();
//!
//! assert_eq!(compiled.order, vec!["main", "secondary"]);
//! assert_eq!(writer.sheets(), vec!["main", "secondary"]);
//! ```

pub mod prelude;
pub mod writer;

pub use writer::{emit, RecordingWriter, SheetWriter, WriteOp};

// Re-export compiler types
pub use tablecloth_compiler::{
    compile, formula, ColumnLayout, CompileOptions, CompileWarning, CompiledColumn,
    CompiledPackage, CompiledSheet, EnumSheet, FreezePanes, HeaderCell, LayoutEngine,
    LookupRegistry, Mode, TableLayout, DEFAULT_DATA_ROWS, DEFAULT_ENUM_SHEET,
};

// Re-export core types
pub use tablecloth_core::{
    CapabilityProfile, CellAddress, CellFormat, CellRange, Color, CompiledCheck,
    ConstraintKind, Constraints, Directive, Error, ErrorStyle, Field, FieldType, ForeignKey,
    FormulaShape, HeaderComment, ListOrigin, ListSource, LookupRange, NativeKind, Package,
    Platform, Realization, Reference, Result, RowSpan, RuleKind, Table, ValidationOperator,
    ValidationRule, Value,
};

/// Error from [`build`]
#[derive(Debug, thiserror::Error)]
pub enum BuildError<E>
where
    E: std::error::Error + 'static,
{
    /// The package did not compile; nothing was written
    #[error(transparent)]
    Compile(#[from] Error),

    /// The writer failed part way through
    #[error("Sheet writer failed: {0}")]
    Write(#[source] E),
}

/// Compile `package` and write it to `writer`
///
/// The package is compiled completely before the first writer call, so a
/// compilation error leaves the writer untouched.
pub fn build<W>(
    package: &Package,
    options: &CompileOptions,
    writer: &mut W,
) -> std::result::Result<CompiledPackage, BuildError<W::Error>>
where
    W: SheetWriter,
    W::Error: std::error::Error + 'static,
{
    let compiled = compile(package, options)?;
    for warning in &compiled.warnings {
        tracing::debug!("Compiled with warning: {}", warning);
    }
    emit(&compiled, writer).map_err(BuildError::Write)?;
    Ok(compiled)
}
