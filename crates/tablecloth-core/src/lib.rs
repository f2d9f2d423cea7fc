//! # tablecloth-core
//!
//! Core data structures for the tablecloth spreadsheet-template compiler.
//!
//! This crate provides the fundamental types used throughout tablecloth:
//! - [`Package`], [`Table`], [`Field`] - The schema model being compiled
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`CellFormat`] - Header and invalid-cell formats
//! - [`LookupRange`] - Where the permissible values of a list check live
//! - [`CapabilityProfile`] - How each platform realizes each constraint
//! - [`Directive`] and [`ValidationRule`] - The platform-neutral compiler output
//!
//! ## Example
//!
//! ```rust
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
//! assert_eq!(package.tables.len(), 2);
//! ```

pub mod address;
pub mod capability;
pub mod comment;
pub mod error;
pub mod format;
pub mod lookup;
pub mod schema;
pub mod validation;
pub mod value;

// Re-exports for convenience
pub use address::{CellAddress, CellRange};
pub use capability::{
    CapabilityProfile, ConstraintKind, FormulaShape, NativeKind, Platform, Realization,
    WidthUnit,
};
pub use comment::HeaderComment;
pub use error::{Error, Result};
pub use format::{CellFormat, Color};
pub use lookup::{LookupRange, RowSpan};
pub use schema::{Constraints, Field, FieldType, ForeignKey, Package, Reference, Table};
pub use validation::{
    CompiledCheck, Directive, ErrorStyle, ListOrigin, ListSource, RuleKind, ValidationOperator,
    ValidationRule,
};
pub use value::Value;
