//! Compiled output
//!
//! A [`CompiledPackage`] holds everything a sheet writer needs, in write
//! order. It is produced whole or not at all: a failed compilation yields an
//! error and no package.

use std::fmt;

use tablecloth_core::{
    CellFormat, CellRange, CompiledCheck, Error, ListSource, Platform, ValidationRule, Value,
};

use crate::layout::TableLayout;
use crate::resolver::{EnumSheet, LookupRegistry};

/// A non-fatal problem found while compiling
#[derive(Debug, Clone, PartialEq)]
pub enum CompileWarning {
    /// An unsupported constraint was skipped (best-effort mode)
    Skipped(Error),
    /// Enum values a spreadsheet would read as formulas or escapes
    FormulaLikeEnum {
        table: String,
        field: String,
        values: Vec<String>,
    },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileWarning::Skipped(err) => write!(f, "Skipped: {}", err),
            CompileWarning::FormulaLikeEnum {
                table,
                field,
                values,
            } => write!(
                f,
                "Enum values of {}.{} start with +, = or ' ({}) and may be read as formulas",
                table,
                field,
                values.join(", ")
            ),
        }
    }
}

/// Compiled validation of one column
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledColumn {
    /// Field name
    pub field: String,
    /// Column index (0-based)
    pub column: u16,
    /// Data cells the rule and highlight apply to
    pub range: CellRange,
    /// Checks, in compile order, with their realization
    pub checks: Vec<CompiledCheck>,
    /// The column's data-validation rule
    pub rule: Option<ValidationRule>,
    /// Formula checks not covered by a native `rule` (enforced by the highlight)
    pub companion_formula: Option<String>,
    /// Conditional-format formula, TRUE for invalid cells
    pub highlight: Option<String>,
}

/// A compiled table
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSheet {
    /// Table name
    pub table: String,
    /// Sheet layout
    pub layout: TableLayout,
    /// Columns, in field order
    pub columns: Vec<CompiledColumn>,
}

impl CompiledSheet {
    /// Get the compiled column of a field
    pub fn column(&self, field: &str) -> Option<&CompiledColumn> {
        self.columns.iter().find(|c| c.field == field)
    }
}

/// A compiled package, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPackage {
    /// Target platform
    pub platform: Platform,
    /// Table names, in write order
    pub order: Vec<String>,
    /// Hidden sheet of enum lists, written before any table
    pub enum_sheet: Option<EnumSheet>,
    /// Compiled tables, in write order
    pub sheets: Vec<CompiledSheet>,
    /// Lookup ranges of every table column
    pub lookups: LookupRegistry,
    /// Format the highlights apply to invalid cells
    pub invalid_format: CellFormat,
    /// Non-fatal problems
    pub warnings: Vec<CompileWarning>,
}

impl CompiledPackage {
    /// Get a compiled table by name
    pub fn sheet(&self, table: &str) -> Option<&CompiledSheet> {
        self.sheets.iter().find(|s| s.table == table)
    }

    /// Get the compiled column of a field
    pub fn column(&self, table: &str, field: &str) -> Option<&CompiledColumn> {
        self.sheet(table).and_then(|s| s.column(field))
    }

    /// Values a list accepts, when known at compile time
    ///
    /// Literal lists and enum-sheet ranges are known. Foreign key ranges hold
    /// whatever is entered in the referenced column, so they return `None`.
    pub fn permissible_values(&self, source: &ListSource) -> Option<Vec<Value>> {
        match source {
            ListSource::Literal(values) => Some(values.clone()),
            ListSource::Range(lookup) => {
                let sheet = self.enum_sheet.as_ref()?;
                if lookup.sheet != sheet.name {
                    return None;
                }
                sheet.values(lookup.column).map(<[Value]>::to_vec)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablecloth_core::{ConstraintKind, FieldType};

    #[test]
    fn test_warning_display() {
        let warning = CompileWarning::Skipped(Error::UnsupportedConstraint {
            table: "t".into(),
            field: "f".into(),
            constraint: ConstraintKind::Pattern,
            field_type: FieldType::String,
            platform: Platform::Excel,
        });
        assert_eq!(
            warning.to_string(),
            "Skipped: Constraint 'pattern' on t.f (string) is not supported by Excel"
        );

        let warning = CompileWarning::FormulaLikeEnum {
            table: "t".into(),
            field: "f".into(),
            values: vec!["=1".into()],
        };
        assert!(warning.to_string().contains("(=1)"));
    }
}
