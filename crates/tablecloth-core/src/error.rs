//! Error types for tablecloth

use thiserror::Error;

use crate::capability::{ConstraintKind, Platform};
use crate::schema::FieldType;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling a package
///
/// Every variant is fatal to the compilation of the whole package, except
/// [`Error::UnsupportedConstraint`] which the caller may downgrade to a
/// warning by compiling in best-effort mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Foreign keys form a cycle between distinct tables
    #[error("Cyclic foreign key references: {}", .cycle.join(" -> "))]
    CyclicReference { cycle: Vec<String> },

    /// A foreign key pairs fields of different types
    #[error(
        "Foreign key type mismatch: {table}.{field} ({field_type}) references \
         {ref_table}.{ref_field} ({ref_type})"
    )]
    TypeMismatch {
        table: String,
        field: String,
        field_type: FieldType,
        ref_table: String,
        ref_field: String,
        ref_type: FieldType,
    },

    /// A declared constraint has no realization on the selected platform
    #[error("Constraint '{constraint}' on {table}.{field} ({field_type}) is not supported by {platform}")]
    UnsupportedConstraint {
        table: String,
        field: String,
        constraint: ConstraintKind,
        field_type: FieldType,
        platform: Platform,
    },

    /// The constraints of a field cannot be combined into one validation
    #[error("Conflicting constraints on {table}.{field}: {reason}")]
    ConflictingConstraint {
        table: String,
        field: String,
        reason: String,
    },

    /// A foreign key names a table or field that does not exist
    #[error("Unknown reference in table '{table}': {reference}")]
    UnknownReference { table: String, reference: String },

    /// A constraint value is malformed
    #[error("Invalid constraint '{constraint}' on {table}.{field}: {reason}")]
    InvalidConstraint {
        table: String,
        field: String,
        constraint: ConstraintKind,
        reason: String,
    },

    /// Two tables share a name
    #[error("Table already exists: {0}")]
    DuplicateTable(String),

    /// Two fields of one table share a name
    #[error("Field '{field}' appears more than once in table '{table}'")]
    DuplicateField { table: String, field: String },

    /// Two sheets share a name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Sheet name rejected by the platform
    #[error("Invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    /// Table has more fields than the platform allows columns
    #[error("Table '{table}' needs {needed} columns (max: {max})")]
    TooManyColumns { table: String, needed: u32, max: u32 },

    /// Requested data rows do not fit on a sheet
    #[error("{needed} rows do not fit on a {platform} sheet (max: {max})")]
    TooManyRows {
        needed: u64,
        max: u32,
        platform: Platform,
    },
}

impl Error {
    /// Check if this error may be downgraded to a warning in best-effort mode
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnsupportedConstraint { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offender() {
        let err = Error::UnsupportedConstraint {
            table: "people".into(),
            field: "code".into(),
            constraint: ConstraintKind::Pattern,
            field_type: FieldType::String,
            platform: Platform::Excel,
        };
        assert_eq!(
            err.to_string(),
            "Constraint 'pattern' on people.code (string) is not supported by Excel"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_cycle_display() {
        let err = Error::CyclicReference {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Cyclic foreign key references: a -> b -> a");
        assert!(!err.is_recoverable());
    }
}
