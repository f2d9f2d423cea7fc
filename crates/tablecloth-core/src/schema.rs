//! Schema model
//!
//! An already-validated, in-memory description of a tabular data package:
//! tables, their ordered fields, field constraints and foreign keys.
//! The compiler treats it as read-only input.
//!
//! ## Example
//!
//! ```rust
//! use tablecloth_core::{Field, FieldType, Table};
//!
//! let table = Table::new("samples")
//!     .with_field(Field::new("id", FieldType::Integer).required().unique())
//!     .with_field(Field::new("site", FieldType::String).enumeration(["north", "south"]))
//!     .with_foreign_key(["site"], Some("sites"), ["name"]);
//!
//! assert_eq!(table.field_index("site"), Some(1));
//! assert_eq!(table.sheet_name(), "samples");
//! ```

use std::fmt;

use crate::capability::ConstraintKind;
use crate::value::Value;

/// A data package: an ordered collection of tables
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Package {
    /// Tables in declaration order
    #[cfg_attr(feature = "serde", serde(alias = "resources"))]
    pub tables: Vec<Table>,
}

impl Package {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Find a table by name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Position of a table in declaration order
    pub fn table_index(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name == name)
    }
}

/// A table: one sheet of the produced template
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Table {
    /// Table name (unique within a package)
    pub name: String,
    /// Sheet name, if different from the table name
    #[cfg_attr(feature = "serde", serde(default))]
    pub sheet: Option<String>,
    /// Fields in column order
    pub fields: Vec<Field>,
    /// Foreign keys declared by this table
    #[cfg_attr(feature = "serde", serde(default))]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    /// Create a table with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheet: None,
            fields: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Place the table on a sheet with a different name
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Append a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a foreign key
    ///
    /// `table` is the referenced table, or `None` for a reference to this table.
    pub fn with_foreign_key<L, R>(mut self, fields: L, table: Option<&str>, targets: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        self.foreign_keys.push(ForeignKey {
            fields: fields.into_iter().map(Into::into).collect(),
            reference: Reference {
                table: table.map(str::to_string),
                fields: targets.into_iter().map(Into::into).collect(),
            },
        });
        self
    }

    /// Name of the sheet this table is written to
    pub fn sheet_name(&self) -> &str {
        self.sheet.as_deref().unwrap_or(&self.name)
    }

    /// Find a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Zero-based position of a field
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A typed column of a table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Field {
    /// Field name (header text)
    pub name: String,
    /// Declared type
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub field_type: FieldType,
    /// Description, used as the header comment
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// Value constraints
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Constraints,
}

impl Field {
    /// Create an unconstrained field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
            constraints: Constraints::default(),
        }
    }

    /// Set the description
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Require a value
    pub fn required(mut self) -> Self {
        self.constraints.required = true;
        self
    }

    /// Require unique values
    pub fn unique(mut self) -> Self {
        self.constraints.unique = true;
        self
    }

    /// Set the minimum value
    pub fn minimum(mut self, value: f64) -> Self {
        self.constraints.minimum = Some(value);
        self
    }

    /// Set the maximum value
    pub fn maximum(mut self, value: f64) -> Self {
        self.constraints.maximum = Some(value);
        self
    }

    /// Set the minimum text length
    pub fn min_length(mut self, length: u32) -> Self {
        self.constraints.min_length = Some(length);
        self
    }

    /// Set the maximum text length
    pub fn max_length(mut self, length: u32) -> Self {
        self.constraints.max_length = Some(length);
        self
    }

    /// Set the regular expression values must match
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.pattern = Some(pattern.into());
        self
    }

    /// Restrict values to a list
    pub fn enumeration<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.constraints.enumeration = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    /// All field types, in profile table order
    pub const ALL: [FieldType; 4] = [
        FieldType::String,
        FieldType::Integer,
        FieldType::Number,
        FieldType::Boolean,
    ];

    /// Schema name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    /// Check if values of this type are numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Number)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field constraints
///
/// Unset (`None`/`false`) constraints are not declared. A zero bound is a
/// declared constraint.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Constraints {
    /// A value is required
    pub required: bool,
    /// Values must be unique within the column
    pub unique: bool,
    /// Minimum value (numeric types)
    pub minimum: Option<f64>,
    /// Maximum value (numeric types)
    pub maximum: Option<f64>,
    /// Minimum text length
    pub min_length: Option<u32>,
    /// Maximum text length
    pub max_length: Option<u32>,
    /// Regular expression the whole value must match
    pub pattern: Option<String>,
    /// Allowed values, in order
    #[cfg_attr(feature = "serde", serde(rename = "enum"))]
    pub enumeration: Option<Vec<Value>>,
}

impl Constraints {
    /// Declared constraints, in the order checks are compiled
    pub fn declared(&self) -> Vec<ConstraintKind> {
        let mut kinds = Vec::new();
        if self.required {
            kinds.push(ConstraintKind::Required);
        }
        if self.unique {
            kinds.push(ConstraintKind::Unique);
        }
        if self.minimum.is_some() {
            kinds.push(ConstraintKind::Minimum);
        }
        if self.maximum.is_some() {
            kinds.push(ConstraintKind::Maximum);
        }
        if self.min_length.is_some() {
            kinds.push(ConstraintKind::MinLength);
        }
        if self.max_length.is_some() {
            kinds.push(ConstraintKind::MaxLength);
        }
        if self.pattern.is_some() {
            kinds.push(ConstraintKind::Pattern);
        }
        if self.enumeration.is_some() {
            kinds.push(ConstraintKind::Enum);
        }
        kinds
    }
}

/// A foreign key: local fields paired with fields of a referenced table
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ForeignKey {
    /// Local field names
    pub fields: Vec<String>,
    /// Referenced table and fields
    pub reference: Reference,
}

impl ForeignKey {
    /// Check if the key spans more than one column
    pub fn is_composite(&self) -> bool {
        self.fields.len() > 1
    }

    /// Local/referenced field pairs
    ///
    /// A composite key is treated as independent single-column keys.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields
            .iter()
            .map(String::as_str)
            .zip(self.reference.fields.iter().map(String::as_str))
    }
}

/// Target of a foreign key
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Reference {
    /// Referenced table (`None` or empty for the declaring table)
    #[cfg_attr(feature = "serde", serde(default, alias = "resource"))]
    pub table: Option<String>,
    /// Referenced field names
    pub fields: Vec<String>,
}

impl Reference {
    /// Resolve the referenced table name against the declaring table
    pub fn table_or<'a>(&'a self, declaring: &'a str) -> &'a str {
        match self.table.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => declaring,
        }
    }
}
