//! Literal values (enum members and constraint bounds)

use std::fmt;

use crate::schema::FieldType;

/// A literal value declared in a schema, e.g. a member of an `enum` constraint
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Boolean value (TRUE/FALSE)
    Boolean(bool),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// Text
    String(String),
}

impl Value {
    /// Check whether this literal is acceptable for a field of the given type
    ///
    /// Integers are acceptable for `number` fields, and integral numbers for
    /// `integer` fields.
    pub fn matches_type(&self, field_type: FieldType) -> bool {
        match (self, field_type) {
            (Value::Boolean(_), FieldType::Boolean) => true,
            (Value::Integer(_), FieldType::Integer | FieldType::Number) => true,
            (Value::Number(n), FieldType::Integer) => n.fract() == 0.0,
            (Value::Number(_), FieldType::Number) => true,
            (Value::String(_), FieldType::String) => true,
            _ => false,
        }
    }

    /// Format the value for use inside a spreadsheet formula
    ///
    /// Strings are quoted (with embedded quotes doubled), booleans are
    /// upper-cased and numbers are written as-is.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tablecloth_core::Value;
    ///
    /// assert_eq!(Value::Boolean(true).to_formula(), "TRUE");
    /// assert_eq!(Value::Number(1.5).to_formula(), "1.5");
    /// assert_eq!(Value::from("a\"b").to_formula(), "\"a\"\"b\"");
    /// ```
    pub fn to_formula(&self) -> String {
        match self {
            Value::String(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            other => other.to_string(),
        }
    }

    /// Check if a text value would be read as a formula or an escape by a spreadsheet
    pub fn looks_like_formula(&self) -> bool {
        matches!(self, Value::String(s) if s.starts_with(['+', '=', '\'']))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
