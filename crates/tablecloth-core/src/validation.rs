//! Compiled validation output
//!
//! The rule compiler turns each field into an ordered list of [`Directive`]s
//! (one per realized check) and at most one [`ValidationRule`], the single
//! data-validation rule a platform allows on a cell.
//!
//! ## Example
//!
//! ```rust
//! use tablecloth_core::{ListSource, RuleKind, ValidationRule, Value};
//!
//! let rule = ValidationRule::list(ListSource::Literal(vec![Value::from("a"), Value::from("b")]))
//!     .with_allow_blank(false)
//!     .with_message("Value must be in the dropdown list");
//!
//! assert!(matches!(rule.kind, RuleKind::List(_)));
//! assert_eq!(rule.kind.xlsx_type(), "list");
//! ```

use crate::capability::Realization;
use crate::lookup::LookupRange;
use crate::schema::FieldType;
use crate::value::Value;

/// A platform-neutral check on the values of one column
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Value must be of the field's type
    TypeCheck(FieldType),
    /// Value must not be blank
    RequiredCheck,
    /// Value must occur at most once in the column (blank cells always pass)
    UniquenessCheck {
        /// Text is compared case-sensitively
        case_sensitive: bool,
    },
    /// Numeric bounds (inclusive)
    RangeCheck {
        min: Option<f64>,
        max: Option<f64>,
        /// Values must also be whole numbers
        whole: bool,
    },
    /// Text length bounds (inclusive)
    LengthCheck { min: Option<u32>, max: Option<u32> },
    /// Whole value must match a regular expression
    PatternCheck { regex: String },
    /// Value must be one of a list
    ListCheck {
        origin: ListOrigin,
        source: ListSource,
    },
}

impl Directive {
    /// Check if this is a list membership check
    pub fn is_list(&self) -> bool {
        matches!(self, Directive::ListCheck { .. })
    }
}

/// Why a column is restricted to a list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListOrigin {
    /// `boolean` field without an enum (TRUE/FALSE)
    Boolean,
    /// `enum` constraint
    Enum,
    /// Foreign key to the given table and field
    ForeignKey { table: String, field: String },
}

/// Where the members of a list come from
#[derive(Debug, Clone, PartialEq)]
pub enum ListSource {
    /// Values written inline in the rule
    Literal(Vec<Value>),
    /// Values held in a cell range
    Range(LookupRange),
}

impl ListSource {
    /// The lookup range, for range-based lists
    pub fn lookup(&self) -> Option<&LookupRange> {
        match self {
            ListSource::Range(lookup) => Some(lookup),
            ListSource::Literal(_) => None,
        }
    }
}

/// A directive together with the way the platform realizes it
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCheck {
    pub directive: Directive,
    pub realization: Realization,
}

/// Data validation rule for the data cells of one column
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    /// Type of validation
    pub kind: RuleKind,
    /// Allow blank/empty cells
    pub allow_blank: bool,
    /// Show dropdown for list validation
    pub show_dropdown: bool,
    /// Show error alert when invalid data entered
    pub show_error: bool,
    /// Error alert style
    pub error_style: ErrorStyle,
    /// Message describing valid values
    pub message: String,
}

impl Default for ValidationRule {
    fn default() -> Self {
        Self {
            kind: RuleKind::Custom {
                formula: String::new(),
            },
            allow_blank: true,
            show_dropdown: true,
            show_error: true,
            error_style: ErrorStyle::Stop,
            message: String::new(),
        }
    }
}

impl ValidationRule {
    /// Create a rule of the given kind
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Create a list validation (dropdown)
    pub fn list(source: ListSource) -> Self {
        Self::new(RuleKind::List(source))
    }

    /// Create a custom formula validation
    ///
    /// `formula` returns TRUE for valid values and is written relative to the
    /// first data cell of the column.
    pub fn custom(formula: impl Into<String>) -> Self {
        Self::new(RuleKind::Custom {
            formula: formula.into(),
        })
    }

    /// Create a whole or decimal number validation from inclusive bounds
    ///
    /// Returns `None` when neither bound is set.
    pub fn number_range(min: Option<f64>, max: Option<f64>, whole: bool) -> Option<Self> {
        let (operator, value1, value2) = match (min, max) {
            (Some(min), Some(max)) => (ValidationOperator::Between, min, Some(max)),
            (Some(min), None) => (ValidationOperator::GreaterThanOrEqual, min, None),
            (None, Some(max)) => (ValidationOperator::LessThanOrEqual, max, None),
            (None, None) => return None,
        };
        let value1 = value1.to_string();
        let value2 = value2.map(|v| v.to_string());
        Some(Self::new(if whole {
            RuleKind::Whole {
                operator,
                value1,
                value2,
            }
        } else {
            RuleKind::Decimal {
                operator,
                value1,
                value2,
            }
        }))
    }

    /// Set whether blank cells are allowed
    pub fn with_allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }

    /// Set whether to show dropdown for list validation
    pub fn with_dropdown(mut self, show: bool) -> Self {
        self.show_dropdown = show;
        self
    }

    /// Set whether invalid input raises an alert
    pub fn with_show_error(mut self, show: bool) -> Self {
        self.show_error = show;
        self
    }

    /// Set the error style
    pub fn with_error_style(mut self, style: ErrorStyle) -> Self {
        self.error_style = style;
        self
    }

    /// Set the message describing valid values
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Types of data validation
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Must be a whole number
    Whole {
        operator: ValidationOperator,
        value1: String,
        value2: Option<String>,
    },

    /// Must be a decimal number
    Decimal {
        operator: ValidationOperator,
        value1: String,
        value2: Option<String>,
    },

    /// Must be from a list
    List(ListSource),

    /// Custom formula validation
    Custom {
        /// Formula that returns TRUE/FALSE
        formula: String,
    },
}

impl RuleKind {
    /// Get the XLSX type string for this validation type
    pub fn xlsx_type(&self) -> &'static str {
        match self {
            RuleKind::Whole { .. } => "whole",
            RuleKind::Decimal { .. } => "decimal",
            RuleKind::List(_) => "list",
            RuleKind::Custom { .. } => "custom",
        }
    }
}

/// Comparison operators for number validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationOperator {
    /// Value must be between value1 and value2
    #[default]
    Between,
    /// Value must be greater than or equal to value1
    GreaterThanOrEqual,
    /// Value must be less than or equal to value1
    LessThanOrEqual,
}

/// Error alert styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ErrorStyle {
    /// Reject invalid data (default)
    #[default]
    Stop,
    /// Warn but allow
    Warning,
    /// Just inform
    Information,
}
