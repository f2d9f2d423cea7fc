//! Platform capability profiles
//!
//! A [`CapabilityProfile`] is a static lookup table, keyed by
//! (field type, constraint), telling the rule compiler how a platform realizes
//! each constraint: with a native validation construct, with a formula, or not
//! at all. Adding a platform means adding a profile, not new compiler branches.
//!
//! ## Example
//!
//! ```rust
//! use tablecloth_core::{CapabilityProfile, ConstraintKind, FieldType, Platform, Realization};
//!
//! let excel = CapabilityProfile::for_platform(Platform::Excel);
//! assert_eq!(
//!     excel.resolve(FieldType::String, ConstraintKind::Pattern),
//!     Realization::Unsupported
//! );
//!
//! let sheets = CapabilityProfile::for_platform(Platform::GoogleSheets);
//! assert!(sheets.resolve(FieldType::String, ConstraintKind::Pattern).is_formula());
//! ```

use std::fmt;

use crate::schema::FieldType;

/// Target spreadsheet platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Platform {
    /// Microsoft Excel workbooks
    #[default]
    Excel,
    /// Google Sheets documents
    GoogleSheets,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Excel => "Excel",
            Platform::GoogleSheets => "Google Sheets",
        })
    }
}

/// Constraints the profile knows how to realize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Required,
    Unique,
    Minimum,
    Maximum,
    MinLength,
    MaxLength,
    Pattern,
    Enum,
    ForeignKey,
}

impl ConstraintKind {
    /// All constraints, in profile table order
    pub const ALL: [ConstraintKind; 9] = [
        ConstraintKind::Required,
        ConstraintKind::Unique,
        ConstraintKind::Minimum,
        ConstraintKind::Maximum,
        ConstraintKind::MinLength,
        ConstraintKind::MaxLength,
        ConstraintKind::Pattern,
        ConstraintKind::Enum,
        ConstraintKind::ForeignKey,
    ];

    /// Schema name of the constraint
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Required => "required",
            ConstraintKind::Unique => "unique",
            ConstraintKind::Minimum => "minimum",
            ConstraintKind::Maximum => "maximum",
            ConstraintKind::MinLength => "minLength",
            ConstraintKind::MaxLength => "maxLength",
            ConstraintKind::Pattern => "pattern",
            ConstraintKind::Enum => "enum",
            ConstraintKind::ForeignKey => "foreignKey",
        }
    }

    fn index(&self) -> usize {
        match self {
            ConstraintKind::Required => 0,
            ConstraintKind::Unique => 1,
            ConstraintKind::Minimum => 2,
            ConstraintKind::Maximum => 3,
            ConstraintKind::MinLength => 4,
            ConstraintKind::MaxLength => 5,
            ConstraintKind::Pattern => 6,
            ConstraintKind::Enum => 7,
            ConstraintKind::ForeignKey => 8,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native validation constructs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeKind {
    /// The rule's "ignore blank" flag is cleared
    RejectBlank,
    /// Whole/decimal number between bounds
    NumberRange,
    /// Dropdown of literal values, falling back to [`NativeKind::RangeList`] when too long
    InlineList,
    /// Dropdown of the values in a cell range
    RangeList,
}

/// Shape of the formula emulating a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaShape {
    /// Count of matches within the column must not exceed one
    CountMatches {
        /// Compare text exactly (EXACT) instead of case-insensitively (COUNTIF)
        case_sensitive: bool,
    },
    /// Comparison on the text length (LEN)
    TextLength,
    /// Regular expression match on the whole value (REGEXMATCH)
    RegexMatch,
    /// Test of the value's type (ISNUMBER, INT)
    TypeTest,
    /// Numeric comparison against a bound
    Comparison,
    /// Membership in a list (MATCH against a range, or equality with literals)
    Membership,
}

/// How a platform realizes a (type, constraint) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Realization {
    Native(NativeKind),
    Formula(FormulaShape),
    Unsupported,
}

impl Realization {
    /// Check if the constraint can be realized at all
    pub fn is_supported(&self) -> bool {
        !matches!(self, Realization::Unsupported)
    }

    /// Check if the constraint is realized by a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, Realization::Formula(_))
    }
}

/// Unit in which a platform measures column widths
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidthUnit {
    /// Widths in characters of the default font
    Characters,
    /// Widths in pixels
    Pixels {
        /// Pixels per character of the default font
        per_char: f64,
    },
}

const BLANK: Realization = Realization::Native(NativeKind::RejectBlank);
const RANGE: Realization = Realization::Native(NativeKind::NumberRange);
const INLINE: Realization = Realization::Native(NativeKind::InlineList);
const LIST: Realization = Realization::Native(NativeKind::RangeList);
const COUNT: Realization = Realization::Formula(FormulaShape::CountMatches {
    case_sensitive: false,
});
const EXACT: Realization = Realization::Formula(FormulaShape::CountMatches {
    case_sensitive: true,
});
const LEN: Realization = Realization::Formula(FormulaShape::TextLength);
const REGEX: Realization = Realization::Formula(FormulaShape::RegexMatch);
const NONE: Realization = Realization::Unsupported;

/// Per-platform capabilities and limits
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityProfile {
    /// Platform described by this profile
    pub platform: Platform,
    /// Maximum rows per sheet
    pub max_rows: u32,
    /// Maximum columns per sheet
    pub max_cols: u32,
    /// Maximum sheet name length, in characters
    pub max_sheet_name_len: usize,
    /// Characters not allowed in sheet names
    pub forbidden_sheet_chars: &'static [char],
    /// Maximum length of a data-validation formula
    pub max_formula_len: Option<usize>,
    /// Maximum length of an inline list (values joined by commas)
    pub max_inline_list_len: Option<usize>,
    /// Formulas must reach other sheets through `INDIRECT`
    pub indirect_cross_sheet: bool,
    /// Unit of column widths
    pub width_unit: WidthUnit,
    /// Default comment box size (characters wide, lines tall)
    pub comment_box: (f64, f64),
    /// Realization of the implicit TRUE/FALSE list of boolean fields
    pub boolean_list: Realization,
    /// Columns under a header comment can be hidden
    pub hide_commented_columns: bool,
    /// Realizations, indexed by field type then constraint
    table: [[Realization; 9]; 4],
}

static EXCEL: CapabilityProfile = CapabilityProfile {
    platform: Platform::Excel,
    max_rows: 1_048_576,
    max_cols: 16_384,
    max_sheet_name_len: 31,
    forbidden_sheet_chars: &['[', ']', ':', '*', '?', '/', '\\'],
    max_formula_len: Some(255),
    max_inline_list_len: Some(255),
    indirect_cross_sheet: false,
    width_unit: WidthUnit::Characters,
    comment_box: (18.0, 4.0),
    boolean_list: INLINE,
    hide_commented_columns: false,
    table: [
        // required unique minimum maximum minLength maxLength pattern enum foreignKey
        [BLANK, EXACT, NONE, NONE, LEN, LEN, NONE, INLINE, LIST], // string
        [BLANK, COUNT, RANGE, RANGE, NONE, NONE, NONE, INLINE, LIST], // integer
        [BLANK, COUNT, RANGE, RANGE, NONE, NONE, NONE, INLINE, LIST], // number
        [BLANK, COUNT, NONE, NONE, NONE, NONE, NONE, INLINE, LIST], // boolean
    ],
};

static GOOGLE_SHEETS: CapabilityProfile = CapabilityProfile {
    platform: Platform::GoogleSheets,
    max_rows: 10_000_000,
    max_cols: 18_278,
    max_sheet_name_len: 100,
    forbidden_sheet_chars: &[],
    max_formula_len: None,
    max_inline_list_len: None,
    indirect_cross_sheet: true,
    width_unit: WidthUnit::Pixels { per_char: 7.7 },
    comment_box: (18.0, 4.0),
    boolean_list: INLINE,
    hide_commented_columns: true,
    table: [
        // required unique minimum maximum minLength maxLength pattern enum foreignKey
        [BLANK, EXACT, NONE, NONE, LEN, LEN, REGEX, LIST, LIST], // string
        [BLANK, COUNT, RANGE, RANGE, NONE, NONE, NONE, LIST, LIST], // integer
        [BLANK, COUNT, RANGE, RANGE, NONE, NONE, NONE, LIST, LIST], // number
        [BLANK, COUNT, NONE, NONE, NONE, NONE, NONE, LIST, LIST], // boolean
    ],
};

impl CapabilityProfile {
    /// Get the profile of a platform
    pub fn for_platform(platform: Platform) -> &'static CapabilityProfile {
        match platform {
            Platform::Excel => &EXCEL,
            Platform::GoogleSheets => &GOOGLE_SHEETS,
        }
    }

    /// How this platform realizes `constraint` on a field of type `field_type`
    pub fn resolve(&self, field_type: FieldType, constraint: ConstraintKind) -> Realization {
        let row = match field_type {
            FieldType::String => 0,
            FieldType::Integer => 1,
            FieldType::Number => 2,
            FieldType::Boolean => 3,
        };
        self.table[row][constraint.index()]
    }

    /// Check a sheet name against the platform's naming rules
    ///
    /// Returns the reason the name is rejected, if any.
    pub fn check_sheet_name(&self, name: &str) -> Option<String> {
        if name.trim().is_empty() {
            return Some("name is empty".into());
        }
        let len = name.chars().count();
        if len > self.max_sheet_name_len {
            return Some(format!(
                "{} characters (max: {})",
                len, self.max_sheet_name_len
            ));
        }
        name.chars()
            .find(|c| self.forbidden_sheet_chars.contains(c))
            .map(|c| format!("character '{}' is not allowed", c))
    }
}
