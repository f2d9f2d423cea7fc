//! Compile options
//!
//! Everything that affects a compilation is passed explicitly through
//! [`CompileOptions`]; the compiler keeps no global state.

use std::collections::BTreeMap;

use tablecloth_core::{CapabilityProfile, CellFormat, Error, ErrorStyle, Platform, Result};

/// Number of empty data rows provisioned below each header by default
pub const DEFAULT_DATA_ROWS: u32 = 1000;

/// Default name of the hidden sheet holding enum lists
pub const DEFAULT_ENUM_SHEET: &str = "lists";

/// How declared constraints the platform cannot realize are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Mode {
    /// Fail the compilation (default)
    #[default]
    Strict,
    /// Skip the constraint and record a warning
    BestEffort,
}

/// Options for compiling a package
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct CompileOptions {
    /// Target platform (selects the capability profile)
    pub platform: Platform,
    /// Handling of unsupported constraints
    pub mode: Mode,
    /// Number of empty data rows below each header (default: 1000)
    pub data_rows: u32,
    /// Row of the header (0-based)
    pub start_row: u32,
    /// Column of the first field (0-based)
    pub start_col: u16,
    /// Name of the hidden sheet holding enum lists (default: "lists")
    pub enum_sheet: String,
    /// Header comments by table and field name, overriding field descriptions
    pub header_comments: BTreeMap<String, BTreeMap<String, String>>,
    /// Freeze the header row
    pub freeze_header: bool,
    /// Freeze the first field column
    pub freeze_first_column: bool,
    /// Realize list checks as dropdowns
    pub dropdowns: bool,
    /// Reject values missing from a foreign key's referenced column
    pub validate_foreign_keys: bool,
    /// Alert style of data-validation rules
    pub error_style: ErrorStyle,
    /// Add a conditional format highlighting invalid cells
    pub highlight_invalid: bool,
    /// Format of header cells; `None` leaves them plain
    pub header_format: Option<CellFormat>,
    /// Format the highlight applies to invalid cells
    pub invalid_format: CellFormat,
    /// Hide the unused columns right of each table
    pub hide_columns: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            platform: Platform::Excel,
            mode: Mode::Strict,
            data_rows: DEFAULT_DATA_ROWS,
            start_row: 0,
            start_col: 0,
            enum_sheet: DEFAULT_ENUM_SHEET.to_string(),
            header_comments: BTreeMap::new(),
            freeze_header: true,
            freeze_first_column: false,
            dropdowns: true,
            validate_foreign_keys: true,
            error_style: ErrorStyle::Stop,
            highlight_invalid: true,
            header_format: Some(CellFormat::header()),
            invalid_format: CellFormat::invalid(),
            hide_columns: false,
        }
    }
}

impl CompileOptions {
    /// Create default options for a platform
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            ..Self::default()
        }
    }

    /// Capability profile of the target platform
    pub fn profile(&self) -> &'static CapabilityProfile {
        CapabilityProfile::for_platform(self.platform)
    }

    /// Set the handling of unsupported constraints
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Skip unsupported constraints with a warning instead of failing
    pub fn best_effort(self) -> Self {
        self.with_mode(Mode::BestEffort)
    }

    /// Set the number of data rows below each header
    pub fn with_data_rows(mut self, rows: u32) -> Self {
        self.data_rows = rows;
        self
    }

    /// Set where each table starts (header row, first column)
    pub fn with_start(mut self, row: u32, col: u16) -> Self {
        self.start_row = row;
        self.start_col = col;
        self
    }

    /// Set the name of the enum sheet
    pub fn with_enum_sheet(mut self, name: impl Into<String>) -> Self {
        self.enum_sheet = name.into();
        self
    }

    /// Set the header comment of a field, overriding its description
    pub fn with_header_comment(
        mut self,
        table: impl Into<String>,
        field: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.header_comments
            .entry(table.into())
            .or_default()
            .insert(field.into(), text.into());
        self
    }

    /// Set which panes are frozen
    pub fn with_freeze(mut self, header: bool, first_column: bool) -> Self {
        self.freeze_header = header;
        self.freeze_first_column = first_column;
        self
    }

    /// Set whether list checks are realized as dropdowns
    pub fn with_dropdowns(mut self, dropdowns: bool) -> Self {
        self.dropdowns = dropdowns;
        self
    }

    /// Set whether foreign keys reject unknown values
    pub fn with_validate_foreign_keys(mut self, validate: bool) -> Self {
        self.validate_foreign_keys = validate;
        self
    }

    /// Set the alert style of data-validation rules
    pub fn with_error_style(mut self, style: ErrorStyle) -> Self {
        self.error_style = style;
        self
    }

    /// Set whether invalid cells are highlighted
    pub fn with_highlight_invalid(mut self, highlight: bool) -> Self {
        self.highlight_invalid = highlight;
        self
    }

    /// Set the header format (`None` for plain headers)
    pub fn with_header_format(mut self, format: Option<CellFormat>) -> Self {
        self.header_format = format;
        self
    }

    /// Set the format of highlighted invalid cells
    pub fn with_invalid_format(mut self, format: CellFormat) -> Self {
        self.invalid_format = format;
        self
    }

    /// Set whether unused columns are hidden
    pub fn with_hide_columns(mut self, hide: bool) -> Self {
        self.hide_columns = hide;
        self
    }

    /// Header comment override for a field, if any
    pub fn header_comment(&self, table: &str, field: &str) -> Option<&str> {
        self.header_comments
            .get(table)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    /// Number of data rows actually provisioned (at least one)
    pub fn provisioned_rows(&self) -> u32 {
        self.data_rows.max(1)
    }

    /// Check that the header and data rows fit on a sheet of the platform
    pub fn check_rows(&self) -> Result<()> {
        let profile = self.profile();
        let needed = self.start_row as u64 + 1 + self.provisioned_rows() as u64;
        if needed > profile.max_rows as u64 {
            return Err(Error::TooManyRows {
                needed,
                max: profile.max_rows,
                platform: self.platform,
            });
        }
        Ok(())
    }
}
