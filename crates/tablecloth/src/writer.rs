//! Sheet writer seam
//!
//! The compiler never touches a workbook. A [`SheetWriter`] receives the
//! compiled package as a sequence of calls, and [`emit`] replays a
//! [`CompiledPackage`] onto one in write order:
//!
//! 1. the hidden enum list sheet, if any
//! 2. each table sheet in dependency order: declaration, header cells,
//!    column widths, frozen panes, hidden columns, validation rules, then
//!    highlights
//!
//! [`RecordingWriter`] keeps every call in memory.

use std::convert::Infallible;
use std::ops::RangeInclusive;

use tablecloth_compiler::{CompiledPackage, FreezePanes, HeaderCell};
use tablecloth_core::{CellAddress, CellFormat, CellRange, ValidationRule, Value};

/// Destination of a compiled package (workbook file, remote document, ...)
pub trait SheetWriter {
    /// Error raised by the destination
    type Error;

    /// Create a sheet
    fn declare_sheet(&mut self, name: &str, hidden: bool) -> Result<(), Self::Error>;

    /// Write a header cell and its comment
    fn write_header(
        &mut self,
        sheet: &str,
        cell: &HeaderCell,
        format: Option<&CellFormat>,
    ) -> Result<(), Self::Error>;

    /// Write values down a column, starting at `first_row`
    fn write_values(
        &mut self,
        sheet: &str,
        column: u16,
        first_row: u32,
        values: &[Value],
    ) -> Result<(), Self::Error>;

    /// Set a column's minimum width, in the platform's unit
    fn set_column_width(&mut self, sheet: &str, column: u16, width: f64)
        -> Result<(), Self::Error>;

    /// Freeze the top-left pane
    fn freeze_panes(&mut self, sheet: &str, panes: FreezePanes) -> Result<(), Self::Error>;

    /// Hide a span of columns
    fn hide_columns(&mut self, sheet: &str, columns: RangeInclusive<u16>)
        -> Result<(), Self::Error>;

    /// Apply a data-validation rule to a range
    fn add_validation(
        &mut self,
        sheet: &str,
        range: &CellRange,
        rule: &ValidationRule,
    ) -> Result<(), Self::Error>;

    /// Apply `format` to the cells of `range` where `formula` is TRUE
    fn add_highlight(
        &mut self,
        sheet: &str,
        range: &CellRange,
        formula: &str,
        format: &CellFormat,
    ) -> Result<(), Self::Error>;
}

/// Write a compiled package to `writer`
///
/// Stops at the first writer error.
pub fn emit<W: SheetWriter>(package: &CompiledPackage, writer: &mut W) -> Result<(), W::Error> {
    if let Some(lists) = &package.enum_sheet {
        writer.declare_sheet(&lists.name, true)?;
        for (column, values) in lists.columns.iter().enumerate() {
            writer.write_values(&lists.name, column as u16, 0, values)?;
        }
    }

    for sheet in &package.sheets {
        let layout = &sheet.layout;
        let name = layout.sheet.as_str();

        writer.declare_sheet(name, false)?;
        for cell in &layout.header_cells {
            writer.write_header(name, cell, layout.header_format.as_ref())?;
        }
        for column in &layout.columns {
            writer.set_column_width(name, column.index, column.width)?;
        }
        if let Some(panes) = layout.freeze {
            writer.freeze_panes(name, panes)?;
        }
        if let Some(columns) = &layout.hidden_columns {
            writer.hide_columns(name, columns.clone())?;
        }
        for column in &sheet.columns {
            if let Some(rule) = &column.rule {
                writer.add_validation(name, &column.range, rule)?;
            }
        }
        for column in &sheet.columns {
            if let Some(formula) = &column.highlight {
                writer.add_highlight(name, &column.range, formula, &package.invalid_format)?;
            }
        }

        tracing::debug!("Emitted sheet '{}' for table '{}'", name, sheet.table);
    }

    Ok(())
}

/// One recorded writer call
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    DeclareSheet {
        name: String,
        hidden: bool,
    },
    Header {
        sheet: String,
        address: CellAddress,
        text: String,
        comment: Option<String>,
        format: Option<CellFormat>,
    },
    Values {
        sheet: String,
        column: u16,
        first_row: u32,
        values: Vec<Value>,
    },
    ColumnWidth {
        sheet: String,
        column: u16,
        width: f64,
    },
    Freeze {
        sheet: String,
        panes: FreezePanes,
    },
    Hide {
        sheet: String,
        columns: RangeInclusive<u16>,
    },
    Validation {
        sheet: String,
        range: CellRange,
        rule: ValidationRule,
    },
    Highlight {
        sheet: String,
        range: CellRange,
        formula: String,
        format: CellFormat,
    },
}

impl WriteOp {
    /// Sheet the call writes to
    pub fn sheet(&self) -> &str {
        match self {
            WriteOp::DeclareSheet { name, .. } => name,
            WriteOp::Header { sheet, .. }
            | WriteOp::Values { sheet, .. }
            | WriteOp::ColumnWidth { sheet, .. }
            | WriteOp::Freeze { sheet, .. }
            | WriteOp::Hide { sheet, .. }
            | WriteOp::Validation { sheet, .. }
            | WriteOp::Highlight { sheet, .. } => sheet,
        }
    }
}

/// A writer that records every call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingWriter {
    pub ops: Vec<WriteOp>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared sheet names, in declaration order
    pub fn sheets(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                WriteOp::DeclareSheet { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Validation rules written to a sheet
    pub fn validations(&self, sheet: &str) -> Vec<(&CellRange, &ValidationRule)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                WriteOp::Validation {
                    sheet: s,
                    range,
                    rule,
                } if s == sheet => Some((range, rule)),
                _ => None,
            })
            .collect()
    }

    /// Highlight formulas written to a sheet
    pub fn highlights(&self, sheet: &str) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                WriteOp::Highlight {
                    sheet: s, formula, ..
                } if s == sheet => Some(formula.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl SheetWriter for RecordingWriter {
    type Error = Infallible;

    fn declare_sheet(&mut self, name: &str, hidden: bool) -> Result<(), Self::Error> {
        self.ops.push(WriteOp::DeclareSheet {
            name: name.to_string(),
            hidden,
        });
        Ok(())
    }

    fn write_header(
        &mut self,
        sheet: &str,
        cell: &HeaderCell,
        format: Option<&CellFormat>,
    ) -> Result<(), Self::Error> {
        self.ops.push(WriteOp::Header {
            sheet: sheet.to_string(),
            address: cell.address,
            text: cell.text.clone(),
            comment: cell.comment.as_ref().map(|c| c.text.clone()),
            format: format.copied(),
        });
        Ok(())
    }

    fn write_values(
        &mut self,
        sheet: &str,
        column: u16,
        first_row: u32,
        values: &[Value],
    ) -> Result<(), Self::Error> {
        self.ops.push(WriteOp::Values {
            sheet: sheet.to_string(),
            column,
            first_row,
            values: values.to_vec(),
        });
        Ok(())
    }

    fn set_column_width(
        &mut self,
        sheet: &str,
        column: u16,
        width: f64,
    ) -> Result<(), Self::Error> {
        self.ops.push(WriteOp::ColumnWidth {
            sheet: sheet.to_string(),
            column,
            width,
        });
        Ok(())
    }

    fn freeze_panes(&mut self, sheet: &str, panes: FreezePanes) -> Result<(), Self::Error> {
        self.ops.push(WriteOp::Freeze {
            sheet: sheet.to_string(),
            panes,
        });
        Ok(())
    }

    fn hide_columns(
        &mut self,
        sheet: &str,
        columns: RangeInclusive<u16>,
    ) -> Result<(), Self::Error> {
        self.ops.push(WriteOp::Hide {
            sheet: sheet.to_string(),
            columns,
        });
        Ok(())
    }

    fn add_validation(
        &mut self,
        sheet: &str,
        range: &CellRange,
        rule: &ValidationRule,
    ) -> Result<(), Self::Error> {
        self.ops.push(WriteOp::Validation {
            sheet: sheet.to_string(),
            range: *range,
            rule: rule.clone(),
        });
        Ok(())
    }

    fn add_highlight(
        &mut self,
        sheet: &str,
        range: &CellRange,
        formula: &str,
        format: &CellFormat,
    ) -> Result<(), Self::Error> {
        self.ops.push(WriteOp::Highlight {
            sheet: sheet.to_string(),
            range: *range,
            formula: formula.to_string(),
            format: *format,
        });
        Ok(())
    }
}
