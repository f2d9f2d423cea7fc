//! Layout engine
//!
//! Places a table on its sheet: one column per field in field order, a header
//! row with optional comments, a fixed number of data rows below it, frozen
//! panes and minimum column widths.

use std::ops::RangeInclusive;

use tablecloth_core::{
    CapabilityProfile, CellAddress, CellFormat, CellRange, HeaderComment, LookupRange, RowSpan,
    Table, Value, WidthUnit,
};
use unicode_width::UnicodeWidthStr;

use crate::options::CompileOptions;

/// Narrowest column, in characters
const MIN_WIDTH: f64 = 10.0;

/// Column width per character of content
const WIDTH_PER_CHAR: f64 = 1.2;

/// Frozen rows and columns (top-left pane)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezePanes {
    /// Number of frozen rows
    pub row: u32,
    /// Number of frozen columns
    pub col: u16,
}

/// Position of one field on its sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Field name
    pub field: String,
    /// Column index (0-based)
    pub index: u16,
    /// Header cell
    pub header: CellAddress,
    /// Data cells below the header
    pub data: CellRange,
    /// Minimum width, in the platform's unit
    pub width: f64,
}

impl ColumnLayout {
    /// Column letters (A, B, ..., AA, ...)
    pub fn letters(&self) -> String {
        CellAddress::column_to_letters(self.index)
    }

    /// First data cell
    pub fn first_cell(&self) -> CellAddress {
        self.data.start
    }
}

/// A header cell and its comment
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub address: CellAddress,
    pub text: String,
    pub comment: Option<HeaderComment>,
}

/// Layout of one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    /// Table name
    pub table: String,
    /// Sheet the table is written to
    pub sheet: String,
    /// Columns, in field order
    pub columns: Vec<ColumnLayout>,
    /// Header cells, in field order
    pub header_cells: Vec<HeaderCell>,
    /// Format of the header cells
    pub header_format: Option<CellFormat>,
    /// Header cells carrying a comment
    pub comment_cells: Vec<CellAddress>,
    /// Frozen panes, if any
    pub freeze: Option<FreezePanes>,
    /// Data rows below the header
    pub data_rows: RowSpan,
    /// Unused columns right of the table to hide
    pub hidden_columns: Option<RangeInclusive<u16>>,
}

impl TableLayout {
    /// Get the column of a field
    pub fn column(&self, field: &str) -> Option<&ColumnLayout> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Lookup range over a field's data rows
    pub fn lookup(&self, field: &str) -> Option<LookupRange> {
        self.column(field)
            .map(|c| LookupRange::new(self.sheet.clone(), c.index, self.data_rows))
    }

    /// The table's columns on the first data row, with fixed columns and a
    /// relative row (`$A2:$C2`)
    pub fn row_range(&self) -> String {
        match (self.columns.first(), self.columns.last()) {
            (Some(first), Some(last)) => {
                let row = self.data_rows.first;
                let start = CellAddress::with_absolute(row, first.index, false, true);
                let end = CellAddress::with_absolute(row, last.index, false, true);
                CellRange { start, end }.to_a1_string()
            }
            _ => String::new(),
        }
    }
}

/// Lays tables out on their sheets
#[derive(Debug, Clone)]
pub struct LayoutEngine<'a> {
    options: &'a CompileOptions,
    profile: &'static CapabilityProfile,
}

impl<'a> LayoutEngine<'a> {
    /// Create a layout engine
    pub fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            profile: options.profile(),
        }
    }

    /// Lay out `table` with its header at `start_row` and first field at `start_col`
    pub fn layout(&self, table: &Table, start_row: u32, start_col: u16) -> TableLayout {
        let data_rows = RowSpan::new(start_row + 1, self.options.provisioned_rows());
        let mut columns = Vec::with_capacity(table.fields.len());
        let mut header_cells = Vec::with_capacity(table.fields.len());
        let mut comment_cells = Vec::new();

        for (i, field) in table.fields.iter().enumerate() {
            let index = start_col.saturating_add(i as u16);
            let header = CellAddress::new(start_row, index);

            let text = self
                .options
                .header_comment(&table.name, &field.name)
                .or(field.description.as_deref())
                .filter(|text| !text.trim().is_empty());
            let comment = text.map(|text| HeaderComment::sized(text, self.profile.comment_box));
            if comment.is_some() {
                comment_cells.push(header);
            }

            let enum_values = field.constraints.enumeration.as_deref().unwrap_or(&[]);
            columns.push(ColumnLayout {
                field: field.name.clone(),
                index,
                header,
                data: CellRange::column(index, data_rows.first, data_rows.count),
                width: column_width(&field.name, enum_values, self.profile.width_unit),
            });
            header_cells.push(HeaderCell {
                address: header,
                text: field.name.clone(),
                comment,
            });
        }

        let freeze = FreezePanes {
            row: if self.options.freeze_header { start_row + 1 } else { 0 },
            col: if self.options.freeze_first_column && !table.fields.is_empty() {
                start_col + 1
            } else {
                0
            },
        };

        let hidden_columns =
            self.hidden_columns(start_col, columns.len(), !comment_cells.is_empty());

        tracing::debug!(
            "Laid out table '{}' on sheet '{}': {} columns, rows {}..={}",
            table.name,
            table.sheet_name(),
            columns.len(),
            data_rows.first + 1,
            data_rows.last() + 1
        );

        TableLayout {
            table: table.name.clone(),
            sheet: table.sheet_name().to_string(),
            columns,
            header_cells,
            header_format: self.options.header_format,
            comment_cells,
            freeze: (freeze.row > 0 || freeze.col > 0).then_some(freeze),
            data_rows,
            hidden_columns,
        }
    }

    /// Columns from the one after the table's last to the sheet's last
    fn hidden_columns(
        &self,
        start_col: u16,
        fields: usize,
        commented: bool,
    ) -> Option<RangeInclusive<u16>> {
        if !self.options.hide_columns || fields == 0 {
            return None;
        }
        // Hidden columns would cover the enlarged comment boxes
        if commented && !self.profile.hide_commented_columns {
            tracing::debug!("Not hiding columns under header comments");
            return None;
        }
        let first = start_col as u32 + fields as u32;
        let last = self.profile.max_cols.saturating_sub(1).min(u16::MAX as u32);
        (first <= last).then(|| first as u16..=last as u16)
    }
}

/// Minimum width of a column showing `header` and, possibly, `values`
///
/// `max(10, 1.2 × widest text)` characters, converted to the platform's unit.
pub fn column_width(header: &str, values: &[Value], unit: WidthUnit) -> f64 {
    let widest = values
        .iter()
        .map(|v| UnicodeWidthStr::width(v.to_string().as_str()))
        .chain(std::iter::once(UnicodeWidthStr::width(header)))
        .max()
        .unwrap_or(0);
    let chars = MIN_WIDTH.max(widest as f64 * WIDTH_PER_CHAR);
    match unit {
        WidthUnit::Characters => chars,
        WidthUnit::Pixels { per_char } => chars * per_char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tablecloth_core::{Field, FieldType, Platform};

    fn table() -> Table {
        Table::new("main")
            .with_field(Field::new("id", FieldType::Integer).described("Identifier"))
            .with_field(Field::new("name", FieldType::String))
            .with_field(
                Field::new("kind", FieldType::String)
                    .enumeration(["a", "a very long enumerated value"]),
            )
    }

    #[test]
    fn test_columns_follow_field_order() {
        let options = CompileOptions::default();
        let layout = LayoutEngine::new(&options).layout(&table(), 0, 0);

        assert_eq!(layout.sheet, "main");
        let letters: Vec<String> = layout.columns.iter().map(ColumnLayout::letters).collect();
        assert_eq!(letters, vec!["A", "B", "C"]);
        assert_eq!(layout.columns[1].data.to_a1_string(), "B2:B1001");
        assert_eq!(layout.data_rows, RowSpan::new(1, 1000));
        assert_eq!(layout.row_range(), "$A2:$C2");
    }

    #[test]
    fn test_offset_start() {
        let options = CompileOptions::default().with_data_rows(10);
        let layout = LayoutEngine::new(&options).layout(&table(), 2, 1);

        assert_eq!(layout.columns[0].header.to_a1_string(), "B3");
        assert_eq!(layout.columns[0].data.to_a1_string(), "B4:B13");
        assert_eq!(layout.freeze, Some(FreezePanes { row: 3, col: 0 }));
        assert_eq!(
            layout.lookup("name"),
            Some(LookupRange::new("main", 2, RowSpan::new(3, 10)))
        );
    }

    #[test]
    fn test_comments() {
        let options = CompileOptions::default().with_header_comment("main", "name", "Full name");
        let layout = LayoutEngine::new(&options).layout(&table(), 0, 0);

        assert_eq!(
            layout.comment_cells,
            vec![CellAddress::new(0, 0), CellAddress::new(0, 1)]
        );
        let texts: Vec<Option<&str>> = layout
            .header_cells
            .iter()
            .map(|h| h.comment.as_ref().map(|c| c.text.as_str()))
            .collect();
        assert_eq!(texts, vec![Some("Identifier"), Some("Full name"), None]);
    }

    #[test]
    fn test_freeze() {
        let options = CompileOptions::default().with_freeze(false, false);
        assert_eq!(LayoutEngine::new(&options).layout(&table(), 0, 0).freeze, None);

        let options = CompileOptions::default().with_freeze(true, true);
        assert_eq!(
            LayoutEngine::new(&options).layout(&table(), 0, 0).freeze,
            Some(FreezePanes { row: 1, col: 1 })
        );
    }

    #[test]
    fn test_widths() {
        assert_eq!(column_width("id", &[], WidthUnit::Characters), 10.0);
        assert_eq!(column_width(&"x".repeat(20), &[], WidthUnit::Characters), 24.0);
        assert_eq!(
            column_width("id", &[Value::from("y".repeat(20))], WidthUnit::Characters),
            24.0
        );
        assert_eq!(
            column_width("id", &[], WidthUnit::Pixels { per_char: 7.7 }),
            77.0
        );

        let options = CompileOptions::new(Platform::GoogleSheets);
        let layout = LayoutEngine::new(&options).layout(&table(), 0, 0);
        assert!(layout.columns[2].width > layout.columns[1].width);
    }

    #[test]
    fn test_header_format() {
        let options = CompileOptions::default();
        let layout = LayoutEngine::new(&options).layout(&table(), 0, 0);
        assert_eq!(layout.header_format, Some(CellFormat::header()));

        let options = CompileOptions::default().with_header_format(None);
        assert_eq!(LayoutEngine::new(&options).layout(&table(), 0, 0).header_format, None);
    }

    #[test]
    fn test_hidden_columns() {
        let options = CompileOptions::default();
        assert_eq!(LayoutEngine::new(&options).layout(&table(), 0, 0).hidden_columns, None);

        let plain = Table::new("plain")
            .with_field(Field::new("a", FieldType::String))
            .with_field(Field::new("b", FieldType::String));
        let options = CompileOptions::default().with_hide_columns(true);
        let engine = LayoutEngine::new(&options);
        assert_eq!(engine.layout(&plain, 0, 0).hidden_columns, Some(2..=16_383));
        assert_eq!(engine.layout(&plain, 0, 3).hidden_columns, Some(5..=16_383));

        // Excel keeps the columns under header comments visible
        assert_eq!(engine.layout(&table(), 0, 0).hidden_columns, None);

        let options = CompileOptions::new(Platform::GoogleSheets).with_hide_columns(true);
        assert_eq!(
            LayoutEngine::new(&options).layout(&table(), 0, 0).hidden_columns,
            Some(3..=18_277)
        );
    }

    #[test]
    fn test_layout_is_pure() {
        let options = CompileOptions::default();
        let engine = LayoutEngine::new(&options);
        assert_eq!(engine.layout(&table(), 0, 0), engine.layout(&table(), 0, 0));
    }
}
