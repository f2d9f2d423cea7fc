//! Lookup ranges
//!
//! A [`LookupRange`] is where the permissible values of a list check live:
//! either a column of the hidden enum sheet, or the data rows of the column
//! referenced by a foreign key.

use crate::address::CellRange;

/// A contiguous span of rows (0-based first row, row count)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowSpan {
    /// First row (0-based)
    pub first: u32,
    /// Number of rows
    pub count: u32,
}

impl RowSpan {
    /// Create a row span
    pub fn new(first: u32, count: u32) -> Self {
        Self { first, count }
    }

    /// Last row of the span (0-based, inclusive)
    pub fn last(&self) -> u32 {
        self.first + self.count.max(1) - 1
    }
}

/// Resolved location of the values a list check accepts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupRange {
    /// Sheet holding the values
    pub sheet: String,
    /// Column index (0-based)
    pub column: u16,
    /// Rows holding the values
    pub rows: RowSpan,
}

impl LookupRange {
    /// Create a lookup range
    pub fn new(sheet: impl Into<String>, column: u16, rows: RowSpan) -> Self {
        Self {
            sheet: sheet.into(),
            column,
            rows,
        }
    }

    /// The fixed cell range ($A$2:$A$1001)
    pub fn range(&self) -> CellRange {
        CellRange::column(self.column, self.rows.first, self.rows.count).fixed()
    }

    /// Reference to this range as seen from a formula on `from_sheet`
    ///
    /// Ranges on another sheet are sheet-qualified and, when `indirect` is set,
    /// wrapped in `INDIRECT` (some platforms refuse direct cross-sheet references
    /// in conditional formats).
    ///
    /// ```
    /// use tablecloth_core::{LookupRange, RowSpan};
    ///
    /// let lookup = LookupRange::new("lists", 1, RowSpan::new(0, 3));
    /// assert_eq!(lookup.reference_from("main", false), "'lists'!$B$1:$B$3");
    /// assert_eq!(lookup.reference_from("main", true), "INDIRECT(\"'lists'!$B$1:$B$3\")");
    /// assert_eq!(lookup.reference_from("lists", true), "$B$1:$B$3");
    /// ```
    pub fn reference_from(&self, from_sheet: &str, indirect: bool) -> String {
        if from_sheet == self.sheet {
            return self.range().to_a1_string();
        }
        let qualified = self.range().to_sheet_string(&self.sheet);
        if indirect {
            format!("INDIRECT(\"{}\")", qualified.replace('"', "\"\""))
        } else {
            qualified
        }
    }

    /// Sheet-qualified reference, regardless of where it is used from
    pub fn qualified(&self) -> String {
        self.range().to_sheet_string(&self.sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_span() {
        let span = RowSpan::new(1, 1000);
        assert_eq!(span.last(), 1000);
        assert_eq!(RowSpan::new(0, 1).last(), 0);
    }

    #[test]
    fn test_same_sheet_reference_is_unqualified() {
        let lookup = LookupRange::new("main", 0, RowSpan::new(1, 1000));
        assert_eq!(lookup.reference_from("main", false), "$A$2:$A$1001");
        assert_eq!(lookup.qualified(), "'main'!$A$2:$A$1001");
    }

    #[test]
    fn test_cross_sheet_reference() {
        let lookup = LookupRange::new("main", 2, RowSpan::new(1, 10));
        assert_eq!(lookup.reference_from("other", false), "'main'!$C$2:$C$11");
    }
}
