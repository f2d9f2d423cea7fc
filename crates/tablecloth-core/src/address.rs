//! Cell addresses and ranges in A1 notation
//!
//! The compiler only ever formats references: column letters for the
//! fields it lays out, `$`-fixed ranges for lookups and sheet-qualified
//! ranges for lists living on another sheet.

use std::fmt;

/// A cell address (`B2`, `$A$2`, `$A2`)
///
/// Row and column are 0-based; each may be fixed with `$` so that it stays put
/// when a formula is applied down a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Row index (0-based, displayed 1-based)
    pub row: u32,
    /// Column index (A = 0)
    pub col: u16,
    /// Whether the row is fixed (`$`)
    pub row_absolute: bool,
    /// Whether the column is fixed (`$`)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a relative address
    pub fn new(row: u32, col: u16) -> Self {
        Self::with_absolute(row, col, false, false)
    }

    /// Create an address with explicit `$` flags
    pub fn with_absolute(row: u32, col: u16, row_absolute: bool, col_absolute: bool) -> Self {
        Self {
            row,
            col,
            row_absolute,
            col_absolute,
        }
    }

    /// Column letters of a 0-based column index (0 = A, 25 = Z, 26 = AA)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::new();
        let mut n = col as u32 + 1;
        while n > 0 {
            n -= 1;
            letters.push(b'A' + (n % 26) as u8);
            n /= 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// Format as A1 text
    pub fn to_a1_string(&self) -> String {
        format!(
            "{}{}{}{}",
            if self.col_absolute { "$" } else { "" },
            Self::column_to_letters(self.col),
            if self.row_absolute { "$" } else { "" },
            self.row + 1
        )
    }

    /// Copy with both row and column fixed
    pub fn fixed(&self) -> Self {
        Self::with_absolute(self.row, self.col, true, true)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

/// A rectangular range, top-left to bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// `rows` cells of one column, starting at `first_row` (at least one cell)
    pub fn column(col: u16, first_row: u32, rows: u32) -> Self {
        Self {
            start: CellAddress::new(first_row, col),
            end: CellAddress::new(first_row + rows.max(1) - 1, col),
        }
    }

    /// Copy with every reference fixed (`$A$2:$A$10`)
    pub fn fixed(&self) -> Self {
        Self {
            start: self.start.fixed(),
            end: self.end.fixed(),
        }
    }

    /// Format as A1 text; a single cell is written without `:`
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }

    /// Sheet-qualified reference (`'Sheet 1'!$A$2:$A$10`)
    pub fn to_sheet_string(&self, sheet: &str) -> String {
        format!("{}!{}", quote_sheet_name(sheet), self.to_a1_string())
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

/// Quote a sheet name for use in a reference, doubling embedded quotes
///
/// ```
/// use tablecloth_core::address::quote_sheet_name;
///
/// assert_eq!(quote_sheet_name("Sheet1"), "'Sheet1'");
/// assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
/// ```
pub fn quote_sheet_name(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(702), "AAA");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_mixed_references() {
        assert_eq!(CellAddress::new(1, 1).to_a1_string(), "B2");
        assert_eq!(CellAddress::with_absolute(1, 0, false, true).to_string(), "$A2");
        assert_eq!(CellAddress::new(1, 0).fixed().to_string(), "$A$2");
    }

    #[test]
    fn test_column_range() {
        let range = CellRange::column(0, 1, 1);
        assert_eq!(range.to_string(), "A2");
        assert_eq!(range.fixed().to_string(), "$A$2");

        let range = CellRange::column(0, 1, 2);
        assert_eq!(range.to_string(), "A2:A3");
        assert_eq!(range.fixed().to_string(), "$A$2:$A$3");

        // Zero rows still cover one cell
        assert_eq!(CellRange::column(2, 1, 0).to_string(), "C2");
    }

    #[test]
    fn test_sheet_string() {
        let range = CellRange::column(0, 1, 2).fixed();
        assert_eq!(range.to_sheet_string("Sheet1"), "'Sheet1'!$A$2:$A$3");
        assert_eq!(range.to_sheet_string("it's"), "'it''s'!$A$2:$A$3");
    }
}
