//! Cell formats
//!
//! Templates format two kinds of cells: the header row, and data cells the
//! invalid-cell highlight flags.
//!
//! ## Example
//!
//! ```rust
//! use tablecloth_core::{CellFormat, Color};
//!
//! let header = CellFormat::header();
//! assert!(header.bold);
//! assert_eq!(header.fill, Color::from_hex("#d3d3d3"));
//!
//! let custom = CellFormat::new().fill_color(Color::rgb(255, 235, 156));
//! assert_eq!(custom.fill.unwrap().to_hex(), "#ffeb9c");
//! ```

use std::fmt;

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse a hex string (`#ffc7ce` or `ffc7ce`)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase hex string with a leading `#`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(hex: String) -> Result<Self, Self::Error> {
        Color::from_hex(&hex).ok_or_else(|| format!("invalid color '{}'", hex))
    }
}

/// Format applied to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CellFormat {
    /// Bold text
    pub bold: bool,
    /// Solid background fill
    pub fill: Option<Color>,
}

impl CellFormat {
    /// Create a plain format
    pub fn new() -> Self {
        Self::default()
    }

    /// Default header format: bold on light grey (`#d3d3d3`)
    pub fn header() -> Self {
        Self::new().bold(true).fill_color(Color::rgb(211, 211, 211))
    }

    /// Default invalid-cell format: light red fill (`#ffc7ce`)
    pub fn invalid() -> Self {
        Self::new().fill_color(Color::rgb(255, 199, 206))
    }

    /// Set bold text
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set a solid background fill
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(Color::from_hex("#ffc7ce"), Some(Color::rgb(255, 199, 206)));
        assert_eq!(Color::from_hex("D3D3D3"), Some(Color::rgb(211, 211, 211)));
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#+fffff"), None);
        assert_eq!(Color::rgb(255, 199, 206).to_string(), "#ffc7ce");
        assert!(Color::try_from("nope".to_string()).is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CellFormat::new(), CellFormat { bold: false, fill: None });
        assert_eq!(
            CellFormat::header(),
            CellFormat {
                bold: true,
                fill: Some(Color::rgb(211, 211, 211))
            }
        );
        assert_eq!(CellFormat::invalid().fill.map(|c| c.to_hex()).as_deref(), Some("#ffc7ce"));
        assert!(!CellFormat::invalid().bold);
    }
}
