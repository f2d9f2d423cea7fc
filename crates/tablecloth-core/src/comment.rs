//! Header comments (notes)
//!
//! Each header cell may carry a comment, usually the field description. The
//! platforms open comments in a fixed-size box and clip whatever does not fit,
//! so the box is sized from the text.
//!
//! ## Example
//!
//! ```rust
//! use tablecloth_core::HeaderComment;
//!
//! let comment = HeaderComment::sized("Unique sample identifier", (18.0, 4.0));
//! assert!(comment.width >= 18.0);
//! assert_eq!(comment.x_scale, comment.width / 18.0);
//! ```

use unicode_width::UnicodeWidthStr;

/// Boxes grow wider than tall
const ASPECT: f64 = 4.0;

/// A comment attached to a header cell
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderComment {
    /// Comment text content
    pub text: String,
    /// Box width, in characters
    pub width: f64,
    /// Box height, in lines
    pub lines: f64,
    /// Width relative to the platform's default box
    pub x_scale: f64,
    /// Height relative to the platform's default box
    pub y_scale: f64,
}

impl HeaderComment {
    /// Create a comment sized to fit its text
    ///
    /// `default_box` is the platform's default box size (characters wide,
    /// lines tall). The box never shrinks below it.
    pub fn sized(text: impl Into<String>, default_box: (f64, f64)) -> Self {
        let text = text.into();
        let (default_width, default_lines) = default_box;
        let width = (comment_width(&text) as f64).max(default_width);
        let lines = (wrapped_lines(&text, width as usize) as f64).max(default_lines);
        Self {
            x_scale: width / default_width,
            y_scale: lines / default_lines,
            text,
            width,
            lines,
        }
    }
}

impl std::fmt::Display for HeaderComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Minimum comment width (in characters) that avoids clipping `text`
///
/// The box is at least as wide as the longest word and grows with the square
/// root of the text width. Appending text never narrows it.
pub fn comment_width(text: &str) -> usize {
    let longest_word = text
        .split_whitespace()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0);
    let total = UnicodeWidthStr::width(text) as f64;
    let balanced = (total * ASPECT).sqrt().ceil() as usize;
    longest_word.max(balanced)
}

/// Number of lines `text` wraps to in a box `width` characters wide
pub fn wrapped_lines(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.lines()
        .map(|line| {
            let mut lines = 1;
            let mut used = 0;
            for word in line.split_whitespace() {
                let w = UnicodeWidthStr::width(word);
                if used == 0 {
                    used = w;
                } else if used + 1 + w <= width {
                    used += 1 + w;
                } else {
                    lines += 1;
                    used = w;
                }
            }
            lines
        })
        .sum::<usize>()
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_fits_longest_word() {
        let word = "supercalifragilisticexpialidocious";
        assert!(comment_width(word) >= word.len());
        assert!(comment_width(&format!("a {} b", word)) >= word.len());
    }

    #[test]
    fn test_width_is_monotonic() {
        let mut text = String::new();
        let mut last = 0;
        for i in 0..200 {
            text.push_str(if i % 3 == 0 { "lorem " } else { "ipsum dolor " });
            let width = comment_width(&text);
            assert!(width >= last);
            last = width;
        }
    }

    #[test]
    fn test_wide_characters() {
        // Full-width characters count double
        assert_eq!(comment_width("テスト"), 6);
    }

    #[test]
    fn test_wrapped_lines() {
        assert_eq!(wrapped_lines("", 10), 1);
        assert_eq!(wrapped_lines("one two", 10), 1);
        assert_eq!(wrapped_lines("one two three", 7), 2);
        assert_eq!(wrapped_lines("one\ntwo", 10), 2);
    }

    #[test]
    fn test_sized_never_shrinks_below_default() {
        let comment = HeaderComment::sized("id", (18.0, 4.0));
        assert_eq!(comment.width, 18.0);
        assert_eq!(comment.lines, 4.0);
        assert_eq!(comment.x_scale, 1.0);
        assert_eq!(comment.y_scale, 1.0);
    }

    #[test]
    fn test_sized_grows_with_text() {
        let text = "word ".repeat(200);
        let comment = HeaderComment::sized(text.trim(), (18.0, 4.0));
        assert!(comment.width > 18.0);
        assert!(comment.lines > 4.0);
        assert!(comment.x_scale > 1.0);
        assert!(comment.y_scale > 1.0);
    }
}
