//! The styled character cell.
//!
//! A cell is an immutable value: mutating operations replace cells rather
//! than sharing them, so updating the cursor's pending attributes can never
//! retroactively restyle what is already on screen.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::color::Color;

/// A single on-screen cell.
///
/// `data` is the displayed string: usually one code point, possibly a
/// grapheme cluster (base plus combining marks, or an emoji ZWJ sequence).
/// `width` is the number of columns the cell occupies; the trailing column
/// of a double-width glyph holds a zero-width stub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub data: String,
    pub width: u8,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub italics: bool,
    pub underscore: bool,
    pub strikethrough: bool,
    pub reverse: bool,
    pub blink: bool,
}

impl Cell {
    /// The blank cell: a space with default colours and no styling.
    pub fn blank() -> Self {
        Self {
            data: " ".to_string(),
            width: 1,
            fg: Color::Default,
            bg: Color::Default,
            bold: false,
            italics: false,
            underscore: false,
            strikethrough: false,
            reverse: false,
            blink: false,
        }
    }

    /// A copy of this cell restyled with new contents; used to stamp the
    /// cursor's attribute prototype onto drawn glyphs.
    pub fn with_data(&self, data: &str, width: u8) -> Self {
        let mut cell = self.clone();
        cell.data = data.to_string();
        cell.width = width;
        cell
    }

    /// The trailing half of a double-width glyph.
    pub fn stub(&self) -> Self {
        let mut cell = self.clone();
        cell.data = String::new();
        cell.width = 0;
        cell
    }

    pub fn is_stub(&self) -> bool {
        self.width == 0 && self.data.is_empty()
    }

    /// Append a zero-width continuation (combining mark, variation selector,
    /// ZWJ tail) to this cell, deduplicating a doubled joiner when the
    /// continuation arrived in a separate chunk.
    pub fn append_cluster(&mut self, tail: &str) {
        let tail = match tail.strip_prefix('\u{200d}') {
            Some(rest) if self.data.ends_with('\u{200d}') => rest,
            _ => tail,
        };
        self.data.push_str(tail);
        self.width = self.width.max(self.data.width().min(2) as u8).max(1);
    }

    /// True when the cell shows as an unstyled blank.
    pub fn is_blank(&self) -> bool {
        (self.data == " " || self.data.is_empty())
            && self.fg == Color::Default
            && self.bg == Color::Default
            && !self.bold
            && !self.italics
            && !self.underscore
            && !self.strikethrough
            && !self.reverse
            && !self.blink
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cell() {
        let cell = Cell::blank();
        assert_eq!(cell.data, " ");
        assert_eq!(cell.width, 1);
        assert_eq!(cell.fg, Color::Default);
        assert!(!cell.bold);
    }

    #[test]
    fn prototype_stamping() {
        let mut proto = Cell::blank();
        proto.bold = true;
        proto.fg = Color::Indexed(1);

        let cell = proto.with_data("x", 1);
        assert_eq!(cell.data, "x");
        assert!(cell.bold);
        assert_eq!(cell.fg, Color::Indexed(1));
        // The prototype itself is untouched.
        assert_eq!(proto.data, " ");
    }

    #[test]
    fn stub_is_empty_and_zero_width() {
        let stub = Cell::blank().stub();
        assert!(stub.is_stub());
        assert_eq!(stub.width, 0);
    }

    #[test]
    fn append_combining_mark() {
        let mut cell = Cell::blank().with_data("e", 1);
        cell.append_cluster("\u{0301}");
        assert_eq!(cell.data, "e\u{0301}");
        assert_eq!(cell.width, 1);
    }

    #[test]
    fn append_zwj_tail_dedups_joiner() {
        let mut cell = Cell::blank().with_data("👨\u{200d}", 2);
        cell.append_cluster("\u{200d}👩");
        assert_eq!(cell.data, "👨\u{200d}👩");
        assert_eq!(cell.width, 2);
    }

    #[test]
    fn serializes_for_embedders() {
        let mut cell = Cell::blank().with_data("é", 1);
        cell.bold = true;
        cell.fg = Color::Indexed(3);

        let json = serde_json::to_string(&cell).unwrap();
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}
