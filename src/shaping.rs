//! Text shaping for workspace labels.
//!
//! The bar draws names with a fixed-width core font addressed by 16-bit
//! code points, so a label is stored both as UCS-2 code units and as a
//! predicted pixel width.  [`CellShaper`] is the default
//! [`TextShaper`](crate::traits::TextShaper).

use crate::traits::TextShaper;
use unicode_width::UnicodeWidthChar;

/// Code unit substituted for characters outside the Basic Multilingual
/// Plane, which UCS-2 cannot represent.
pub const REPLACEMENT_GLYPH: u16 = 0xFFFD;

/// A name encoded for drawing, plus its measured width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapedText {
    /// UCS-2 code units, one per glyph.
    pub glyphs: Vec<u16>,
    /// Predicted width in pixels.
    pub width: u32,
}

impl ShapedText {
    /// Number of glyphs in the label.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

/// Encode `text` as UCS-2, replacing non-BMP characters with
/// [`REPLACEMENT_GLYPH`].
pub fn encode_ucs2(text: &str) -> Vec<u16> {
    text.chars()
        .map(|c| u16::try_from(u32::from(c)).unwrap_or(REPLACEMENT_GLYPH))
        .collect()
}

/// Monospace shaper: every display column is `cell_width` pixels wide.
///
/// Column widths come from `unicode-width`, so East Asian wide characters
/// take two cells and combining marks take none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellShaper {
    cell_width: u32,
}

impl CellShaper {
    pub fn new(cell_width: u32) -> Self {
        Self { cell_width }
    }
}

impl TextShaper for CellShaper {
    fn shape_and_measure(&self, text: &str) -> ShapedText {
        let columns: u32 = text
            .chars()
            .map(|c| UnicodeWidthChar::width(c).unwrap_or(0) as u32)
            .sum();
        ShapedText {
            glyphs: encode_ucs2(text),
            width: columns.saturating_mul(self.cell_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_name() {
        let shaped = CellShaper::new(7).shape_and_measure("www");
        assert_eq!(shaped.glyphs, vec![0x77, 0x77, 0x77]);
        assert_eq!(shaped.glyph_count(), 3);
        assert_eq!(shaped.width, 21);
    }

    #[test]
    fn wide_characters_take_two_cells() {
        let shaped = CellShaper::new(6).shape_and_measure("日本");
        assert_eq!(shaped.glyphs, vec![0x65E5, 0x672C]);
        assert_eq!(shaped.width, 24);
    }

    #[test]
    fn non_bmp_characters_are_replaced() {
        let glyphs = encode_ucs2("a\u{1F600}b");
        assert_eq!(glyphs, vec![0x61, REPLACEMENT_GLYPH, 0x62]);
    }

    #[test]
    fn empty_name() {
        let shaped = CellShaper::new(7).shape_and_measure("");
        assert!(shaped.glyphs.is_empty());
        assert_eq!(shaped.width, 0);
    }
}
