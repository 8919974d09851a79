//! Text rendering
//!
//! Glyphs are blitted with [`PageBuffer::draw_bytes`], so text can start at
//! any row; page-aligned rows (0, 8, 16, ...) just touch fewer bytes.

use crate::draw::Color;
use crate::font::{self, GLYPH_WIDTH};
use crate::framebuffer::PageBuffer;
use crate::source::ByteSource;

/// Glyph scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// 6x8 pixels per character
    #[default]
    Normal,
    /// 12x16 pixels per character, every font pixel drawn as a 2x2 block
    Double,
}

impl TextSize {
    /// Pixel multiplier
    pub const fn scale(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Double => 2,
        }
    }

    /// Horizontal advance per character in pixels
    pub const fn advance(self) -> u8 {
        GLYPH_WIDTH * self.scale()
    }

    /// Line height in pixels
    pub const fn line_height(self) -> u8 {
        font::GLYPH_HEIGHT * self.scale()
    }
}

impl PageBuffer {
    /// Draw one character with its top left corner at (`x`, `y`)
    ///
    /// Supports printable US-ASCII and a few Latin-1 letters (German
    /// umlauts, ß, °, µ, §); anything else is drawn as a hollow box.
    pub fn draw_character(&mut self, x: u8, y: u8, c: char, size: TextSize, color: Color) {
        self.glyph_at(x as u16, y as u16, font::latin1(c), size, color);
    }

    /// Draw a string left to right
    ///
    /// Stops at an embedded NUL or once the next character would start past
    /// the right edge. No wrapping.
    pub fn draw_string(&mut self, x: u8, y: u8, s: &str, size: TextSize, color: Color) {
        let mut cursor = x as u16;
        for c in s.chars() {
            if c == '\0' || cursor >= self.width() as u16 {
                break;
            }
            self.glyph_at(cursor, y as u16, font::latin1(c), size, color);
            cursor += size.advance() as u16;
        }
    }

    /// Draw a NUL-terminated Latin-1 string read from a byte source
    ///
    /// The terminator is optional; drawing also stops at the end of the
    /// source.
    pub fn draw_string_from<S: ByteSource + ?Sized>(
        &mut self,
        x: u8,
        y: u8,
        source: &S,
        size: TextSize,
        color: Color,
    ) {
        let mut cursor = x as u16;
        let mut offset = 0;
        while let Some(code) = source.byte_at(offset) {
            if code == 0 || cursor >= self.width() as u16 {
                break;
            }
            self.glyph_at(cursor, y as u16, code, size, color);
            cursor += size.advance() as u16;
            offset += 1;
        }
    }

    fn glyph_at(&mut self, x: u16, y: u16, code: u8, size: TextSize, color: Color) {
        let glyph = font::glyph(code);
        self.draw_bytes(x, y, glyph, 0, glyph.len(), size, color, false);
    }
}
