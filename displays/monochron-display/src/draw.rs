//! Drawing engine
//!
//! Rasterizes primitives into a [`PageBuffer`]. Everything is integer
//! arithmetic; shapes partly outside the display are clipped pixel by pixel.

use crate::framebuffer::{PageBuffer, PAGE_HEIGHT};
use crate::source::ByteSource;
use crate::text::TextSize;

/// Drawing color
///
/// White sets buffer bits, black clears them. With the controller in inverse
/// mode the panel shows the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Bit clear
    #[default]
    Black,
    /// Bit set
    White,
}

impl Color {
    /// Byte with all 8 rows of a page in this color
    pub const fn fill_byte(self) -> u8 {
        match self {
            Self::Black => 0x00,
            Self::White => 0xFF,
        }
    }

    /// The other color
    pub const fn inverse(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

/// Outline or filled shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FillMode {
    /// Outline only
    #[default]
    Hollow,
    /// Outline and interior
    Solid,
}

/// Spread the 8 bits of `b` over 16 bits, each bit twice
fn double_bits(b: u8) -> u16 {
    let mut wide = 0u16;
    for bit in 0..8 {
        if b & (1 << bit) != 0 {
            wide |= 0b11 << (2 * bit);
        }
    }
    wide
}

impl PageBuffer {
    /// Draw a horizontal run of 8-row strips read from `source`
    ///
    /// Reads `count` bytes starting at `offset`; each byte becomes one column
    /// (two columns and 16 rows at double size). With `mirror` each byte is
    /// bit-reversed before drawing, flipping the strip top to bottom.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_bytes<S: ByteSource + ?Sized>(
        &mut self,
        x: u16,
        y: u16,
        source: &S,
        offset: usize,
        count: usize,
        scaling: TextSize,
        color: Color,
        mirror: bool,
    ) {
        let step = scaling.scale() as u32;
        for i in 0..count {
            // Columns past the right edge stay clipped, so later bytes never draw
            let left = x as u32 + i as u32 * step;
            if left >= self.width() as u32 {
                break;
            }
            let Some(mut b) = offset.checked_add(i).and_then(|at| source.byte_at(at)) else {
                break;
            };
            if mirror {
                b = b.reverse_bits();
            }
            let left = left as u16;
            match scaling {
                TextSize::Normal => self.put_strip(left, y, b, color),
                TextSize::Double => {
                    let wide = double_bits(b);
                    let (upper, lower) = (wide as u8, (wide >> 8) as u8);
                    for cx in [left, left.saturating_add(1)] {
                        self.put_strip(cx, y, upper, color);
                        if let Some(below) = y.checked_add(PAGE_HEIGHT) {
                            self.put_strip(cx, below, lower, color);
                        }
                    }
                }
            }
        }
    }

    /// Draw a line with Bresenham's algorithm, both endpoints included
    pub fn draw_line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8, color: Color) {
        self.line(x0 as i16, y0 as i16, x1 as i16, y1 as i16, color);
    }

    /// Draw a circle around (`x`, `y`)
    pub fn draw_circle(&mut self, x: u8, y: u8, radius: u8, fill: FillMode, color: Color) {
        let (cx, cy) = (x as i16, y as i16);
        let mut dx = radius as i16;
        let mut dy = 0i16;
        let mut err = 1 - dx;

        while dx >= dy {
            match fill {
                FillMode::Hollow => {
                    for (px, py) in [
                        (dx, dy),
                        (dy, dx),
                        (-dy, dx),
                        (-dx, dy),
                        (-dx, -dy),
                        (-dy, -dx),
                        (dy, -dx),
                        (dx, -dy),
                    ] {
                        self.plot(cx + px, cy + py, color);
                    }
                }
                FillMode::Solid => {
                    self.hline(cx - dx, cx + dx, cy + dy, color);
                    self.hline(cx - dx, cx + dx, cy - dy, color);
                    self.hline(cx - dy, cx + dy, cy + dx, color);
                    self.hline(cx - dy, cx + dy, cy - dx, color);
                }
            }

            dy += 1;
            if err < 0 {
                err += 2 * dy + 1;
            } else {
                dx -= 1;
                err += 2 * (dy - dx) + 1;
            }
        }
    }

    /// Draw a rectangle with corners (`x0`, `y0`) and (`x1`, `y1`), inclusive
    pub fn draw_rectangle(
        &mut self,
        x0: u8,
        y0: u8,
        x1: u8,
        y1: u8,
        fill: FillMode,
        color: Color,
    ) {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));

        match fill {
            FillMode::Hollow => {
                self.hline(left as i16, right as i16, top as i16, color);
                self.hline(left as i16, right as i16, bottom as i16, color);
                self.vline(left as i16, top as i16, bottom as i16, color);
                self.vline(right as i16, top as i16, bottom as i16, color);
            }
            FillMode::Solid => {
                for x in left..=right {
                    self.fill_column(x as u16, top as u16, bottom as u16, color);
                }
            }
        }
    }

    /// Draw a bitmap from memory
    ///
    /// `data` holds `width * height / 8` bytes in page layout. `height`
    /// should be a multiple of 8; trailing rows of a partial band are not
    /// drawn.
    pub fn draw_bitmap(&mut self, x: u8, y: u8, width: u8, height: u8, data: &[u8], color: Color) {
        self.bitmap(x, y, width, height, data, color, false);
    }

    /// Draw a bitmap fetched from any byte source, e.g. a [`ProgramStore`]
    ///
    /// [`ProgramStore`]: crate::source::ProgramStore
    pub fn draw_bitmap_from<S: ByteSource + ?Sized>(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        source: &S,
        color: Color,
    ) {
        self.bitmap(x, y, width, height, source, color, false);
    }

    /// Draw a bitmap with every byte bit-reversed
    pub fn draw_bitmap_mirrored(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        data: &[u8],
        color: Color,
    ) {
        self.bitmap(x, y, width, height, data, color, true);
    }

    #[allow(clippy::too_many_arguments)]
    fn bitmap<S: ByteSource + ?Sized>(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        source: &S,
        color: Color,
        mirror: bool,
    ) {
        for band in 0..(height as u16 / PAGE_HEIGHT) {
            self.draw_bytes(
                x as u16,
                y as u16 + band * PAGE_HEIGHT,
                source,
                band as usize * width as usize,
                width as usize,
                TextSize::Normal,
                color,
                mirror,
            );
        }
    }

    fn line(&mut self, mut x0: i16, mut y0: i16, x1: i16, y1: i16, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn hline(&mut self, x0: i16, x1: i16, y: i16, color: Color) {
        for x in x0..=x1 {
            self.plot(x, y, color);
        }
    }

    fn vline(&mut self, x: i16, y0: i16, y1: i16, color: Color) {
        if x < 0 || y1 < 0 {
            return;
        }
        self.fill_column(x as u16, y0.max(0) as u16, y1 as u16, color);
    }

    /// Rows `top..=bottom` of column `x`, written in strips of up to 8 rows
    fn fill_column(&mut self, x: u16, top: u16, bottom: u16, color: Color) {
        let mut y = top;
        while y <= bottom {
            let rows = (bottom - y + 1).min(PAGE_HEIGHT);
            let bits = (0xFFu16 >> (PAGE_HEIGHT - rows)) as u8;
            self.put_strip(x, y, bits, color);
            y += rows;
        }
    }
}
