//! Page framebuffer
//!
//! One byte per column per page; bit 0 of a byte is the top row of its page.
//! The buffer is the only copy of the picture: the controller RAM is written
//! but never read back.

use heapless::Vec;

use crate::config::{DisplayConfig, MAX_HEIGHT, MAX_WIDTH};
use crate::draw::Color;
use crate::error::ConfigError;

/// Largest framebuffer (128x64) in bytes
pub const MAX_BUFSIZE: usize = MAX_WIDTH as usize * (MAX_HEIGHT as usize / 8);

/// Rows per page
pub const PAGE_HEIGHT: u16 = 8;

/// One byte-level write produced by splitting an 8-row strip onto pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripWrite {
    /// Target page
    pub page: u16,
    /// Rows of the page covered by the strip
    pub mask: u8,
    /// Strip content moved into page coordinates; always a subset of `mask`
    pub bits: u8,
}

/// Split an 8-row strip starting at row `y` into per-page writes
///
/// A strip starting on a page boundary touches a single page. Otherwise its
/// upper rows land in the high bits of page `y / 8` and its lower rows in the
/// low bits of the next page.
pub fn strip_writes(y: u16, bits: u8) -> Vec<StripWrite, 2> {
    let page = y / PAGE_HEIGHT;
    let shift = (y % PAGE_HEIGHT) as u32;
    let mut writes = Vec::new();

    let _ = writes.push(StripWrite {
        page,
        mask: 0xFF << shift,
        bits: bits << shift,
    });
    if shift != 0 {
        let _ = writes.push(StripWrite {
            page: page + 1,
            mask: 0xFF >> (8 - shift),
            bits: bits >> (8 - shift),
        });
    }

    writes
}

/// Monochrome framebuffer organized in 8-row pages
#[derive(Clone, PartialEq, Eq)]
pub struct PageBuffer {
    width: u8,
    height: u8,
    pages: u8,
    data: Vec<u8, MAX_BUFSIZE>,
}

impl PageBuffer {
    /// Allocate a cleared buffer for a `width` x `height` display
    pub fn new(width: u8, height: u8) -> Result<Self, ConfigError> {
        DisplayConfig::new(width, height).validate()?;

        let pages = height / 8;
        let mut data = Vec::new();
        data.resize(width as usize * pages as usize, 0)
            .map_err(|_| ConfigError::UnsupportedWidth(width))?;

        Ok(Self {
            width,
            height,
            pages,
            data,
        })
    }

    /// Allocate a buffer matching a display configuration
    pub fn for_config(config: &DisplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.width, config.height)
    }

    /// Width in pixels
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of pages
    pub fn pages(&self) -> u8 {
        self.pages
    }

    /// Buffer size in bytes
    pub fn bufsize(&self) -> usize {
        self.data.len()
    }

    /// Raw buffer, `page * width + x` indexed
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The `width` bytes of one page
    pub fn page(&self, page: u8) -> Option<&[u8]> {
        if page >= self.pages {
            return None;
        }
        let start = page as usize * self.width as usize;
        self.data.get(start..start + self.width as usize)
    }

    /// Color of a pixel, `None` outside the display
    pub fn pixel(&self, x: u8, y: u8) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let byte = self.data[self.index(y as u16 / PAGE_HEIGHT, x as u16)];
        if byte & (1 << (y % 8)) != 0 {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    /// Fill the whole buffer with one color
    pub fn clear(&mut self, color: Color) {
        self.data.fill(color.fill_byte());
    }

    /// Set or clear a single pixel; ignored outside the display
    pub fn draw_pixel(&mut self, x: u8, y: u8, color: Color) {
        self.plot(x as i16, y as i16, color);
    }

    /// Draw an 8-row vertical strip with its top at `y`
    ///
    /// Bit 0 of `b` is the top row. Only the rows whose bit is set in `b`
    /// change: white sets them, black clears them.
    pub fn draw_byte(&mut self, x: u8, y: u8, b: u8, color: Color) {
        self.put_strip(x as u16, y as u16, b, color);
    }

    pub(crate) fn plot(&mut self, x: i16, y: i16, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i16 || y >= self.height as i16 {
            return;
        }
        let (x, y) = (x as u16, y as u16);
        let idx = self.index(y / PAGE_HEIGHT, x);
        let bit = 1u8 << (y % PAGE_HEIGHT);
        match color {
            Color::White => self.data[idx] |= bit,
            Color::Black => self.data[idx] &= !bit,
        }
    }

    pub(crate) fn put_strip(&mut self, x: u16, y: u16, bits: u8, color: Color) {
        if x >= self.width as u16 || bits == 0 {
            return;
        }
        for write in strip_writes(y, bits) {
            self.apply(x, write, color);
        }
    }

    /// Byte of `page` at column `x`, zero outside the buffer
    pub(crate) fn page_byte(&self, page: u16, x: u16) -> u8 {
        if page >= self.pages as u16 || x >= self.width as u16 {
            return 0;
        }
        self.data[self.index(page, x)]
    }

    pub(crate) fn set_page_byte(&mut self, page: u16, x: u16, value: u8) {
        if page < self.pages as u16 && x < self.width as u16 {
            let idx = self.index(page, x);
            self.data[idx] = value;
        }
    }

    fn apply(&mut self, x: u16, write: StripWrite, color: Color) {
        if write.page >= self.pages as u16 {
            return;
        }
        let idx = self.index(write.page, x);
        match color {
            Color::White => self.data[idx] |= write.bits,
            Color::Black => self.data[idx] &= !write.bits,
        }
    }

    fn index(&self, page: u16, x: u16) -> usize {
        page as usize * self.width as usize + x as usize
    }
}

impl core::fmt::Debug for PageBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pages", &self.pages)
            .finish()
    }
}
