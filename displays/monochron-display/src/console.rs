//! Text console
//!
//! Line-oriented output on top of the text renderer. Characters are laid out
//! on a fixed grid; a full line wraps and a full screen scrolls up by one
//! text line using the software scroll.
//!
//! ```rust, ignore
//! use core::fmt::Write;
//!
//! let mut console = Console::new(&mut oled);
//! writeln!(console, "T {}.{} C", 21, 5).ok();
//! console.flush();
//! ```

use heapless::String;
use monochron_hal::gpio::OutputPin;
use monochron_hal::NoPin;

use crate::config::MAX_WIDTH;
use crate::draw::{Color, FillMode};
use crate::font::GLYPH_WIDTH;
use crate::oled::Oled;
use crate::text::TextSize;
use crate::transport::Transport;

/// Most characters a line can hold
pub const MAX_COLUMNS: usize = (MAX_WIDTH / GLYPH_WIDTH) as usize;

/// Terminal-like writer borrowing a display
pub struct Console<'a, T, RST = NoPin> {
    oled: &'a mut Oled<T, RST>,
    size: TextSize,
    color: Color,
    scroll_delay_ms: u8,
    /// Character column of the cursor
    column: u8,
    /// Top pixel row of the current line
    row: u8,
    /// Text of the current line
    line: String<MAX_COLUMNS>,
}

impl<'a, T, RST> Console<'a, T, RST>
where
    T: Transport,
    RST: OutputPin,
{
    /// Console starting in the top left corner with white normal-size text
    pub fn new(oled: &'a mut Oled<T, RST>) -> Self {
        Self {
            oled,
            size: TextSize::Normal,
            color: Color::White,
            scroll_delay_ms: 0,
            column: 0,
            row: 0,
            line: String::new(),
        }
    }

    /// Use another text size from now on
    pub fn with_size(mut self, size: TextSize) -> Self {
        self.size = size;
        self
    }

    /// Draw text in `color` on the inverse background
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Animate scrolling with this delay per pixel row
    ///
    /// Zero, the default, scrolls only the framebuffer.
    pub fn with_scroll_delay(mut self, delay_ms: u8) -> Self {
        self.scroll_delay_ms = delay_ms;
        self
    }

    /// Characters per line
    pub fn columns(&self) -> u8 {
        self.oled.width() / self.size.advance()
    }

    /// Text lines on screen
    pub fn rows(&self) -> u8 {
        self.oled.height() / self.size.line_height()
    }

    /// Cursor as (column, text line)
    pub fn cursor(&self) -> (u8, u8) {
        (self.column, self.row / self.size.line_height())
    }

    /// What has been written to the current line so far
    pub fn current_line(&self) -> &str {
        self.line.as_str()
    }

    /// Blank the screen and move the cursor home
    pub fn clear(&mut self) {
        self.oled.clear(self.color.inverse());
        self.column = 0;
        self.row = 0;
        self.line.clear();
    }

    /// Make the output visible
    pub fn flush(&mut self) {
        self.oled.display();
    }

    /// Put one character at the cursor
    ///
    /// `\n` starts a new line, `\r` returns to the start of the current one.
    pub fn put_char(&mut self, c: char) {
        match c {
            '\n' => self.new_line(),
            '\r' => {
                self.column = 0;
                self.line.clear();
            }
            _ => {
                if self.columns() == 0 || self.rows() == 0 {
                    return;
                }
                if self.column >= self.columns() {
                    self.new_line();
                }

                let advance = self.size.advance();
                let x = self.column * advance;
                // Clear the cell first; glyphs only set their lit pixels
                self.oled.draw_rectangle(
                    x,
                    self.row,
                    x + advance - 1,
                    self.row + self.size.line_height() - 1,
                    FillMode::Solid,
                    self.color.inverse(),
                );
                self.oled.draw_character(x, self.row, c, self.size, self.color);

                self.column += 1;
                let _ = self.line.push(c);
            }
        }
    }

    fn new_line(&mut self) {
        self.column = 0;
        self.line.clear();

        let line_height = self.size.line_height();
        if self.row as u16 + 2 * line_height as u16 <= self.oled.height() as u16 {
            self.row += line_height;
        } else {
            self.oled.scroll_up(line_height, self.scroll_delay_ms);
        }
    }
}

impl<T, RST> core::fmt::Write for Console<'_, T, RST>
where
    T: Transport,
    RST: OutputPin,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            self.put_char(c);
        }
        Ok(())
    }

    fn write_char(&mut self, c: char) -> core::fmt::Result {
        self.put_char(c);
        Ok(())
    }
}
