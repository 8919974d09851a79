//! Software vertical scrolling
//!
//! Moves framebuffer content up independently of the controller's hardware
//! scroll. Paced, animated scrolling lives in [`Oled::scroll_up`]; this module
//! only rewrites the buffer.
//!
//! [`Oled::scroll_up`]: crate::oled::Oled::scroll_up

use crate::draw::Color;
use crate::framebuffer::{PageBuffer, PAGE_HEIGHT};

impl PageBuffer {
    /// Shift all rows up by `lines`, filling the bottom with black
    ///
    /// Row `r` receives what was in row `r + lines`. Shifting by the display
    /// height or more clears the buffer.
    pub fn shift_up(&mut self, lines: u8) {
        if lines == 0 {
            return;
        }
        if lines >= self.height() {
            self.clear(Color::Black);
            return;
        }

        let skip = lines as u16 / PAGE_HEIGHT;
        let shift = lines as u16 % PAGE_HEIGHT;

        // Top-down: each page only reads itself and later pages
        for page in 0..self.pages() as u16 {
            for x in 0..self.width() as u16 {
                let upper = self.page_byte(page + skip, x);
                let value = if shift == 0 {
                    upper
                } else {
                    let lower = self.page_byte(page + skip + 1, x);
                    (upper >> shift) | (lower << (PAGE_HEIGHT - shift))
                };
                self.set_page_byte(page, x, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_is_noop() {
        let mut buf = PageBuffer::new(128, 32).unwrap();
        buf.draw_line(0, 0, 127, 31, Color::White);
        let before = buf.clone();
        buf.shift_up(0);
        assert!(buf == before);
    }

    #[test]
    fn test_full_height_clears() {
        let mut buf = PageBuffer::new(128, 32).unwrap();
        buf.clear(Color::Black);
        buf.shift_up(32);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));

        buf.clear(Color::White);
        buf.shift_up(200);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_whole_page_shift() {
        let mut buf = PageBuffer::new(128, 32).unwrap();
        buf.draw_byte(7, 16, 0xA5, Color::White);
        buf.shift_up(8);
        assert_eq!(buf.as_bytes()[128 + 7], 0xA5);
        assert_eq!(buf.as_bytes()[2 * 128 + 7], 0x00);
    }

    #[test]
    fn test_shift_across_page_boundary() {
        let mut buf = PageBuffer::new(128, 32).unwrap();
        buf.draw_pixel(0, 9, Color::White);
        buf.draw_pixel(0, 31, Color::White);
        buf.shift_up(3);
        assert_eq!(buf.pixel(0, 6), Some(Color::White));
        assert_eq!(buf.pixel(0, 28), Some(Color::White));
        assert_eq!(buf.pixel(0, 9), Some(Color::Black));
        // vacated rows are black
        for row in 29..32 {
            assert_eq!(buf.pixel(0, row), Some(Color::Black));
        }
    }

    proptest! {
        #[test]
        fn prop_shift_moves_every_row(
            lines in 0u8..=64,
            seed in proptest::collection::vec(any::<u8>(), 1024),
        ) {
            let mut buf = PageBuffer::new(128, 64).unwrap();
            for (i, &b) in seed.iter().enumerate() {
                buf.set_page_byte((i / 128) as u16, (i % 128) as u16, b);
            }
            let before = buf.clone();
            buf.shift_up(lines);

            for x in (0..128u8).step_by(17) {
                for row in 0..64u8 {
                    let source = row as u16 + lines as u16;
                    let expected = if source < 64 {
                        before.pixel(x, source as u8)
                    } else {
                        Some(Color::Black)
                    };
                    prop_assert_eq!(buf.pixel(x, row), expected);
                }
            }
        }
    }
}
