//! `embedded-graphics` support
//!
//! Lets the framebuffer be used as a [`DrawTarget`] for the
//! `embedded-graphics` primitives, fonts and images. Flush through
//! [`Oled::display`] as usual.
//!
//! [`Oled::display`]: crate::oled::Oled::display

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::draw::Color;
use crate::framebuffer::PageBuffer;

impl From<BinaryColor> for Color {
    fn from(color: BinaryColor) -> Self {
        match color {
            BinaryColor::On => Color::White,
            BinaryColor::Off => Color::Black,
        }
    }
}

impl From<Color> for BinaryColor {
    fn from(color: Color) -> Self {
        match color {
            Color::White => BinaryColor::On,
            Color::Black => BinaryColor::Off,
        }
    }
}

impl DrawTarget for PageBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (i16::try_from(point.x), i16::try_from(point.y)) {
                self.plot(x, y, color.into());
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        PageBuffer::clear(self, color.into());
        Ok(())
    }
}

impl OriginDimensions for PageBuffer {
    fn size(&self) -> Size {
        Size::new(self.width().into(), self.height().into())
    }
}
