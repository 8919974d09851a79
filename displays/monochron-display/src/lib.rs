//! Monochrome OLED driver for SSD1306 and SH1106 controllers
//!
//! This crate provides:
//! - A bit-banged two-wire bus ([`transport::BitBang`]) for MCUs without a
//!   usable I2C peripheral on the display pins
//! - A controller session speaking both command dialects ([`controller`])
//! - A page-organized framebuffer with a small drawing engine
//!   ([`framebuffer::PageBuffer`])
//! - A 6x8 font with double-size rendering ([`font`], [`text`])
//! - Software vertical scrolling ([`scroll`]) and a line console ([`console`])
//!
//! # Memory layout
//!
//! The display is organized in "pages", each a band of 8 pixel rows. A
//! 128x32 display has 4 pages of 128 bytes. In every byte bit 0 is the top
//! pixel and bit 7 the bottom one. Bitmaps use the same layout with any width
//! and a height that is a multiple of 8.
//!
//! # Usage
//!
//! ```rust, ignore
//! use monochron_display::prelude::*;
//!
//! let config = DisplayConfig::new(128, 32);
//! let mut oled = Oled::bit_banged(config, sda, scl, Some(reset), delay)?;
//! oled.init();
//!
//! oled.draw_string(0, 0, "Hello", TextSize::Normal, Color::White);
//! oled.draw_circle(100, 16, 10, FillMode::Hollow, Color::White);
//! oled.display(); // nothing is visible before the flush
//! ```
//!
//! Coordinates start at the top left corner. Everything outside the display
//! is clipped.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod console;
pub mod controller;
pub mod draw;
pub mod error;
pub mod font;
pub mod framebuffer;
#[cfg(feature = "graphics")]
pub mod graphics;
pub mod oled;
pub mod scroll;
pub mod source;
pub mod text;
pub mod transport;

#[cfg(test)]
mod mock;

// Re-export key types
pub use config::{ControllerFamily, DisplayConfig};
pub use draw::{Color, FillMode};
pub use error::ConfigError;
pub use framebuffer::PageBuffer;
pub use oled::Oled;
pub use text::TextSize;

/// Useful exports
pub mod prelude {
    pub use crate::config::{ControllerFamily, DisplayConfig};
    pub use crate::console::Console;
    pub use crate::controller::ScrollEffect;
    pub use crate::draw::{Color, FillMode};
    pub use crate::error::ConfigError;
    pub use crate::oled::Oled;
    pub use crate::source::{ByteSource, ProgramStore};
    pub use crate::text::TextSize;
    pub use crate::transport::{BitBang, Transport};
    pub use monochron_hal::{BusTiming, NoPin};
}
