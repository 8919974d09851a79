//! Display configuration
//!
//! Construction-time parameters of a display module. The data, clock and
//! reset lines are not part of the configuration; they are handed to the
//! driver as pin objects.

use monochron_hal::i2c::{BusTiming, DEFAULT_ADDRESS, MAX_DEVICE_ADDRESS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Widest supported display in pixels
pub const MAX_WIDTH: u8 = 128;

/// Tallest supported display in pixels
pub const MAX_HEIGHT: u8 = 64;

/// Controller command dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ControllerFamily {
    /// SSD1306: internal charge pump, RAM exactly as wide as the panel
    #[default]
    Ssd1306,
    /// SH1106: external DC-DC control, 132-column RAM centred on the panel
    Sh1106,
}

impl ControllerFamily {
    /// First RAM column that is visible on the panel
    pub const fn column_offset(self) -> u8 {
        match self {
            Self::Ssd1306 => 0,
            Self::Sh1106 => 2,
        }
    }

    /// Whether the controller can scroll autonomously
    pub const fn has_hardware_scroll(self) -> bool {
        matches!(self, Self::Ssd1306)
    }
}

/// Immutable display parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// 7-bit bus address, usually 0x3C or 0x3D
    pub address: u8,
    /// Width in pixels (96 or 128 on common modules)
    pub width: u8,
    /// Height in pixels, a multiple of 8 (16, 32 or 64 on common modules)
    pub height: u8,
    /// Command dialect of the controller
    pub family: ControllerFamily,
    /// Speed of the bit-banged bus
    pub timing: BusTiming,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(128, 32)
    }
}

impl DisplayConfig {
    /// SSD1306 at the default address with the given size
    pub const fn new(width: u8, height: u8) -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            width,
            height,
            family: ControllerFamily::Ssd1306,
            timing: BusTiming::FAST,
        }
    }

    /// 128x64 SH1106 module, the common 1.3" size
    pub const fn sh1106_128x64() -> Self {
        Self::new(128, 64).with_family(ControllerFamily::Sh1106)
    }

    /// Use a different bus address
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Use a different controller dialect
    pub const fn with_family(mut self, family: ControllerFamily) -> Self {
        self.family = family;
        self
    }

    /// Use a different bus speed
    pub const fn with_timing(mut self, timing: BusTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Number of 8-row pages
    pub const fn pages(&self) -> u8 {
        self.height / 8
    }

    /// Framebuffer size in bytes
    pub const fn bufsize(&self) -> usize {
        self.width as usize * self.pages() as usize
    }

    /// Check the configuration against what the driver can handle
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.width > MAX_WIDTH {
            return Err(ConfigError::UnsupportedWidth(self.width));
        }
        if self.height == 0 || self.height > MAX_HEIGHT || self.height % 8 != 0 {
            return Err(ConfigError::UnsupportedHeight(self.height));
        }
        // 0x78 is the 8-bit write form of 0x3C, a common mix-up
        if self.address > MAX_DEVICE_ADDRESS {
            return Err(ConfigError::InvalidAddress(self.address));
        }
        Ok(())
    }
}
