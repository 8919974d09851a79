//! Two-wire bus parameters
//!
//! The display bus is clocked in software, so its speed is set by a settle
//! delay inserted between line transitions rather than by a peripheral clock
//! divider.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Usual address of SSD1306/SH1106 modules (SA0 low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Address with SA0 pulled high
pub const ALTERNATE_ADDRESS: u8 = 0x3D;

/// Highest valid 7-bit address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Highest address a device may use; 0x78..=0x7F are reserved
pub const MAX_DEVICE_ADDRESS: u8 = 0x77;

/// Settle delay of the bit-banged bus
///
/// Each data bit costs three transitions, each followed by this delay. The
/// resulting clock depends on the CPU speed because the pin writes themselves
/// take time; the presets list typical values at 80 MHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusTiming {
    /// Delay after every line transition, in microseconds
    pub bit_delay_us: u32,
}

impl Default for BusTiming {
    fn default() -> Self {
        Self::FAST
    }
}

impl BusTiming {
    /// About 68 kHz
    pub const SLOW: Self = Self { bit_delay_us: 3 };

    /// About 85 kHz
    pub const STANDARD: Self = Self { bit_delay_us: 2 };

    /// About 110 kHz
    pub const FAST: Self = Self { bit_delay_us: 1 };

    /// No explicit delay; limited only by pin write speed (about 150 kHz)
    pub const UNTHROTTLED: Self = Self { bit_delay_us: 0 };

    /// Create a timing with an explicit settle delay
    pub const fn from_micros(bit_delay_us: u32) -> Self {
        Self { bit_delay_us }
    }

    /// Settle delay in nanoseconds, as taken by `DelayNs::delay_ns`
    pub const fn settle_ns(&self) -> u32 {
        self.bit_delay_us.saturating_mul(1_000)
    }
}

/// First byte of a write transfer: 7-bit address followed by R/W = 0
pub const fn write_address(address: u8) -> u8 {
    (address & MAX_ADDRESS) << 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_address() {
        assert_eq!(write_address(DEFAULT_ADDRESS), 0x78);
        assert_eq!(write_address(ALTERNATE_ADDRESS), 0x7A);
        // Out-of-range bits are masked rather than shifted into R/W
        assert_eq!(write_address(0xFF), 0xFE);
    }

    #[test]
    fn test_timing_presets() {
        assert_eq!(BusTiming::default(), BusTiming::FAST);
        assert_eq!(BusTiming::SLOW.settle_ns(), 3_000);
        assert_eq!(BusTiming::UNTHROTTLED.settle_ns(), 0);
        assert_eq!(BusTiming::from_micros(u32::MAX).settle_ns(), u32::MAX);
    }
}
