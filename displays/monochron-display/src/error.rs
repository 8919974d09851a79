//! Driver errors
//!
//! Bus and drawing operations cannot fail: acknowledgment failures are logged
//! and otherwise ignored, coordinates are clipped. The only error surfaces
//! when a driver is built from an unusable configuration.

/// Configuration rejected at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width is zero or wider than the controller RAM (128 columns)
    UnsupportedWidth(u8),
    /// Height is not a multiple of 8 or outside 8..=64
    UnsupportedHeight(u8),
    /// Bus address is not a 7-bit device address (0x00..=0x77)
    InvalidAddress(u8),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedWidth(w) => write!(f, "unsupported display width {}", w),
            Self::UnsupportedHeight(h) => write!(f, "unsupported display height {}", h),
            Self::InvalidAddress(a) => {
                write!(f, "bus address {:#04x} is not a 7-bit device address", a)
            }
        }
    }
}
