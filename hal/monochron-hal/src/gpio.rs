//! GPIO pin abstractions
//!
//! Provides traits for the digital lines of the two-wire bus. They are
//! infallible: a line that cannot be driven simply stays where it is, and the
//! protocol layer above never retries.

/// Electrical mode of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input
    Input,
    /// Input with pull-up; on an open-drain bus this releases the line
    InputPullUp,
    /// Actively driven output (push-pull)
    Output,
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
///
/// Sampling takes `&mut self` because on most chips reading a line is a
/// register access through an owned peripheral.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

/// Pin that can be switched between input and output at runtime
///
/// The data line of the bus needs this: the master drives it for address and
/// payload bits, then lets go so the slave can pull it low to acknowledge.
pub trait FlexPin: OutputPin + InputPin {
    /// Change the electrical mode of the pin
    ///
    /// Switching back to [`PinMode::Output`] drives the last level written
    /// with [`OutputPin::set_state`].
    fn set_mode(&mut self, mode: PinMode);
}

/// Placeholder for a line that is not wired to the MCU
///
/// Used as the reset pin type when the reset signal is generated by other
/// hardware. Writes are discarded and the pin always reads back low.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoPin;

impl OutputPin for NoPin {
    fn set_high(&mut self) {}

    fn set_low(&mut self) {}

    fn is_set_high(&self) -> bool {
        false
    }
}
