//! embedded-hal 1.0 adapters
//!
//! Wraps pins from any chip HAL that implements the `embedded-hal` digital
//! traits so they can be handed to the display driver. Errors reported by the
//! wrapped pin are dropped; the bus has no error path.

use embedded_hal::digital as eh;

use crate::gpio::{FlexPin, InputPin, OutputPin, PinMode};

/// Push-pull output, used for the clock and reset lines
pub struct PushPull<P> {
    pin: P,
    high: bool,
}

impl<P: eh::OutputPin> PushPull<P> {
    /// Wrap an output pin, driving it high (bus idle level)
    pub fn new(mut pin: P) -> Self {
        pin.set_high().ok();
        Self { pin, high: true }
    }

    /// Give back the wrapped pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: eh::OutputPin> OutputPin for PushPull<P> {
    fn set_high(&mut self) {
        self.pin.set_high().ok();
        self.high = true;
    }

    fn set_low(&mut self) {
        self.pin.set_low().ok();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Open-drain data line
///
/// The wrapped pin must be configured as open-drain output with input
/// enabled (e.g. `OutputOpenDrain` or `Flex` in most HALs). Writing high
/// releases the line, so "input with pull-up" and "output high" are the same
/// electrical state and mode changes only decide which level is applied.
pub struct OpenDrain<P> {
    pin: P,
    /// Level last written while in output mode
    latch: bool,
    listening: bool,
}

impl<P: eh::OutputPin + eh::InputPin> OpenDrain<P> {
    /// Wrap an open-drain pin, releasing the line
    pub fn new(mut pin: P) -> Self {
        pin.set_high().ok();
        Self {
            pin,
            latch: true,
            listening: false,
        }
    }

    /// Give back the wrapped pin
    pub fn release(self) -> P {
        self.pin
    }

    fn apply(&mut self) {
        let level = self.listening || self.latch;
        if level {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }
}

impl<P: eh::OutputPin + eh::InputPin> OutputPin for OpenDrain<P> {
    fn set_high(&mut self) {
        self.latch = true;
        self.apply();
    }

    fn set_low(&mut self) {
        self.latch = false;
        self.apply();
    }

    fn is_set_high(&self) -> bool {
        self.latch
    }
}

impl<P: eh::OutputPin + eh::InputPin> InputPin for OpenDrain<P> {
    fn is_high(&mut self) -> bool {
        // A failed read is treated as a released (high) line, i.e. a NACK
        self.pin.is_high().unwrap_or(true)
    }
}

impl<P: eh::OutputPin + eh::InputPin> FlexPin for OpenDrain<P> {
    fn set_mode(&mut self, mode: PinMode) {
        self.listening = !matches!(mode, PinMode::Output);
        self.apply();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Mock open-drain pin: reads back what was written unless `stuck_low`
    struct MockPin {
        high: bool,
        stuck_low: bool,
        writes: u32,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                stuck_low: false,
                writes: 0,
            }
        }
    }

    impl eh::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl eh::OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    impl eh::InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.high && !self.stuck_low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.high || self.stuck_low)
        }
    }

    #[test]
    fn test_push_pull_starts_high() {
        let mut pin = PushPull::new(MockPin::new());
        assert!(pin.is_set_high());

        pin.set_low();
        assert!(pin.is_set_low());
        assert!(!pin.release().high);
    }

    #[test]
    fn test_open_drain_release_for_ack() {
        let mut line = OpenDrain::new(MockPin::new());
        line.set_low();
        assert!(line.is_low());

        // Listening releases the line without forgetting the latch
        line.set_mode(PinMode::InputPullUp);
        assert!(line.is_high());
        assert!(line.is_set_low());

        // Back to output drives the latched level again
        line.set_mode(PinMode::Output);
        assert!(line.is_low());
    }

    #[test]
    fn test_open_drain_reads_slave_pull_down() {
        let mut pin = MockPin::new();
        pin.stuck_low = true;
        let mut line = OpenDrain::new(pin);

        line.set_mode(PinMode::InputPullUp);
        assert!(line.is_low());
        assert!(line.release().writes >= 2);
    }
}
