//! Bit-banged two-wire transport
//!
//! Emulates an I2C master on two GPIO lines. Only what the display needs is
//! implemented: write transfers, no clock stretching, no arbitration, no
//! reads. A missing acknowledgment is reported to the caller and otherwise
//! ignored.
//!
//! ```text
//!        start        bit 7 ... bit 0       ack       stop
//! SDA  ‾‾‾\____<  b7  >...<  b0  >‾‾‾‾\slave/____/‾‾‾‾
//! SCL  ‾‾‾‾‾‾\__/‾‾‾‾\__...__/‾‾‾‾\__/‾‾‾‾\____/‾‾‾‾‾‾
//! ```

use embedded_hal::delay::DelayNs;
use monochron_hal::gpio::{FlexPin, OutputPin, PinMode};
use monochron_hal::i2c::{write_address, BusTiming};

/// Byte-level access to the display bus
///
/// Implemented by [`BitBang`]; the controller session only talks to this
/// trait.
pub trait Transport {
    /// Start condition: data falls while clock is high
    fn start(&mut self);

    /// Stop condition: data rises while clock is high
    fn stop(&mut self);

    /// Clock out one byte MSB first and return whether the slave acknowledged
    fn send_byte(&mut self, byte: u8) -> bool;

    /// Busy-wait on the bus timer
    fn delay_ms(&mut self, ms: u32);

    /// One complete write transfer: address, control byte, payload
    ///
    /// Every byte is sent even after a NACK. Returns true only if all bytes
    /// were acknowledged.
    fn write(&mut self, address: u8, control: u8, payload: &[u8]) -> bool {
        self.start();
        let mut acked = self.send_byte(write_address(address));
        acked &= self.send_byte(control);
        for &byte in payload {
            acked &= self.send_byte(byte);
        }
        self.stop();
        acked
    }
}

/// Software I2C master
///
/// `SDA` must be able to release the line for the acknowledgment bit; `SCL`
/// is only ever driven.
pub struct BitBang<SDA, SCL, D> {
    sda: SDA,
    scl: SCL,
    delay: D,
    settle_ns: u32,
}

impl<SDA, SCL, D> BitBang<SDA, SCL, D>
where
    SDA: FlexPin,
    SCL: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the lines and leave the bus idle (both high)
    pub fn new(mut sda: SDA, mut scl: SCL, delay: D, timing: BusTiming) -> Self {
        sda.set_mode(PinMode::Output);
        sda.set_high();
        scl.set_high();
        debug!("bit-bang bus idle, settle {=u32} us", timing.bit_delay_us);

        Self {
            sda,
            scl,
            delay,
            settle_ns: timing.settle_ns(),
        }
    }

    /// Give back the lines and the delay provider
    pub fn release(self) -> (SDA, SCL, D) {
        (self.sda, self.scl, self.delay)
    }

    fn settle(&mut self) {
        if self.settle_ns > 0 {
            self.delay.delay_ns(self.settle_ns);
        }
    }

    /// One clock pulse with data already set up
    fn pulse(&mut self) {
        self.scl.set_high();
        self.settle();
        self.scl.set_low();
        self.settle();
    }
}

impl<SDA, SCL, D> Transport for BitBang<SDA, SCL, D>
where
    SDA: FlexPin,
    SCL: OutputPin,
    D: DelayNs,
{
    fn start(&mut self) {
        self.sda.set_high();
        self.scl.set_high();
        self.settle();
        self.sda.set_low();
        self.settle();
        self.scl.set_low();
        self.settle();
    }

    fn stop(&mut self) {
        self.sda.set_low();
        self.settle();
        self.scl.set_high();
        self.settle();
        self.sda.set_high();
        self.settle();
    }

    fn send_byte(&mut self, byte: u8) -> bool {
        for bit in (0..8).rev() {
            self.sda.set_state(byte & (1 << bit) != 0);
            self.settle();
            self.pulse();
        }

        // Ninth clock: let go of SDA and see whether the slave holds it low
        self.sda.set_mode(PinMode::InputPullUp);
        self.settle();
        self.scl.set_high();
        self.settle();
        let ack = self.sda.is_low();
        self.scl.set_low();
        self.settle();
        self.sda.set_mode(PinMode::Output);

        if !ack {
            trace!("no ack for {=u8:#x}", byte);
        }
        ack
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
