//! Test doubles for the bus
//!
//! [`Wire`] watches the two lines like a logic analyser and decodes start,
//! stop and data bits back into frames. [`Recorder`] skips the electrical
//! layer and logs whole transfers, delays and reset edges in order.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use monochron_hal::gpio::{FlexPin, InputPin, OutputPin, PinMode};

use crate::transport::Transport;

/// Decoded state of the two lines plus everything seen so far
pub struct WireState {
    latch: bool,
    listening: bool,
    pub scl: bool,
    /// Whether a slave pulls SDA low in the acknowledgment slot
    pub slave_present: bool,
    in_frame: bool,
    ack_slot: bool,
    /// Level sampled on the last rising edge, counted once the clock falls
    sampled: Option<bool>,
    bits: u8,
    shift: u8,
    current: Vec<u8>,
    /// Completed frames, address byte included
    pub frames: Vec<Vec<u8>>,
    /// Stop conditions in the middle of a byte
    pub protocol_errors: u32,
}

impl WireState {
    /// Level on SDA, wired-AND of master and slave
    pub fn sda_level(&self) -> bool {
        let master = self.listening || self.latch;
        master && !(self.ack_slot && self.slave_present)
    }

    fn drive_sda(&mut self, change: impl FnOnce(&mut Self)) {
        let before = self.sda_level();
        change(self);
        let after = self.sda_level();
        if self.scl && before != after {
            if after {
                self.on_stop();
            } else {
                self.on_start();
            }
        }
    }

    fn drive_scl(&mut self, level: bool) {
        if level == self.scl {
            return;
        }
        self.scl = level;
        if !self.in_frame {
            return;
        }

        // A rising edge followed by a stop is not a bit, so a sample only
        // counts once the clock falls again
        if level {
            if !self.ack_slot {
                self.sampled = Some(self.sda_level());
            }
        } else if self.ack_slot {
            self.ack_slot = false;
            self.bits = 0;
            self.shift = 0;
        } else if let Some(bit) = self.sampled.take() {
            self.shift = (self.shift << 1) | bit as u8;
            self.bits += 1;
            if self.bits == 8 {
                self.current.push(self.shift);
                self.ack_slot = true;
            }
        }
    }

    fn on_start(&mut self) {
        self.in_frame = true;
        self.ack_slot = false;
        self.sampled = None;
        self.bits = 0;
        self.shift = 0;
        self.current.clear();
    }

    fn on_stop(&mut self) {
        if !self.in_frame {
            return;
        }
        if self.bits != 0 || self.ack_slot {
            self.protocol_errors += 1;
        }
        self.in_frame = false;
        self.sampled = None;
        self.frames.push(core::mem::take(&mut self.current));
    }
}

/// Shared two-wire bus with a single always-acknowledging slave
#[derive(Clone)]
pub struct Wire(Rc<RefCell<WireState>>);

impl Wire {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(WireState {
            latch: false,
            listening: false,
            scl: false,
            slave_present: true,
            in_frame: false,
            ack_slot: false,
            sampled: None,
            bits: 0,
            shift: 0,
            current: Vec::new(),
            frames: Vec::new(),
            protocol_errors: 0,
        })))
    }

    pub fn sda(&self) -> MockSda {
        MockSda(self.0.clone())
    }

    pub fn scl(&self) -> MockScl {
        MockScl(self.0.clone())
    }

    pub fn state(&self) -> Ref<'_, WireState> {
        self.0.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, WireState> {
        self.0.borrow_mut()
    }
}

pub struct MockSda(Rc<RefCell<WireState>>);

impl OutputPin for MockSda {
    fn set_high(&mut self) {
        self.0.borrow_mut().drive_sda(|w| w.latch = true);
    }

    fn set_low(&mut self) {
        self.0.borrow_mut().drive_sda(|w| w.latch = false);
    }

    fn is_set_high(&self) -> bool {
        self.0.borrow().latch
    }
}

impl InputPin for MockSda {
    fn is_high(&mut self) -> bool {
        self.0.borrow().sda_level()
    }
}

impl FlexPin for MockSda {
    fn set_mode(&mut self, mode: PinMode) {
        self.0
            .borrow_mut()
            .drive_sda(|w| w.listening = mode != PinMode::Output);
    }
}

pub struct MockScl(Rc<RefCell<WireState>>);

impl OutputPin for MockScl {
    fn set_high(&mut self) {
        self.0.borrow_mut().drive_scl(true);
    }

    fn set_low(&mut self) {
        self.0.borrow_mut().drive_scl(false);
    }

    fn is_set_high(&self) -> bool {
        self.0.borrow().scl
    }
}

/// Delay provider that only adds up the requested time
pub struct MockDelay {
    elapsed: Rc<Cell<u64>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self {
            elapsed: Rc::new(Cell::new(0)),
        }
    }

    /// Handle to the running total in nanoseconds
    pub fn elapsed(&self) -> Rc<Cell<u64>> {
        self.elapsed.clone()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed.set(self.elapsed.get() + ns as u64);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Address, control byte and payload of one transfer
    Transfer(Vec<u8>),
    Delay(u32),
    Reset(bool),
}

#[derive(Default)]
pub struct BusLog {
    pub events: Vec<Event>,
    current: Option<Vec<u8>>,
    /// Make every byte go unacknowledged
    pub nack: bool,
}

impl BusLog {
    pub fn transfers(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Transfer(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    fn payloads(&self, control: u8) -> Vec<Vec<u8>> {
        self.transfers()
            .into_iter()
            .filter(|t| t.len() >= 2 && t[1] == control)
            .map(|t| t[2..].to_vec())
            .collect()
    }

    /// Command transfers without address and control byte
    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.payloads(0x00)
    }

    /// Data transfers without address and control byte
    pub fn data(&self) -> Vec<Vec<u8>> {
        self.payloads(0x40)
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Delay(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }
}

/// Transport that logs transfers instead of toggling pins
pub struct Recorder(Rc<RefCell<BusLog>>);

impl Recorder {
    pub fn new() -> (Self, Rc<RefCell<BusLog>>) {
        let log = Rc::new(RefCell::new(BusLog::default()));
        (Self(log.clone()), log)
    }
}

impl Transport for Recorder {
    fn start(&mut self) {
        self.0.borrow_mut().current = Some(Vec::new());
    }

    fn stop(&mut self) {
        let mut log = self.0.borrow_mut();
        if let Some(bytes) = log.current.take() {
            log.events.push(Event::Transfer(bytes));
        }
    }

    fn send_byte(&mut self, byte: u8) -> bool {
        let mut log = self.0.borrow_mut();
        if let Some(bytes) = log.current.as_mut() {
            bytes.push(byte);
        }
        !log.nack
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(Event::Delay(ms));
    }
}

/// Reset line that logs its edges into a [`BusLog`]
pub struct MockReset {
    log: Rc<RefCell<BusLog>>,
    level: bool,
}

impl MockReset {
    pub fn new(log: &Rc<RefCell<BusLog>>) -> Self {
        Self {
            log: log.clone(),
            level: false,
        }
    }
}

impl OutputPin for MockReset {
    fn set_high(&mut self) {
        self.level = true;
        self.log.borrow_mut().events.push(Event::Reset(true));
    }

    fn set_low(&mut self) {
        self.level = false;
        self.log.borrow_mut().events.push(Event::Reset(false));
    }

    fn is_set_high(&self) -> bool {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(sda: &mut MockSda, scl: &mut MockScl) {
        sda.set_high();
        scl.set_high();
        sda.set_low();
        scl.set_low();
    }

    fn stop(sda: &mut MockSda, scl: &mut MockScl) {
        sda.set_low();
        scl.set_high();
        sda.set_high();
    }

    fn clock_bit(sda: &mut MockSda, scl: &mut MockScl, bit: bool) {
        sda.set_state(bit);
        scl.set_high();
        scl.set_low();
    }

    #[test]
    fn test_stop_after_ack_is_clean() {
        let wire = Wire::new();
        let (mut sda, mut scl) = (wire.sda(), wire.scl());

        start(&mut sda, &mut scl);
        for bit in [true, false, true, false, false, true, false, true] {
            clock_bit(&mut sda, &mut scl, bit);
        }
        sda.set_mode(PinMode::InputPullUp);
        scl.set_high();
        assert!(sda.is_low());
        scl.set_low();
        sda.set_mode(PinMode::Output);
        stop(&mut sda, &mut scl);

        let state = wire.state();
        assert_eq!(state.frames, vec![vec![0xA5]]);
        assert_eq!(state.protocol_errors, 0);
    }

    #[test]
    fn test_stop_inside_byte_is_flagged() {
        let wire = Wire::new();
        let (mut sda, mut scl) = (wire.sda(), wire.scl());

        start(&mut sda, &mut scl);
        for _ in 0..3 {
            clock_bit(&mut sda, &mut scl, true);
        }
        stop(&mut sda, &mut scl);

        let state = wire.state();
        assert_eq!(state.frames, vec![Vec::<u8>::new()]);
        assert_eq!(state.protocol_errors, 1);
    }

    #[test]
    fn test_empty_frame_is_clean() {
        let wire = Wire::new();
        let (mut sda, mut scl) = (wire.sda(), wire.scl());

        start(&mut sda, &mut scl);
        stop(&mut sda, &mut scl);

        assert_eq!(wire.state().protocol_errors, 0);
        assert_eq!(wire.state().frames.len(), 1);
    }
}
