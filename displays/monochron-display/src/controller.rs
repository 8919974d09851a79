//! Controller session
//!
//! Speaks the SSD1306 and SH1106 command sets over a [`Transport`]. Every
//! command with its arguments goes out as one command-mode transfer; pixel
//! data goes out one page per data-mode transfer.

use crate::config::{ControllerFamily, DisplayConfig};
use crate::error::ConfigError;
use crate::framebuffer::PageBuffer;
use crate::transport::Transport;

/// Control byte announcing a command stream
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte announcing display RAM data
pub const CONTROL_DATA: u8 = 0x40;

/// Controller commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_DC_DC: u8 = 0xAD;
    pub const SET_VERTICAL_SCROLL_AREA: u8 = 0xA3;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const ACTIVATE_SCROLL: u8 = 0x2F;

    pub const MEMORY_MODE_PAGE: u8 = 0x02;
    pub const CHARGE_PUMP_ON: u8 = 0x14;
    pub const CHARGE_PUMP_OFF: u8 = 0x10;
    pub const DC_DC_ON: u8 = 0x8B;
    pub const DC_DC_OFF: u8 = 0x8A;
}

/// Highest page index the scroll commands accept
const LAST_SCROLL_PAGE: u8 = 7;

/// Default contrast after power-up
pub const DEFAULT_CONTRAST: u8 = 0x80;

/// Continuous scroll performed by the controller itself
///
/// There is no plain vertical effect; the diagonal ones move the whole
/// display vertically and the selected pages horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScrollEffect {
    /// Stop scrolling
    #[default]
    None = 0x00,
    HorizontalRight = 0x26,
    HorizontalLeft = 0x27,
    DiagonalRight = 0x29,
    DiagonalLeft = 0x2A,
}

impl ScrollEffect {
    /// Command opcode, 0 for [`ScrollEffect::None`]
    pub const fn code(self) -> u8 {
        self as u8
    }

    const fn is_diagonal(self) -> bool {
        matches!(self, Self::DiagonalRight | Self::DiagonalLeft)
    }
}

/// Command session with one display controller
pub struct Controller<T> {
    transport: T,
    address: u8,
    family: ControllerFamily,
    width: u8,
    height: u8,
}

impl<T: Transport> Controller<T> {
    /// Bind a transport to the controller described by `config`
    ///
    /// Nothing is sent until [`Controller::power_up`]. Fails when `config`
    /// does not describe a supported panel.
    pub fn new(transport: T, config: &DisplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport,
            address: config.address,
            family: config.family,
            width: config.width,
            height: config.height,
        })
    }

    /// Command dialect in use
    pub fn family(&self) -> ControllerFamily {
        self.family
    }

    /// 7-bit bus address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Send one command with its arguments
    ///
    /// Returns whether the controller acknowledged every byte.
    pub fn command(&mut self, bytes: &[u8]) -> bool {
        let acked = self.transport.write(self.address, CONTROL_COMMAND, bytes);
        if !acked {
            warn!("display {=u8:#x}: command not acknowledged", self.address);
        }
        acked
    }

    /// Send display RAM data at the current address
    pub fn data(&mut self, bytes: &[u8]) -> bool {
        let acked = self.transport.write(self.address, CONTROL_DATA, bytes);
        if !acked {
            warn!("display {=u8:#x}: data not acknowledged", self.address);
        }
        acked
    }

    /// Run the power-up sequence, ending with the display switched on
    pub fn power_up(&mut self) {
        info!(
            "init {=u8}x{=u8} display at {=u8:#x}",
            self.width,
            self.height,
            self.address
        );

        self.command(&[cmd::DISPLAY_OFF]);
        self.command(&[cmd::SET_CLOCK_DIV, 0x80]);
        self.command(&[cmd::SET_MUX_RATIO, self.height - 1]);
        self.command(&[cmd::SET_DISPLAY_OFFSET, 0x00]);
        self.command(&[cmd::SET_START_LINE]);
        self.command(&self.supply_command(true));
        if self.family == ControllerFamily::Ssd1306 {
            self.command(&[cmd::SET_MEMORY_MODE, cmd::MEMORY_MODE_PAGE]);
        }
        self.command(&[cmd::SET_SEG_REMAP]);
        self.command(&[cmd::SET_COM_SCAN_DEC]);
        self.command(&[cmd::SET_COM_PINS, com_pins(self.height)]);
        self.command(&[cmd::SET_CONTRAST, DEFAULT_CONTRAST]);
        self.command(&[cmd::SET_PRECHARGE, 0x22]);
        self.command(&[cmd::SET_VCOM_DETECT, 0x20]);
        self.command(&[cmd::DISPLAY_RAM]);
        self.command(&[cmd::SET_NORMAL]);
        if self.family.has_hardware_scroll() {
            self.command(&[cmd::DEACTIVATE_SCROLL]);
        }
        self.command(&[cmd::DISPLAY_ON]);
    }

    /// Switch the panel and its supply on or off; RAM is kept
    pub fn set_power(&mut self, enable: bool) {
        debug!("display power {=bool}", enable);
        if enable {
            self.command(&self.supply_command(true));
            self.command(&[cmd::DISPLAY_ON]);
        } else {
            self.command(&[cmd::DISPLAY_OFF]);
            self.command(&self.supply_command(false));
        }
    }

    /// Swap lit and dark pixels in hardware
    pub fn set_invert(&mut self, enable: bool) {
        self.command(&[if enable { cmd::SET_INVERSE } else { cmd::SET_NORMAL }]);
    }

    /// Panel brightness, 0 darkest
    pub fn set_contrast(&mut self, value: u8) {
        self.command(&[cmd::SET_CONTRAST, value]);
    }

    /// Start or stop continuous hardware scrolling of pages
    /// `first_page..=last_page`
    ///
    /// Pages beyond 7 are clamped. The SH1106 cannot scroll on its own; the
    /// request is logged and dropped.
    pub fn set_scrolling(&mut self, effect: ScrollEffect, first_page: u8, last_page: u8) {
        if !self.family.has_hardware_scroll() {
            warn!("hardware scroll not supported by SH1106, ignored");
            return;
        }

        self.command(&[cmd::DEACTIVATE_SCROLL]);
        if effect == ScrollEffect::None {
            return;
        }

        let first = first_page.min(LAST_SCROLL_PAGE);
        let last = last_page.min(LAST_SCROLL_PAGE);
        if effect.is_diagonal() {
            self.command(&[cmd::SET_VERTICAL_SCROLL_AREA, 0x00, self.height]);
            self.command(&[effect.code(), 0x00, first, 0x00, last, 0x01]);
        } else {
            self.command(&[effect.code(), 0x00, first, 0x00, last, 0x00, 0xFF]);
        }
        self.command(&[cmd::ACTIVATE_SCROLL]);
    }

    /// Point the RAM address at column 0 of `page` and write `bytes` there
    ///
    /// At most one panel width is sent.
    pub fn write_page(&mut self, page: u8, bytes: &[u8]) {
        let bytes = &bytes[..bytes.len().min(self.width as usize)];
        let column = self.family.column_offset();
        self.command(&[
            cmd::SET_PAGE_ADDR | (page & 0x07),
            cmd::SET_LOW_COLUMN | (column & 0x0F),
            cmd::SET_HIGH_COLUMN | (column >> 4),
        ]);
        self.data(bytes);
    }

    /// Copy the whole framebuffer to display RAM
    pub fn flush(&mut self, buffer: &PageBuffer) {
        trace!("flush {=u8} pages", buffer.pages());
        for page in 0..buffer.pages() {
            if let Some(bytes) = buffer.page(page) {
                self.write_page(page, bytes);
            }
        }
    }

    /// Busy-wait using the transport's timer
    pub fn delay_ms(&mut self, ms: u32) {
        self.transport.delay_ms(ms);
    }

    /// End the session and hand back the transport
    pub fn release(self) -> T {
        self.transport
    }

    /// Charge pump (SSD1306) or DC-DC converter (SH1106) control
    fn supply_command(&self, enable: bool) -> [u8; 2] {
        match (self.family, enable) {
            (ControllerFamily::Ssd1306, true) => [cmd::SET_CHARGE_PUMP, cmd::CHARGE_PUMP_ON],
            (ControllerFamily::Ssd1306, false) => [cmd::SET_CHARGE_PUMP, cmd::CHARGE_PUMP_OFF],
            (ControllerFamily::Sh1106, true) => [cmd::SET_DC_DC, cmd::DC_DC_ON],
            (ControllerFamily::Sh1106, false) => [cmd::SET_DC_DC, cmd::DC_DC_OFF],
        }
    }
}

/// COM pin hardware configuration for the panel height
const fn com_pins(height: u8) -> u8 {
    if height > 32 {
        0x12
    } else {
        0x02
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Color;
    use crate::mock::{BusLog, Recorder};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(config: DisplayConfig) -> (Controller<Recorder>, Rc<RefCell<BusLog>>) {
        let (recorder, log) = Recorder::new();
        (Controller::new(recorder, &config).unwrap(), log)
    }

    #[test]
    fn test_ssd1306_power_up() {
        let (mut ctl, log) = session(DisplayConfig::new(128, 32));
        ctl.power_up();
        let cmds = log.borrow().commands();

        assert_eq!(cmds.first(), Some(&vec![0xAE]));
        assert_eq!(cmds.last(), Some(&vec![0xAF]));
        assert!(cmds.contains(&vec![0xA8, 31]));
        assert!(cmds.contains(&vec![0xDA, 0x02]));
        assert!(cmds.contains(&vec![0x8D, 0x14]));
        assert!(cmds.contains(&vec![0x20, 0x02]));
        assert!(cmds.contains(&vec![0x81, 0x80]));
        assert!(cmds.contains(&vec![0xA6]));
        assert!(cmds.contains(&vec![0x2E]));
        // every transfer is addressed to 0x3C for writing
        assert!(log.borrow().transfers().iter().all(|t| t[0] == 0x78));
        assert!(log.borrow().data().is_empty());
    }

    #[test]
    fn test_sh1106_power_up() {
        let (mut ctl, log) = session(DisplayConfig::sh1106_128x64());
        ctl.power_up();
        let cmds = log.borrow().commands();

        assert!(cmds.contains(&vec![0xA8, 63]));
        assert!(cmds.contains(&vec![0xDA, 0x12]));
        assert!(cmds.contains(&vec![0xAD, 0x8B]));
        assert!(!cmds.contains(&vec![0x8D, 0x14]));
        assert!(!cmds.iter().any(|c| c[0] == 0x20));
        assert!(!cmds.contains(&vec![0x2E]));
    }

    #[test]
    fn test_power_invert_contrast() {
        let (mut ctl, log) = session(DisplayConfig::new(128, 64));
        ctl.set_power(false);
        ctl.set_power(true);
        ctl.set_invert(true);
        ctl.set_invert(false);
        ctl.set_contrast(0x10);
        assert_eq!(
            log.borrow().commands(),
            vec![
                vec![0xAE],
                vec![0x8D, 0x10],
                vec![0x8D, 0x14],
                vec![0xAF],
                vec![0xA7],
                vec![0xA6],
                vec![0x81, 0x10],
            ]
        );

        let (mut ctl, log) = session(DisplayConfig::sh1106_128x64());
        ctl.set_power(false);
        assert_eq!(log.borrow().commands(), vec![vec![0xAE], vec![0xAD, 0x8A]]);
    }

    #[test]
    fn test_horizontal_scroll() {
        let (mut ctl, log) = session(DisplayConfig::new(128, 64));
        ctl.set_scrolling(ScrollEffect::HorizontalLeft, 2, 9);
        assert_eq!(
            log.borrow().commands(),
            vec![
                vec![0x2E],
                vec![0x27, 0x00, 2, 0x00, 7, 0x00, 0xFF],
                vec![0x2F],
            ]
        );
    }

    #[test]
    fn test_diagonal_scroll() {
        let (mut ctl, log) = session(DisplayConfig::new(128, 32));
        ctl.set_scrolling(ScrollEffect::DiagonalRight, 0, 3);
        assert_eq!(
            log.borrow().commands(),
            vec![
                vec![0x2E],
                vec![0xA3, 0x00, 32],
                vec![0x29, 0x00, 0, 0x00, 3, 0x01],
                vec![0x2F],
            ]
        );
    }

    #[test]
    fn test_stop_scroll() {
        let (mut ctl, log) = session(DisplayConfig::new(128, 32));
        ctl.set_scrolling(ScrollEffect::None, 0, 7);
        assert_eq!(log.borrow().commands(), vec![vec![0x2E]]);
    }

    #[test]
    fn test_sh1106_ignores_scroll() {
        let (mut ctl, log) = session(DisplayConfig::sh1106_128x64());
        ctl.set_scrolling(ScrollEffect::HorizontalRight, 0, 7);
        assert!(log.borrow().transfers().is_empty());
    }

    #[test]
    fn test_flush_pages() {
        let config = DisplayConfig::new(128, 32);
        let (mut ctl, log) = session(config);
        let mut buffer = PageBuffer::for_config(&config).unwrap();
        buffer.clear(Color::White);
        ctl.flush(&buffer);

        let log = log.borrow();
        let data = log.data();
        assert_eq!(data.len(), 4);
        assert!(data.iter().all(|page| page.len() == 128));
        assert!(data.iter().flatten().all(|&b| b == 0xFF));
        assert_eq!(
            log.commands(),
            vec![
                vec![0xB0, 0x00, 0x10],
                vec![0xB1, 0x00, 0x10],
                vec![0xB2, 0x00, 0x10],
                vec![0xB3, 0x00, 0x10],
            ]
        );
    }

    #[test]
    fn test_sh1106_column_offset() {
        let config = DisplayConfig::sh1106_128x64();
        let (mut ctl, log) = session(config);
        let buffer = PageBuffer::for_config(&config).unwrap();
        ctl.flush(&buffer);

        let log = log.borrow();
        assert_eq!(log.data().len(), 8);
        assert_eq!(log.commands()[5], vec![0xB5, 0x02, 0x10]);
    }

    #[test]
    fn test_nack_reported() {
        let (mut ctl, log) = session(DisplayConfig::new(128, 32));
        assert!(ctl.command(&[0xAF]));
        log.borrow_mut().nack = true;
        assert!(!ctl.command(&[0xAF]));
        // the transfer still happened
        assert_eq!(log.borrow().commands().len(), 2);
    }

    #[test]
    fn test_scroll_effect_codes() {
        assert_eq!(ScrollEffect::None.code(), 0x00);
        assert_eq!(ScrollEffect::HorizontalRight.code(), 0x26);
        assert_eq!(ScrollEffect::HorizontalLeft.code(), 0x27);
        assert_eq!(ScrollEffect::DiagonalRight.code(), 0x29);
        assert_eq!(ScrollEffect::DiagonalLeft.code(), 0x2A);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let (recorder, log) = Recorder::new();
        let result = Controller::new(recorder, &DisplayConfig::new(128, 0));
        assert_eq!(result.err(), Some(ConfigError::UnsupportedHeight(0)));

        let (recorder, _) = Recorder::new();
        let result = Controller::new(recorder, &DisplayConfig::new(0, 32));
        assert_eq!(result.err(), Some(ConfigError::UnsupportedWidth(0)));
        assert!(log.borrow().events.is_empty());
    }
}
