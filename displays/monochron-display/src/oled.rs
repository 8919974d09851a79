//! Driver facade
//!
//! [`Oled`] owns the controller session, the framebuffer and the optional
//! reset line. Drawing only changes the framebuffer; [`Oled::display`] makes
//! it visible.

use embedded_hal::delay::DelayNs;
use monochron_hal::gpio::{FlexPin, OutputPin};
use monochron_hal::NoPin;

use crate::config::DisplayConfig;
use crate::controller::{Controller, ScrollEffect};
use crate::draw::{Color, FillMode};
use crate::error::ConfigError;
use crate::framebuffer::PageBuffer;
use crate::source::ByteSource;
use crate::text::TextSize;
use crate::transport::{BitBang, Transport};

/// Reset pulse length, low then high
const RESET_PULSE_MS: u32 = 10;

/// Monochrome OLED display
pub struct Oled<T, RST = NoPin> {
    session: Controller<T>,
    buffer: PageBuffer,
    reset: Option<RST>,
    config: DisplayConfig,
}

impl<SDA, SCL, D, RST> Oled<BitBang<SDA, SCL, D>, RST>
where
    SDA: FlexPin,
    SCL: OutputPin,
    D: DelayNs,
    RST: OutputPin,
{
    /// Drive the display over two GPIO lines
    ///
    /// Bus speed comes from `config.timing`. Pass `None` as reset when the
    /// reset pin is tied to the MCU reset or an RC circuit.
    pub fn bit_banged(
        config: DisplayConfig,
        sda: SDA,
        scl: SCL,
        reset: Option<RST>,
        delay: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = BitBang::new(sda, scl, delay, config.timing);
        Self::new(config, transport, reset)
    }
}

impl<T: Transport> Oled<T, NoPin> {
    /// Driver without a reset line
    pub fn without_reset(config: DisplayConfig, transport: T) -> Result<Self, ConfigError> {
        Self::new(config, transport, None)
    }
}

impl<T, RST> Oled<T, RST>
where
    T: Transport,
    RST: OutputPin,
{
    /// Validate `config` and set up an all-black framebuffer
    ///
    /// Nothing is sent to the display until [`Oled::init`].
    pub fn new(config: DisplayConfig, transport: T, reset: Option<RST>) -> Result<Self, ConfigError> {
        let session = Controller::new(transport, &config)?;
        let buffer = PageBuffer::for_config(&config)?;
        Ok(Self {
            session,
            buffer,
            reset,
            config,
        })
    }

    /// Reset and power up the controller, then show a black screen
    pub fn init(&mut self) {
        if let Some(reset) = self.reset.as_mut() {
            debug!("pulse reset line");
            reset.set_low();
            self.session.delay_ms(RESET_PULSE_MS);
            reset.set_high();
            self.session.delay_ms(RESET_PULSE_MS);
        }

        self.session.power_up();
        self.buffer.clear(Color::Black);
        self.display();
    }

    /// Switch the display on or off; the framebuffer is kept
    pub fn set_power(&mut self, enable: bool) {
        self.session.set_power(enable);
    }

    /// Invert all pixels in hardware
    pub fn set_invert(&mut self, enable: bool) {
        self.session.set_invert(enable);
    }

    /// Set brightness
    pub fn set_contrast(&mut self, value: u8) {
        self.session.set_contrast(value);
    }

    /// Start or stop continuous hardware scrolling
    ///
    /// Scrolls pages `first_page..=last_page` (0-7). Runs on the controller
    /// without further bus traffic and without changing the framebuffer.
    pub fn set_scrolling(&mut self, effect: ScrollEffect, first_page: u8, last_page: u8) {
        self.session.set_scrolling(effect, first_page, last_page);
    }

    /// Scroll the framebuffer content up by `num_lines` pixel rows
    ///
    /// With `delay_ms == 0` only the framebuffer changes. Otherwise the
    /// content moves one row at a time and every step is flushed and
    /// followed by `delay_ms` milliseconds, which animates the scroll.
    pub fn scroll_up(&mut self, num_lines: u8, delay_ms: u8) {
        if delay_ms == 0 {
            self.buffer.shift_up(num_lines);
            return;
        }

        for _ in 0..num_lines.min(self.buffer.height()) {
            self.buffer.shift_up(1);
            self.display();
            self.session.delay_ms(delay_ms as u32);
        }
    }

    /// Copy the framebuffer to the display
    pub fn display(&mut self) {
        self.session.flush(&self.buffer);
    }

    /// Fill the framebuffer
    pub fn clear(&mut self, color: Color) {
        self.buffer.clear(color);
    }

    /// Set one pixel, ignored outside the screen
    pub fn draw_pixel(&mut self, x: u8, y: u8, color: Color) {
        self.buffer.draw_pixel(x, y, color);
    }

    /// Draw an 8-pixel vertical strip, bit 0 at row `y`
    pub fn draw_byte(&mut self, x: u8, y: u8, b: u8, color: Color) {
        self.buffer.draw_byte(x, y, b, color);
    }

    /// See [`PageBuffer::draw_line`]
    pub fn draw_line(&mut self, x0: u8, y0: u8, x1: u8, y1: u8, color: Color) {
        self.buffer.draw_line(x0, y0, x1, y1, color);
    }

    /// See [`PageBuffer::draw_circle`]
    pub fn draw_circle(&mut self, x: u8, y: u8, radius: u8, fill: FillMode, color: Color) {
        self.buffer.draw_circle(x, y, radius, fill, color);
    }

    /// Draw the rectangle spanning both corners, edges included
    pub fn draw_rectangle(&mut self, x0: u8, y0: u8, x1: u8, y1: u8, fill: FillMode, color: Color) {
        self.buffer.draw_rectangle(x0, y0, x1, y1, fill, color);
    }

    /// See [`PageBuffer::draw_bitmap`]
    pub fn draw_bitmap(&mut self, x: u8, y: u8, width: u8, height: u8, data: &[u8], color: Color) {
        self.buffer.draw_bitmap(x, y, width, height, data, color);
    }

    /// See [`PageBuffer::draw_bitmap_from`]
    pub fn draw_bitmap_from<S: ByteSource + ?Sized>(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        source: &S,
        color: Color,
    ) {
        self.buffer.draw_bitmap_from(x, y, width, height, source, color);
    }

    /// See [`PageBuffer::draw_bitmap_mirrored`]
    pub fn draw_bitmap_mirrored(
        &mut self,
        x: u8,
        y: u8,
        width: u8,
        height: u8,
        data: &[u8],
        color: Color,
    ) {
        self.buffer.draw_bitmap_mirrored(x, y, width, height, data, color);
    }

    /// Draw one glyph with its top-left corner at (`x`, `y`)
    pub fn draw_character(&mut self, x: u8, y: u8, c: char, size: TextSize, color: Color) {
        self.buffer.draw_character(x, y, c, size, color);
    }

    /// See [`PageBuffer::draw_string`]
    pub fn draw_string(&mut self, x: u8, y: u8, s: &str, size: TextSize, color: Color) {
        self.buffer.draw_string(x, y, s, size, color);
    }

    /// See [`PageBuffer::draw_string_from`]
    pub fn draw_string_from<S: ByteSource + ?Sized>(
        &mut self,
        x: u8,
        y: u8,
        source: &S,
        size: TextSize,
        color: Color,
    ) {
        self.buffer.draw_string_from(x, y, source, size, color);
    }

    /// The framebuffer as it will be flushed
    pub fn buffer(&self) -> &PageBuffer {
        &self.buffer
    }

    /// Direct framebuffer access, e.g. for `embedded-graphics`
    pub fn buffer_mut(&mut self) -> &mut PageBuffer {
        &mut self.buffer
    }

    /// Configuration the driver was built with
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Width in pixels
    pub fn width(&self) -> u8 {
        self.buffer.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u8 {
        self.buffer.height()
    }

    /// Tear down the driver and return the transport and reset line
    pub fn release(self) -> (T, Option<RST>) {
        (self.session.release(), self.reset)
    }
}
