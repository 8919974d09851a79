//! Monochron Hardware Abstraction Layer
//!
//! This crate defines the few hardware services the Monochron display driver
//! needs from a board: digital lines it can drive, release and sample, and the
//! timing of the software-clocked bus built on top of them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  monochron-display (driver + graphics)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  monochron-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  embedded-hal 1.0 pins via `adapter`,   │
//! │  or a chip HAL implementing the traits  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::FlexPin`] - Line that switches between driving and listening
//! - [`i2c::BusTiming`] - Settle delay of the bit-banged two-wire bus
//!
//! Delays use [`embedded_hal::delay::DelayNs`] directly.

#![no_std]
#![deny(unsafe_code)]

pub mod adapter;
pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use adapter::{OpenDrain, PushPull};
pub use gpio::{FlexPin, InputPin, NoPin, OutputPin, PinMode};
pub use i2c::{BusTiming, DEFAULT_ADDRESS, ALTERNATE_ADDRESS};
