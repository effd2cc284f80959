//! Platform agnostic driver for the CAT24C32 family of I2C serial EEPROMs,
//! built on the [`embedded-hal`](https://crates.io/crates/embedded-hal) 1.0
//! traits, with an async twin on
//! [`embedded-hal-async`](https://crates.io/crates/embedded-hal-async).
//!
//! The device is a flat byte array of `page_count * 32` bytes behind a
//! 16-bit address register. Reads may run across the whole array in one
//! transfer; writes are split so that no transfer crosses a 32-byte page,
//! because the device wraps inside the current page instead of moving on.
//!
//! ```rust,no_run
//! # fn example<I2C: embedded_hal::i2c::I2c>(
//! #     i2c: &mut I2C,
//! #     delay: impl embedded_hal::delay::DelayNs,
//! # ) -> Result<(), cat24c32_eeprom_rs::Error<I2C>> {
//! use cat24c32_eeprom_rs::{EepromDevice, EepromI2c, Verification};
//!
//! // 128 pages of 32 bytes = 4 KiB
//! let mut eeprom = EepromI2c::init(i2c, delay, 0x50, 128)?;
//!
//! let status = eeprom.write_checked(0x0014, b"calibration table v2")?;
//! assert_eq!(status, Verification::Verified);
//!
//! let mut buf = [0u8; 20];
//! eeprom.read(0x0014, &mut buf)?;
//! # Ok(())
//! # }
//! ```
//!
//! Writes are not transactional: when a transfer fails partway through a
//! multi-page write, the pages before it are already committed.
//!
//! Logging goes through [`defmt`](https://crates.io/crates/defmt) when the
//! `defmt` feature is enabled.

#![cfg_attr(not(test), no_std)]

pub mod async_comms;
pub mod comms;
pub mod error;
pub mod paging;
pub mod traits;
pub mod verify;

pub use async_comms::AsyncEepromI2c;
pub use comms::{EepromI2c, SETTLE_TIME_MS};
pub use error::Error;
pub use paging::{serialize_address, PAGE_SIZE};
pub use traits::{AsyncEepromDevice, EepromDevice};
pub use verify::Verification;
