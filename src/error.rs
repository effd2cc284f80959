use core::fmt::{self, Debug};
use embedded_hal::i2c::ErrorType;

/// The error type used by this library.
///
/// This wraps the I2C bus error and adds the driver's own argument checks on
/// top of that. A failed readback comparison is not an error, see
/// [`Verification`](crate::Verification).
pub enum Error<I2C: ErrorType> {
    /// An I2C transfer failed (NACK, arbitration loss, timeout...). Pages
    /// written before the failing transfer stay written.
    I2c(I2C::Error),
    /// The requested range runs past the end of the device.
    OutOfBounds,
    /// The device address does not fit in 7 bits.
    InvalidBusAddress,
    /// Zero pages, or more than the 16-bit address register can reach.
    InvalidPageCount,
}

#[cfg(feature = "defmt")]
impl<I2C: ErrorType> defmt::Format for Error<I2C> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::I2c(_i2c) => defmt::write!(fmt, "Error::I2c"),
            Error::OutOfBounds => defmt::write!(fmt, "Error::OutOfBounds"),
            Error::InvalidBusAddress => defmt::write!(fmt, "Error::InvalidBusAddress"),
            Error::InvalidPageCount => defmt::write!(fmt, "Error::InvalidPageCount"),
        }
    }
}

impl<I2C: ErrorType> Debug for Error<I2C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(i2c) => write!(f, "Error::I2c({:?})", i2c),
            Error::OutOfBounds => write!(f, "Error::OutOfBounds"),
            Error::InvalidBusAddress => write!(f, "Error::InvalidBusAddress"),
            Error::InvalidPageCount => write!(f, "Error::InvalidPageCount"),
        }
    }
}
