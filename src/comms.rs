/// Refer to datasheet:
/// https://www.onsemi.com/pdf/datasheet/cat24c32-d.pdf
use crate::error::Error;
use crate::paging::{page_chunks, serialize_address, ADDRESS_SPACE, PAGE_SIZE};
use crate::traits::EepromDevice;
use crate::verify::{first_mismatch, Verification};
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c};

/// Wait after each transaction. Covers the internal write cycle (tWR) after a
/// write and the minimum bus-free time between back-to-back transfers.
pub const SETTLE_TIME_MS: u32 = 5;

/// Checks the construction parameters shared by the blocking and async drivers.
pub(crate) fn check_config<I2C: ErrorType>(address: u8, page_count: u16) -> Result<(), Error<I2C>> {
    if address > 0x7F {
        return Err(Error::InvalidBusAddress);
    }
    if page_count == 0 || page_count as usize * PAGE_SIZE > ADDRESS_SPACE {
        return Err(Error::InvalidPageCount);
    }
    Ok(())
}

/// Rejects writes running past the last byte of the device.
pub(crate) fn check_range<I2C: ErrorType>(
    offset: u16,
    len: usize,
    capacity: usize,
) -> Result<(), Error<I2C>> {
    if offset as usize + len > capacity {
        return Err(Error::OutOfBounds);
    }
    Ok(())
}

/// Builds `[addr_hi, addr_lo, data...]` for a single page write and returns
/// the frame length.
pub(crate) fn write_frame(offset: u16, data: &[u8], frame: &mut [u8; PAGE_SIZE + 2]) -> usize {
    debug_assert!(data.len() <= PAGE_SIZE);
    frame[..2].copy_from_slice(&serialize_address(offset));
    frame[2..2 + data.len()].copy_from_slice(data);
    2 + data.len()
}

/// Blocking CAT24C32 driver.
///
/// The bus is borrowed for the lifetime of the driver and never
/// reconfigured; callers sharing one bus serialize access themselves.
pub struct EepromI2c<'a, I2C, D> {
    i2c: &'a mut I2C,
    delay: D,
    address: u8,
    page_count: u16,
}

impl<I2C, D> Debug for EepromI2c<'_, I2C, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EepromI2c")
            .field("address", &self.address)
            .field("page_count", &self.page_count)
            .finish()
    }
}

impl<I2C, D> EepromDevice for EepromI2c<'_, I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Error<I2C>;

    /// Random/sequential read (datasheet "Read Operations").
    /// A dummy write of the 2 address bytes loads the address counter, then a
    /// plain read clocks out `buf.len()` bytes. The counter rolls over from
    /// the last byte of the array to 0, so a read may cross page and array
    /// boundaries.
    fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Error<I2C>> {
        if buf.is_empty() {
            return Ok(());
        }
        self.i2c
            .write(self.address, &serialize_address(offset))
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SETTLE_TIME_MS);
        self.i2c.read(self.address, buf).map_err(Error::I2c)?;
        self.delay.delay_ms(SETTLE_TIME_MS);
        Ok(())
    }

    /// Page write, split so that no transaction crosses a page boundary.
    fn write(&mut self, offset: u16, data: &[u8]) -> Result<(), Error<I2C>> {
        check_range::<I2C>(offset, data.len(), self.capacity())?;
        for chunk in page_chunks(offset, data.len()) {
            self.write_transaction(chunk.address, &data[chunk.range()])?;
        }
        Ok(())
    }

    fn write_checked(&mut self, offset: u16, data: &[u8]) -> Result<Verification, Error<I2C>> {
        self.write(offset, data)?;
        self.verify(offset, data)
    }

    /// Writes a page of zeros to every page, first to last. No readback.
    fn erase(&mut self) -> Result<(), Error<I2C>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Erasing {=u16} pages", self.page_count);

        let zeros = [0u8; PAGE_SIZE];
        for page in 0..self.page_count {
            self.write_transaction((page as usize * PAGE_SIZE) as u16, &zeros)?;
        }
        Ok(())
    }
}

impl<'a, I2C, D> EepromI2c<'a, I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Binds a driver to the device at 7-bit `address` on `i2c`. The page
    /// count comes from the caller; the device is not probed.
    pub fn init(
        i2c: &'a mut I2C,
        delay: D,
        address: u8,
        page_count: u16,
    ) -> Result<Self, Error<I2C>> {
        check_config::<I2C>(address, page_count)?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "EEPROM at {=u8:#x}: {=u16} pages of {=usize} bytes",
            address,
            page_count,
            PAGE_SIZE
        );
        Ok(Self {
            i2c,
            delay,
            address,
            page_count,
        })
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn page_count(&self) -> u16 {
        self.page_count
    }

    /// Total size in bytes.
    pub fn capacity(&self) -> usize {
        self.page_count as usize * PAGE_SIZE
    }

    /// Byte write followed by a single byte readback.
    pub fn write_byte(&mut self, value: u8, offset: u16) -> Result<Verification, Error<I2C>> {
        self.write_checked(offset, &[value])
    }

    pub fn read_byte(&mut self, offset: u16) -> Result<u8, Error<I2C>> {
        let mut buf = [0u8; 1];
        self.read(offset, &mut buf)?;
        Ok(buf[0])
    }

    /// One bus write of at most a page, then the write cycle wait.
    fn write_transaction(&mut self, offset: u16, data: &[u8]) -> Result<(), Error<I2C>> {
        let mut frame = [0u8; PAGE_SIZE + 2];
        let len = write_frame(offset, data, &mut frame);
        self.i2c
            .write(self.address, &frame[..len])
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SETTLE_TIME_MS);
        Ok(())
    }

    /// Reads back what was just written. The address is set once, then the
    /// range is clocked out with current-address reads through a page-sized
    /// buffer; the device counter advances across reads.
    fn verify(&mut self, offset: u16, data: &[u8]) -> Result<Verification, Error<I2C>> {
        if data.is_empty() {
            return Ok(Verification::Verified);
        }
        self.i2c
            .write(self.address, &serialize_address(offset))
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SETTLE_TIME_MS);

        let mut readback = [0u8; PAGE_SIZE];
        let mut status = Verification::Verified;
        for (i, expected) in data.chunks(PAGE_SIZE).enumerate() {
            let actual = &mut readback[..expected.len()];
            self.i2c
                .read(self.address, actual)
                .map_err(Error::I2c)?;
            if status.is_verified() {
                if let Some(pos) = first_mismatch(expected, actual) {
                    let offset = (offset as usize + i * PAGE_SIZE + pos) as u16;
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Readback mismatch at {=u16:#x}", offset);
                    status = Verification::Mismatch { offset };
                }
            }
        }
        self.delay.delay_ms(SETTLE_TIME_MS);
        Ok(status)
    }
}
