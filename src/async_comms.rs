use core::fmt::Debug;

use crate::comms::{check_config, check_range, write_frame, SETTLE_TIME_MS};
/// Refer to datasheet:
/// https://www.onsemi.com/pdf/datasheet/cat24c32-d.pdf
use crate::error::Error;
use crate::paging::{page_chunks, serialize_address, PAGE_SIZE};
use crate::traits::AsyncEepromDevice;
use crate::verify::{first_mismatch, Verification};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

/// Async CAT24C32 driver. Issues the same transfers, in the same order, as
/// [`EepromI2c`](crate::EepromI2c).
///
/// The bus is borrowed for the lifetime of the driver and never
/// reconfigured; callers sharing one bus serialize access themselves.
pub struct AsyncEepromI2c<'a, I2C, D> {
    i2c: &'a mut I2C,
    delay: D,
    address: u8,
    page_count: u16,
}

impl<I2C, D> Debug for AsyncEepromI2c<'_, I2C, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AsyncEepromI2c")
            .field("address", &self.address)
            .field("page_count", &self.page_count)
            .finish()
    }
}

impl<I2C, D> AsyncEepromDevice for AsyncEepromI2c<'_, I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Error<I2C>;

    /// Dummy write of the address, then a plain read of `buf.len()` bytes.
    async fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Error<I2C>> {
        if buf.is_empty() {
            return Ok(());
        }
        self.i2c
            .write(self.address, &serialize_address(offset))
            .await
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SETTLE_TIME_MS).await;
        self.i2c
            .read(self.address, buf)
            .await
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SETTLE_TIME_MS).await;
        Ok(())
    }

    async fn write(&mut self, offset: u16, data: &[u8]) -> Result<(), Error<I2C>> {
        check_range::<I2C>(offset, data.len(), self.capacity())?;
        for chunk in page_chunks(offset, data.len()) {
            self.write_transaction(chunk.address, &data[chunk.range()])
                .await?;
        }
        Ok(())
    }

    async fn write_checked(
        &mut self,
        offset: u16,
        data: &[u8],
    ) -> Result<Verification, Error<I2C>> {
        self.write(offset, data).await?;
        self.verify(offset, data).await
    }

    async fn erase(&mut self) -> Result<(), Error<I2C>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Erasing {=u16} pages", self.page_count);

        let zeros = [0u8; PAGE_SIZE];
        for page in 0..self.page_count {
            self.write_transaction((page as usize * PAGE_SIZE) as u16, &zeros)
                .await?;
        }
        Ok(())
    }
}

impl<'a, I2C, D> AsyncEepromI2c<'a, I2C, D>
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

    pub fn capacity(&self) -> usize {
        self.page_count as usize * PAGE_SIZE
    }

    pub async fn write_byte(&mut self, value: u8, offset: u16) -> Result<Verification, Error<I2C>> {
        self.write_checked(offset, &[value]).await
    }

    pub async fn read_byte(&mut self, offset: u16) -> Result<u8, Error<I2C>> {
        let mut buf = [0u8; 1];
        self.read(offset, &mut buf).await?;
        Ok(buf[0])
    }

    async fn write_transaction(&mut self, offset: u16, data: &[u8]) -> Result<(), Error<I2C>> {
        let mut frame = [0u8; PAGE_SIZE + 2];
        let len = write_frame(offset, data, &mut frame);
        self.i2c
            .write(self.address, &frame[..len])
            .await
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SETTLE_TIME_MS).await;
        Ok(())
    }

    /// Reads back what was just written. The address is set once, then the
    /// range is clocked out with current-address reads through a page-sized
    /// buffer; the device counter advances across reads.
    async fn verify(&mut self, offset: u16, data: &[u8]) -> Result<Verification, Error<I2C>> {
        if data.is_empty() {
            return Ok(Verification::Verified);
        }
        self.i2c
            .write(self.address, &serialize_address(offset))
            .await
            .map_err(Error::I2c)?;
        self.delay.delay_ms(SETTLE_TIME_MS).await;

        let mut readback = [0u8; PAGE_SIZE];
        let mut status = Verification::Verified;
        for (i, expected) in data.chunks(PAGE_SIZE).enumerate() {
            let actual = &mut readback[..expected.len()];
            self.i2c
                .read(self.address, actual)
                .await
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
        self.delay.delay_ms(SETTLE_TIME_MS).await;
        Ok(status)
    }
}
