use crate::verify::Verification;

pub trait EepromDevice {
    type Error;

    /// Reads device contents into `buf`, starting at `offset`. The device's
    /// address counter wraps at the end of the array.
    fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `data` starting at `offset`, one transaction per page touched.
    /// Not transactional: pages written before a failure stay written.
    fn write(&mut self, offset: u16, data: &[u8]) -> Result<(), Self::Error>;

    /// Writes `data`, reads it back and compares.
    fn write_checked(&mut self, offset: u16, data: &[u8]) -> Result<Verification, Self::Error>;

    /// Fills every page with zeros.
    fn erase(&mut self) -> Result<(), Self::Error>;
}

#[allow(async_fn_in_trait)]
pub trait AsyncEepromDevice {
    type Error;

    /// Reads device contents into `buf`, starting at `offset`.
    async fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `data` starting at `offset`, one transaction per page touched.
    async fn write(&mut self, offset: u16, data: &[u8]) -> Result<(), Self::Error>;

    /// Writes `data`, reads it back and compares.
    async fn write_checked(
        &mut self,
        offset: u16,
        data: &[u8],
    ) -> Result<Verification, Self::Error>;

    /// Fills every page with zeros.
    async fn erase(&mut self) -> Result<(), Self::Error>;
}
