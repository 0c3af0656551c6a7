use embedded_hal_async::i2c::I2c;

use crate::config::BusConfig;

/// Byte-level bus access used by the driver.
///
/// `init` is called at the start of every device (re)initialization, so an
/// implementation that owns the bus peripheral can tear it down and recreate
/// it with `config`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Error: core::fmt::Debug;

    async fn init(&mut self, config: &BusConfig) -> Result<(), Self::Error>;

    async fn write(
        &mut self,
        address: u8,
        bytes: &[u8],
    ) -> Result<(), Self::Error>;

    /// Fills `buffer` completely or fails.
    async fn read(
        &mut self,
        address: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Adapter for an already configured `embedded-hal-async` I2C device, e.g. a
/// shared-bus `I2cDevice`. Bus bring-up belongs to whoever owns the bus, so
/// `init` does nothing.
pub struct I2cTransport<I> {
    i2c: I,
}

impl<I: I2c> I2cTransport<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> Transport for I2cTransport<I> {
    type Error = I::Error;

    async fn init(&mut self, _config: &BusConfig) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn write(
        &mut self,
        address: u8,
        bytes: &[u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes).await
    }

    async fn read(
        &mut self,
        address: u8,
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.read(address, buffer).await
    }
}
