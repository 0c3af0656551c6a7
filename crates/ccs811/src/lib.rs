#![cfg_attr(not(test), no_std)]
//! Async driver for the ams CCS811 digital gas sensor (eCO2/TVOC).
//!
//! The driver turns single bus transactions into [`DeviceState`]
//! transitions on a caller-owned [`SensorRecord`]. It never retries on its
//! own; when and how often to re-initialize a faulted device is decided by
//! the [`recovery`] module.

// This must go first so the logging macros are visible to the other modules.
mod fmt;

pub mod config;
pub mod errors;
pub mod record;
pub mod recovery;
pub mod transport;

pub use crate::config::{BusConfig, Command, DeviceConfig};
pub use crate::errors::Error;
pub use crate::record::{DeviceState, Reading, SensorRecord};
pub use crate::recovery::{
    maybe_bring_up, maybe_recover, RecoveryAttempt, RecoveryPolicy,
    RetryState,
};
pub use crate::transport::{I2cTransport, Transport};

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::config::RESULT_LEN;

/// A device that can be brought up and sampled against a [`SensorRecord`].
///
/// Implementations record the outcome of every call in the record before
/// returning.
#[allow(async_fn_in_trait)]
pub trait Sensor {
    type Error: core::fmt::Debug;

    async fn init(
        &mut self,
        record: &mut SensorRecord,
    ) -> Result<(), Self::Error>;

    async fn read(
        &mut self,
        record: &mut SensorRecord,
    ) -> Result<Reading, Self::Error>;
}

pub struct Ccs811<T, RST, WAKE, D> {
    transport: T,
    reset: RST,
    wake: WAKE,
    delay: D,
    config: DeviceConfig,
}

impl<T, RST, WAKE, D> Ccs811<T, RST, WAKE, D>
where
    T: Transport,
    RST: OutputPin,
    WAKE: OutputPin,
    D: DelayNs,
{
    pub fn new(
        transport: T,
        reset: RST,
        wake: WAKE,
        delay: D,
        config: DeviceConfig,
    ) -> Self {
        Self { transport, reset, wake, delay, config }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// A fresh record carrying this device's identity.
    pub fn new_record(&self, policy: RecoveryPolicy) -> SensorRecord {
        SensorRecord::new(self.config.bus.bus_id, self.config.address, policy)
    }

    pub fn release(self) -> (T, RST, WAKE, D) {
        (self.transport, self.reset, self.wake, self.delay)
    }

    /// Brings the bus up, pulses reset, wakes the device and starts its
    /// application firmware.
    ///
    /// A bus bring-up failure leaves the record `Uninitialized`; any later
    /// failure leaves it in `AppStartError`.
    pub async fn init(
        &mut self,
        record: &mut SensorRecord,
    ) -> Result<(), Error<T::Error>> {
        info!("Starting CCS811 configuration");
        record.clear();

        if let Err(e) = self.transport.init(&self.config.bus).await {
            error!("I2C driver install failed");
            return Err(Error::BusInit(e));
        }

        if let Err(e) = self.reset_and_wake().await {
            record.mark_app_start_error();
            error!("CCS811 reset/wake sequence failed");
            return Err(e);
        }

        if let Err(e) = self
            .transport
            .write(self.config.address, &[Command::AppStart.into()])
            .await
        {
            record.mark_app_start_error();
            error!("CCS811 app start failed");
            return Err(Error::AppStart(e));
        }

        record.mark_ready();
        info!("CCS811 configuration complete");
        Ok(())
    }

    /// Reads one eCO2/TVOC result.
    pub async fn read(
        &mut self,
        record: &mut SensorRecord,
    ) -> Result<Reading, Error<T::Error>> {
        let mut data = [0u8; RESULT_LEN];
        let address = self.config.address;
        if let Err(e) = self.transport.read(address, &mut data).await {
            record.mark_read_error();
            error!("Failed to read data from CCS811");
            return Err(Error::Read(e));
        }

        let reading = Reading::from_be_bytes(&data);
        record.mark_data(reading);
        info!("eCO2: {} ppm, TVOC: {} ppb", reading.eco2, reading.tvoc);
        Ok(reading)
    }

    async fn reset_and_wake(&mut self) -> Result<(), Error<T::Error>> {
        let reset_hold = self.config.reset_hold_ms;

        self.reset.set_low().map_err(|_| Error::Gpio)?;
        self.delay.delay_ms(reset_hold).await;
        self.reset.set_high().map_err(|_| Error::Gpio)?;
        self.delay.delay_ms(reset_hold).await;

        // nWAKE is active low.
        self.wake.set_low().map_err(|_| Error::Gpio)?;
        self.delay.delay_ms(self.config.wake_hold_ms).await;

        Ok(())
    }
}

impl<T, RST, WAKE, D> Sensor for Ccs811<T, RST, WAKE, D>
where
    T: Transport,
    RST: OutputPin,
    WAKE: OutputPin,
    D: DelayNs,
{
    type Error = Error<T::Error>;

    async fn init(
        &mut self,
        record: &mut SensorRecord,
    ) -> Result<(), Self::Error> {
        Ccs811::init(self, record).await
    }

    async fn read(
        &mut self,
        record: &mut SensorRecord,
    ) -> Result<Reading, Self::Error> {
        Ccs811::read(self, record).await
    }
}
