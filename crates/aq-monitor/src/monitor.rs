use aq_icd::AirQualityFrame;
use ccs811::{
    maybe_bring_up, maybe_recover, DeviceState, Reading, RecoveryAttempt,
    Sensor, SensorRecord,
};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::{Clock, DeliverySink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Sleep between polling cycles, independent of the recovery cooldown.
    pub period: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { period: Duration::from_secs(1) }
    }
}

/// What a single polling cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Read, encoded and handed to the sink.
    Delivered(Reading),
    /// Read and encoded, but the sink refused it.
    DeliveryFailed(Reading),
    /// Read, but the frame could not be encoded.
    EncodeFailed(Reading),
    /// The read failed and recovery was consulted.
    ReadFailed(RecoveryAttempt),
    /// The last bring-up has not completed; no read was attempted and
    /// bring-up was retried if due.
    BringUp(RecoveryAttempt),
}

/// Owns one sensor and everything needed to poll it forever.
pub struct Monitor<S, C, D, K> {
    sensor: S,
    clock: C,
    delay: D,
    sink: K,
    config: MonitorConfig,
}

impl<S, C, D, K> Monitor<S, C, D, K>
where
    S: Sensor,
    C: Clock,
    D: DelayNs,
    K: DeliverySink,
{
    pub fn new(
        sensor: S,
        clock: C,
        delay: D,
        sink: K,
        config: MonitorConfig,
    ) -> Self {
        Self { sensor, clock, delay, sink, config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// First bring-up of the device, before polling starts.
    pub async fn initialize(
        &mut self,
        record: &mut SensorRecord,
    ) -> Result<(), S::Error> {
        let result = self.sensor.init(record).await;
        if result.is_err() {
            warn!(
                "Air quality sensor bring-up failed, state {:?}",
                record.state()
            );
        }
        result
    }

    /// Runs one polling cycle without sleeping.
    pub async fn poll_once(
        &mut self,
        record: &mut SensorRecord,
    ) -> PollOutcome {
        // Never read a device that has not finished bring-up.
        if !record.is_started() {
            let now = self.clock.now();
            let attempt = if record.state() == DeviceState::Uninitialized {
                maybe_bring_up(&mut self.sensor, record, now).await
            } else {
                maybe_recover(&mut self.sensor, record, now).await
            };
            return PollOutcome::BringUp(attempt);
        }

        match self.sensor.read(record).await {
            Ok(reading) => self.publish(reading).await,
            Err(_) => {
                let now = self.clock.now();
                let attempt =
                    maybe_recover(&mut self.sensor, record, now).await;
                debug!("Read failed, recovery: {:?}", attempt);
                PollOutcome::ReadFailed(attempt)
            }
        }
    }

    async fn publish(&mut self, reading: Reading) -> PollOutcome {
        let payload = match AirQualityFrame::from(reading).to_json() {
            Ok(payload) => payload,
            Err(_) => {
                error!("Failed to encode air quality frame");
                return PollOutcome::EncodeFailed(reading);
            }
        };

        match self.sink.deliver(&payload).await {
            Ok(()) => PollOutcome::Delivered(reading),
            Err(_) => {
                warn!("Delivery sink rejected air quality frame");
                PollOutcome::DeliveryFailed(reading)
            }
        }
    }

    /// Polls at the configured period until `shutdown` is signalled.
    ///
    /// Shutdown is only observed while sleeping, so a cycle is never cut
    /// off in the middle of a bus transaction.
    pub async fn run<M: RawMutex>(
        &mut self,
        record: &mut SensorRecord,
        shutdown: &Signal<M, ()>,
    ) {
        let period_ms =
            u32::try_from(self.config.period.as_millis()).unwrap_or(u32::MAX);
        info!("Air quality monitor polling every {} ms", period_ms);

        loop {
            self.poll_once(record).await;

            match select(shutdown.wait(), self.delay.delay_ms(period_ms)).await
            {
                Either::First(()) => break,
                Either::Second(()) => {}
            }
        }

        info!("Air quality monitor stopped");
    }
}
