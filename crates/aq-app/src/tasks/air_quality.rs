use aq_icd::MAX_PAYLOAD_LEN;
use aq_monitor::{Clock, DeliverySink, Monitor};
use ccs811::{Ccs811, SensorRecord};
use embassy_nrf::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Instant};

use crate::transport::TwimTransport;

const PAYLOAD_QUEUE_DEPTH: usize = 4;

pub type Payload = heapless::String<MAX_PAYLOAD_LEN>;

/// Serialized readings waiting for the delivery task.
pub static PAYLOAD_CHANNEL: Channel<
    CriticalSectionRawMutex,
    Payload,
    PAYLOAD_QUEUE_DEPTH,
> = Channel::new();

/// Stops the polling loop at its next sleep.
pub static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

pub type AirQualitySensor =
    Ccs811<TwimTransport, Output<'static>, Output<'static>, Delay>;
pub type AirQualityMonitor =
    Monitor<AirQualitySensor, SystemClock, Delay, ChannelSink>;

/// Embassy's monotonic uptime clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeliveryError {
    Oversized,
    QueueFull,
}

/// Queues payloads for [`delivery_task`] without waiting, so a slow consumer
/// never stalls polling.
pub struct ChannelSink;

impl DeliverySink for ChannelSink {
    type Error = DeliveryError;

    async fn deliver(&mut self, payload: &str) -> Result<(), DeliveryError> {
        let payload =
            Payload::try_from(payload).map_err(|_| DeliveryError::Oversized)?;
        PAYLOAD_CHANNEL
            .try_send(payload)
            .map_err(|_| DeliveryError::QueueFull)
    }
}

/// Requests a clean stop of [`air_quality_task`].
pub fn request_shutdown() {
    SHUTDOWN.signal(());
}

#[embassy_executor::task]
pub async fn air_quality_task(
    mut monitor: AirQualityMonitor,
    mut record: SensorRecord,
) {
    info!("Starting air quality task");
    // A failed bring-up is retried by the polling loop.
    let _ = monitor.initialize(&mut record).await;
    monitor.run(&mut record, &SHUTDOWN).await;
    info!("Air quality task exiting");
}

/// Drains the payload queue. Forwarding to an uplink is left to the
/// integrator; here every frame is logged.
#[embassy_executor::task]
pub async fn delivery_task() {
    loop {
        let payload = PAYLOAD_CHANNEL.receive().await;
        info!("Air quality frame: {}", payload.as_str());
    }
}
