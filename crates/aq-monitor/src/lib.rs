#![no_std]
//! Periodic polling of a CCS811 and delivery of its readings.

// This must go first so the logging macros are visible to the other modules.
mod fmt;

mod monitor;

pub use monitor::{Monitor, MonitorConfig, PollOutcome};

use embassy_time::Instant;

/// Monotonic time source used for recovery cooldowns.
pub trait Clock {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Consumer of serialized readings.
///
/// Delivery is fire-and-forget: a failure is logged by the monitor and has no
/// effect on the device state.
#[allow(async_fn_in_trait)]
pub trait DeliverySink {
    type Error: core::fmt::Debug;

    async fn deliver(&mut self, payload: &str) -> Result<(), Self::Error>;
}

impl<K: DeliverySink + ?Sized> DeliverySink for &mut K {
    type Error = K::Error;

    async fn deliver(&mut self, payload: &str) -> Result<(), Self::Error> {
        (**self).deliver(payload).await
    }
}
