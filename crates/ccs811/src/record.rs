use byteorder::{BigEndian, ByteOrder};
use embassy_time::{Duration, Instant};

use crate::config::RESULT_LEN;
use crate::recovery::{RecoveryPolicy, RetryState};

/// Lifecycle state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// No initialization has completed since the record was (re)set.
    Uninitialized,
    /// Initialized, no reading taken yet.
    Ready,
    /// The last read succeeded and the reading is valid.
    DataUpdated,
    /// The final bring-up step (application start) failed.
    AppStartError,
    /// The last read failed.
    ReadError,
}

impl DeviceState {
    /// Whether the device is in a fault state the recovery policy acts on.
    pub const fn is_faulted(self) -> bool {
        matches!(self, DeviceState::AppStartError | DeviceState::ReadError)
    }
}

/// One eCO2/TVOC sample, passed through without unit conversion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Equivalent CO2 (ppm).
    pub eco2: u16,
    /// Total volatile organic compounds (ppb).
    pub tvoc: u16,
}

impl Reading {
    pub const fn new(eco2: u16, tvoc: u16) -> Self {
        Self { eco2, tvoc }
    }

    /// Decodes the big-endian result block.
    pub fn from_be_bytes(bytes: &[u8; RESULT_LEN]) -> Self {
        Self {
            eco2: BigEndian::read_u16(&bytes[0..2]),
            tvoc: BigEndian::read_u16(&bytes[2..4]),
        }
    }
}

/// Everything known about one physical device.
///
/// Identity is fixed at construction. The remaining fields are only changed
/// through the transition methods below, which keep the retry bookkeeping
/// consistent with the state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorRecord {
    bus_id: u8,
    address: u8,
    reading: Reading,
    state: DeviceState,
    /// Set once an initialization completes, cleared when the next one
    /// starts.
    started: bool,
    pub(crate) retry: RetryState,
    policy: RecoveryPolicy,
}

impl SensorRecord {
    pub fn new(bus_id: u8, address: u8, policy: RecoveryPolicy) -> Self {
        Self {
            bus_id,
            address,
            reading: Reading::default(),
            state: DeviceState::Uninitialized,
            started: false,
            retry: RetryState::new(&policy),
            policy,
        }
    }

    pub fn bus_id(&self) -> u8 {
        self.bus_id
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn reading(&self) -> Reading {
        self.reading
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Whether the device reached `Ready` since its last initialization
    /// began. Only then may it be read; a later `ReadError` keeps this set.
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn policy(&self) -> &RecoveryPolicy {
        &self.policy
    }

    pub fn retry_state(&self) -> &RetryState {
        &self.retry
    }

    /// Consecutive failed recovery attempts at the current interval.
    pub fn retry_count(&self) -> u8 {
        self.retry.retry_count
    }

    /// Current cooldown between recovery attempts.
    pub fn retry_interval(&self) -> Duration {
        self.retry.retry_interval
    }

    pub fn last_attempt(&self) -> Instant {
        self.retry.last_attempt
    }

    /// Start of an initialization: zero the reading and forget the state.
    ///
    /// Retry bookkeeping is left alone so a failing re-initialization can
    /// still accumulate backoff.
    pub fn clear(&mut self) {
        self.reading = Reading::default();
        self.state = DeviceState::Uninitialized;
        self.started = false;
    }

    /// Initialization succeeded.
    pub fn mark_ready(&mut self) {
        self.state = DeviceState::Ready;
        self.started = true;
        self.retry = self.retry.reset(&self.policy);
    }

    pub fn mark_app_start_error(&mut self) {
        self.state = DeviceState::AppStartError;
    }

    pub fn mark_data(&mut self, reading: Reading) {
        self.reading = reading;
        self.state = DeviceState::DataUpdated;
    }

    pub fn mark_read_error(&mut self) {
        self.reading = Reading::default();
        self.state = DeviceState::ReadError;
    }
}
