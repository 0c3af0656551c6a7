/// Default 7-bit I2C address (ADDR pin low).
pub const DEFAULT_ADDRESS: u8 = 0x5A;
/// Standard-mode bus clock.
pub const DEFAULT_BUS_FREQUENCY_HZ: u32 = 100_000;
/// Length of the eCO2 + TVOC block returned by a result read.
pub const RESULT_LEN: usize = 4;

/// Single-byte commands understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Transition from boot mode into application (measurement) mode.
    AppStart = 0xF4,
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command as u8
    }
}

/// How the bus transport is brought up on every (re)initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Controller instance the device hangs off.
    pub bus_id: u8,
    /// Clock line pin number.
    pub scl_pin: u8,
    /// Data line pin number.
    pub sda_pin: u8,
    pub frequency_hz: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bus_id: 0,
            scl_pin: 22,
            sda_pin: 21,
            frequency_hz: DEFAULT_BUS_FREQUENCY_HZ,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub address: u8,
    pub bus: BusConfig,
    /// Time the reset line is held in each phase of the reset pulse.
    pub reset_hold_ms: u32,
    /// Time allowed after asserting wake before the first transaction.
    pub wake_hold_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            bus: BusConfig::default(),
            reset_hold_ms: 10,
            wake_hold_ms: 10,
        }
    }
}
