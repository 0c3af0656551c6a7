#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ccs811::{BusConfig, Ccs811, DeviceConfig, Transport};
use embedded_hal::digital::{self, ErrorKind, OutputPin};
use embedded_hal_async::delay::DelayNs;

// ---------------------------------------------------------------------------
// Shared event log
// ---------------------------------------------------------------------------

/// Everything the driver did to the hardware, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwEvent {
    BusInit(BusConfig),
    Write(u8, Vec<u8>),
    Read(u8, usize),
    Pin(&'static str, bool),
    DelayMs(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

/// Scripted bus behaviour plus the event log, shared between the test and
/// the mocks moved into the driver.
#[derive(Default)]
pub struct Script {
    pub events: Vec<HwEvent>,
    pub fail_bus_init: bool,
    pub fail_write: bool,
    /// Successive read results; an empty queue fails the read.
    pub reads: VecDeque<[u8; 4]>,
    pub fail_pins: bool,
}

pub type Shared = Rc<RefCell<Script>>;

// ---------------------------------------------------------------------------
// Mocks
// ---------------------------------------------------------------------------

pub struct MockTransport(pub Shared);

impl Transport for MockTransport {
    type Error = MockBusError;

    async fn init(&mut self, config: &BusConfig) -> Result<(), MockBusError> {
        let mut script = self.0.borrow_mut();
        script.events.push(HwEvent::BusInit(*config));
        if script.fail_bus_init {
            Err(MockBusError)
        } else {
            Ok(())
        }
    }

    async fn write(
        &mut self,
        address: u8,
        bytes: &[u8],
    ) -> Result<(), MockBusError> {
        let mut script = self.0.borrow_mut();
        script.events.push(HwEvent::Write(address, bytes.to_vec()));
        if script.fail_write {
            Err(MockBusError)
        } else {
            Ok(())
        }
    }

    async fn read(
        &mut self,
        address: u8,
        buffer: &mut [u8],
    ) -> Result<(), MockBusError> {
        let mut script = self.0.borrow_mut();
        script.events.push(HwEvent::Read(address, buffer.len()));
        match script.reads.pop_front() {
            Some(data) => {
                buffer.copy_from_slice(&data[..buffer.len()]);
                Ok(())
            }
            None => Err(MockBusError),
        }
    }
}

pub struct MockPin {
    pub name: &'static str,
    pub shared: Shared,
}

impl digital::ErrorType for MockPin {
    type Error = ErrorKind;
}

impl MockPin {
    fn set(&mut self, high: bool) -> Result<(), ErrorKind> {
        let mut script = self.shared.borrow_mut();
        if script.fail_pins {
            return Err(ErrorKind::Other);
        }
        script.events.push(HwEvent::Pin(self.name, high));
        Ok(())
    }
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

pub struct MockDelay(pub Shared);

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(HwEvent::DelayMs(ns / 1_000_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(HwEvent::DelayMs(ms));
    }
}

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

pub type MockDriver = Ccs811<MockTransport, MockPin, MockPin, MockDelay>;

pub fn make_driver() -> (MockDriver, Shared) {
    let shared: Shared = Rc::new(RefCell::new(Script::default()));
    let driver = Ccs811::new(
        MockTransport(shared.clone()),
        MockPin { name: "rst", shared: shared.clone() },
        MockPin { name: "wake", shared: shared.clone() },
        MockDelay(shared.clone()),
        DeviceConfig::default(),
    );
    (driver, shared)
}
