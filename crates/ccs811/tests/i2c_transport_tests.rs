mod common;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ccs811::{
    Ccs811, DeviceConfig, DeviceState, Error, I2cTransport, Reading,
    RecoveryPolicy,
};
use common::{MockDelay, MockPin, Script, Shared};
use embedded_hal_async::i2c::{
    ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation,
};

// ---------------------------------------------------------------------------
// Mock I2C bus
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockI2c {
    writes: Vec<(u8, Vec<u8>)>,
    reads: VecDeque<[u8; 4]>,
    nack: bool,
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        if self.nack {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    self.writes.push((address, bytes.to_vec()))
                }
                Operation::Read(buffer) => {
                    let data = self.reads.pop_front().ok_or(ErrorKind::Other)?;
                    buffer.copy_from_slice(&data[..buffer.len()]);
                }
            }
        }
        Ok(())
    }
}

type I2cDriver = Ccs811<I2cTransport<MockI2c>, MockPin, MockPin, MockDelay>;

fn make_i2c_driver(i2c: MockI2c) -> I2cDriver {
    let shared: Shared = Rc::new(RefCell::new(Script::default()));
    Ccs811::new(
        I2cTransport::new(i2c),
        MockPin { name: "rst", shared: shared.clone() },
        MockPin { name: "wake", shared: shared.clone() },
        MockDelay(shared),
        DeviceConfig::default(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn bring_up_and_read_go_through_i2c() {
    let mut i2c = MockI2c::default();
    i2c.reads.push_back([0x01, 0x90, 0x00, 0x0A]);
    let mut driver = make_i2c_driver(i2c);
    let mut record = driver.new_record(RecoveryPolicy::default());

    driver.init(&mut record).await.unwrap();
    let reading = driver.read(&mut record).await.unwrap();

    assert_eq!(reading, Reading::new(400, 10));
    assert_eq!(record.state(), DeviceState::DataUpdated);

    let (transport, ..) = driver.release();
    let i2c = transport.release();
    assert_eq!(i2c.writes, vec![(0x5A, vec![0xF4])]);
    assert!(i2c.reads.is_empty());
}

#[futures_test::test]
async fn nack_on_app_start_is_reported_with_bus_error() {
    let driver_i2c = MockI2c { nack: true, ..Default::default() };
    let mut driver = make_i2c_driver(driver_i2c);
    let mut record = driver.new_record(RecoveryPolicy::default());

    let result = driver.init(&mut record).await;

    // Bus bring-up is owned by whoever configured the I2C device.
    assert_eq!(
        result,
        Err(Error::AppStart(ErrorKind::NoAcknowledge(
            NoAcknowledgeSource::Address
        )))
    );
    assert_eq!(record.state(), DeviceState::AppStartError);
}

#[futures_test::test]
async fn empty_read_surfaces_as_read_error() {
    let mut driver = make_i2c_driver(MockI2c::default());
    let mut record = driver.new_record(RecoveryPolicy::default());
    driver.init(&mut record).await.unwrap();

    let result = driver.read(&mut record).await;

    assert_eq!(result, Err(Error::Read(ErrorKind::Other)));
    assert_eq!(record.state(), DeviceState::ReadError);
    assert_eq!(record.reading(), Reading::default());
}
