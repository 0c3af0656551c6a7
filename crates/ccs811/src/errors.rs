/// Failure of a single driver operation.
///
/// Every variant is recoverable: the driver has already folded the failure
/// into the [`SensorRecord`](crate::SensorRecord) state by the time this is
/// returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusE> {
    /// The bus transport could not be brought up.
    BusInit(BusE),
    /// Driving the reset or wake line failed.
    Gpio,
    /// The application start command was not acknowledged.
    AppStart(BusE),
    /// The result read did not complete.
    Read(BusE),
}

impl<BusE> Error<BusE> {
    /// Returns the underlying bus error, if the failure came from the bus.
    pub fn bus_error(&self) -> Option<&BusE> {
        match self {
            Error::BusInit(e) | Error::AppStart(e) | Error::Read(e) => Some(e),
            Error::Gpio => None,
        }
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::BusInit(err) => {
                write!(f, "I2C driver install failed: {:?}", err)
            }
            Error::Gpio => write!(f, "Reset/wake line could not be driven"),
            Error::AppStart(err) => {
                write!(f, "CCS811 app start failed: {:?}", err)
            }
            Error::Read(err) => {
                write!(f, "Failed to read data from CCS811: {:?}", err)
            }
        }
    }
}
