use ccs811::{BusConfig, Transport};
use embassy_nrf::interrupt::{self, InterruptExt};
use embassy_nrf::{bind_interrupts, peripherals, twim};
use grounded::uninit::GroundedArrayCell;

use crate::board::Ccs811BusResources;

bind_interrupts!(struct TwimIrqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Port 0 pin numbers of the lines in [`Ccs811BusResources`].
const SDA_PIN: u8 = 21;
const SCL_PIN: u8 = 22;

const DMA_BUF_LEN: usize = 32;

/// DMA buffer for TWIM operations, stored in a sound `GroundedArrayCell`.
static TWIM0_DMA_BUF: GroundedArrayCell<u8, DMA_BUF_LEN> =
    GroundedArrayCell::const_init();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Only TWISPI0 is wired to the sensor.
    UnsupportedBus(u8),
    /// The requested pins are not the ones the board reserved.
    PinMismatch { scl: u8, sda: u8 },
    UnsupportedFrequency(u32),
    /// A transfer was requested before the bus was brought up.
    NotInitialized,
    Twim(twim::Error),
}

impl From<twim::Error> for BusError {
    fn from(e: twim::Error) -> Self {
        Self::Twim(e)
    }
}

fn frequency_for(hz: u32) -> Result<twim::Frequency, BusError> {
    match hz {
        100_000 => Ok(twim::Frequency::K100),
        250_000 => Ok(twim::Frequency::K250),
        400_000 => Ok(twim::Frequency::K400),
        other => Err(BusError::UnsupportedFrequency(other)),
    }
}

/// TWIM0 bus that is torn down and rebuilt on every `init`, so a wedged
/// peripheral is reset along with the sensor.
pub struct TwimTransport {
    twim: Option<twim::Twim<'static>>,
}

impl TwimTransport {
    /// Takes ownership of the bus resources. They are re-acquired with
    /// `steal()` whenever the bus is rebuilt.
    pub fn new(resources: Ccs811BusResources) -> Self {
        drop(resources);
        Self { twim: None }
    }

    fn bus(&mut self) -> Result<&mut twim::Twim<'static>, BusError> {
        self.twim.as_mut().ok_or(BusError::NotInitialized)
    }
}

impl Transport for TwimTransport {
    type Error = BusError;

    async fn init(&mut self, config: &BusConfig) -> Result<(), BusError> {
        // Release the old instance first; it borrows the DMA buffer.
        self.twim = None;

        if config.bus_id != 0 {
            return Err(BusError::UnsupportedBus(config.bus_id));
        }
        if config.scl_pin != SCL_PIN || config.sda_pin != SDA_PIN {
            return Err(BusError::PinMismatch {
                scl: config.scl_pin,
                sda: config.sda_pin,
            });
        }

        let mut twim_config = twim::Config::default();
        twim_config.frequency = frequency_for(config.frequency_hz)?;
        interrupt::TWISPI0.set_priority(interrupt::Priority::P3);

        // SAFETY: The previous `Twim` has been dropped above, so nothing else
        // holds these peripherals or the DMA buffer. The resources were handed
        // to `new`, so no other driver owns them.
        let (twim, sda, scl, buf) = unsafe {
            (
                peripherals::TWISPI0::steal(),
                peripherals::P0_21::steal(),
                peripherals::P0_22::steal(),
                &mut *(TWIM0_DMA_BUF.as_mut_ptr() as *mut [u8; DMA_BUF_LEN]),
            )
        };

        self.twim =
            Some(twim::Twim::new(twim, TwimIrqs, sda, scl, twim_config, buf));
        debug!("TWIM0 up at {} Hz", config.frequency_hz);
        Ok(())
    }

    async fn write(
        &mut self,
        address: u8,
        bytes: &[u8],
    ) -> Result<(), BusError> {
        Ok(self.bus()?.write(address, bytes).await?)
    }

    async fn read(
        &mut self,
        address: u8,
        buffer: &mut [u8],
    ) -> Result<(), BusError> {
        Ok(self.bus()?.read(address, buffer).await?)
    }
}
