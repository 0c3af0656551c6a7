use embassy_nrf::interrupt::Priority;
use embassy_nrf::peripherals::{self, WDT};
use embassy_nrf::Peri;

/// Bus peripheral and pins wired to the CCS811. Ownership is handed to the
/// transport, which re-creates the bus from these on every initialization.
pub struct Ccs811BusResources {
    pub twim: Peri<'static, peripherals::TWISPI0>,
    pub sda: Peri<'static, peripherals::P0_21>,
    pub scl: Peri<'static, peripherals::P0_22>,
}

/// Control lines of the CCS811.
pub struct Ccs811Resources {
    /// Active-low reset.
    pub reset: Peri<'static, peripherals::P1_00>,
    /// Active-low nWAKE.
    pub wake: Peri<'static, peripherals::P1_01>,
}

/// The peripherals this firmware uses.
pub struct AirQualityBoard {
    pub ccs811_bus: Ccs811BusResources,
    pub ccs811: Ccs811Resources,
    /// Watchdog Timer.
    pub wdt: Peri<'static, WDT>,
}

impl Default for AirQualityBoard {
    fn default() -> Self {
        let mut config = embassy_nrf::config::Config::default();
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;
        Self::new(config)
    }
}

impl AirQualityBoard {
    pub fn new(config: embassy_nrf::config::Config) -> Self {
        let p = embassy_nrf::init(config);

        Self {
            ccs811_bus: Ccs811BusResources {
                twim: p.TWISPI0,
                sda: p.P0_21,
                scl: p.P0_22,
            },
            ccs811: Ccs811Resources { reset: p.P1_00, wake: p.P1_01 },
            wdt: p.WDT,
        }
    }
}
