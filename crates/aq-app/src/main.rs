#![no_std]
#![no_main]

use aq_monitor::{Monitor, MonitorConfig};
use ccs811::{Ccs811, DeviceConfig, RecoveryPolicy};
use embassy_nrf::gpio::{Level, Output, OutputDrive};

#[cfg(feature = "defmt")]
use defmt_rtt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;
#[cfg(not(feature = "defmt"))]
use panic_reset as _;

use aq_app::prelude::*;

// Application main entry point. The spawner can be used to start async tasks.
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("Air quality firmware {}", FW_VERSION);

    let board = AirQualityBoard::default();

    // Initialize the allocator BEFORE you use it
    init_heap();

    spawner.must_spawn(watchdog_task(board.wdt));

    // Both control lines idle high: out of reset, asleep.
    let reset =
        Output::new(board.ccs811.reset, Level::High, OutputDrive::Standard);
    let wake =
        Output::new(board.ccs811.wake, Level::High, OutputDrive::Standard);

    let sensor = Ccs811::new(
        TwimTransport::new(board.ccs811_bus),
        reset,
        wake,
        Delay,
        DeviceConfig::default(),
    );
    let record = sensor.new_record(RecoveryPolicy::default());
    let monitor = Monitor::new(
        sensor,
        SystemClock,
        Delay,
        ChannelSink,
        MonitorConfig::default(),
    );

    spawner.must_spawn(delivery_task());
    spawner.must_spawn(air_quality_task(monitor, record));
}
