use embassy_nrf::peripherals::WDT;
use embassy_nrf::wdt::{self, Watchdog};
use embassy_nrf::Peri;
use embassy_time::{Duration, Timer};

pub mod air_quality;

pub use air_quality::*;

// Keeps our system alive
#[embassy_executor::task]
pub async fn watchdog_task(wdt: Peri<'static, WDT>) {
    let (_wdt, [mut handle]) = match wdt::Config::try_new(&wdt)
        .ok_or(())
        .and_then(|config| Watchdog::try_new(wdt, config).map_err(|_| ()))
    {
        Ok(x) => x,
        Err(()) => {
            // Watchdog already running with another config; wait for it to
            // time out.
            loop {
                cortex_m::asm::wfe();
            }
        }
    };
    loop {
        handle.pet();
        Timer::after(Duration::from_secs(2)).await;
    }
}
