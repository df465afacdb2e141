use embassy_time::{Duration, Ticker, Timer};

use laser_core::pulse::{AlarmFlasher, FLASH_TOGGLE_PERIOD, PulseControl};

use crate::laser::{self, drive_shared, embassy_duration};

/// Poll interval while waiting for the first alarm to arm the flasher.
const ARM_POLL_MS: u64 = 10;

/// Alarm indicator flasher.
///
/// Dormant until the first alarm arms it, then toggles the indicator at
/// 1 Hz forever. There is no disarm path; the flash persists through
/// alarm recovery and contends with the control cycle for the LED,
/// last writer winning.
#[embassy_executor::task]
pub async fn run(gates: &'static PulseControl) -> ! {
    while !gates.flasher_armed() {
        Timer::after_millis(ARM_POLL_MS).await;
    }
    defmt::warn!("alarm flasher armed");

    let mut flasher = AlarmFlasher::new();
    let mut ticker = Ticker::every(flash_period());
    loop {
        ticker.next().await;
        drive_shared(&laser::INDICATOR, flasher.tick());
    }
}

fn flash_period() -> Duration {
    embassy_duration(FLASH_TOGGLE_PERIOD)
}
