use embassy_time::Ticker;

use laser_core::status::STATUS_INTERVAL;

use crate::laser::embassy_duration;
use crate::status;

/// Emits the controller snapshot on the debug channel once per second.
#[embassy_executor::task]
pub async fn run() -> ! {
    let mut ticker = Ticker::every(embassy_duration(STATUS_INTERVAL));
    loop {
        ticker.next().await;
        let line = status::snapshot().render();
        defmt::info!("{=str}", line.as_str());
    }
}
