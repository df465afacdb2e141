use embassy_time::Timer;

use laser_core::controller::LaserController;

use crate::laser::{EmbassyDelay, HardwareLaserPort};
use crate::status;

/// Cadence of the input-sampling control cycle.
const CYCLE_PERIOD_MS: u64 = 1;

#[embassy_executor::task]
pub async fn run(mut controller: LaserController<'static, HardwareLaserPort, EmbassyDelay>) -> ! {
    loop {
        controller.poll_cycle();
        status::record_report(&controller.status_report());
        Timer::after_millis(CYCLE_PERIOD_MS).await;
    }
}
