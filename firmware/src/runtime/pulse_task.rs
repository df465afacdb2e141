use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Timer};

use laser_core::pulse::{PulseChannel, PulseControl};
use laser_core::signals::{OutputId, output_by_id};

use crate::laser::{self, drive_shared, pin_level};

/// Pulse generator: toggles the pulse output every half-period and gates
/// the ON-enable line.
///
/// The half-period is re-read from the shared schedule on every tick, so
/// a rate change in the control cycle takes effect at the next toggle.
#[embassy_executor::task]
pub async fn run(gates: &'static PulseControl, mut pulse_pin: Output<'static>) -> ! {
    let mut channel = PulseChannel::new();
    let on_line = output_by_id(OutputId::OnEnable);
    loop {
        // The nanosecond word passes through unrounded; any quantization
        // happens at the timer tick, not here.
        Timer::after(Duration::from_nanos(u64::from(gates.half_period_nanos()))).await;

        let drive = channel.tick(gates.trigger_enabled());
        pulse_pin.set_level(pin_level(drive.pulse));
        drive_shared(&laser::ON_ENABLE, drive.enable.level_for(on_line));
    }
}
