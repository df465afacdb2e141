use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::adc::Adc;
use embassy_stm32::dac::DacCh1;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};

use laser_core::controller::LaserController;
use laser_core::pulse::PulseControl;

use crate::laser::{self, DebouncedPin, EmbassyDelay, HardwareLaserPort};

mod control_task;
mod flasher_task;
mod pulse_task;
mod status_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// State shared between the control task and the periodic tasks.
static PULSE_GATES: PulseControl = PulseControl::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA4,
        PA5,
        PA6,
        PA7,
        PA8,
        PA15,
        PB0,
        PB1,
        PB2,
        PB3,
        PB4,
        PB5,
        PB6,
        PB7,
        PB8,
        PB9,
        PC6,
        PC7,
        PC13,
        ADC1,
        DAC1,
        ..
    } = hal::init(config);

    // Enable lines idle released (high), the guide beam on from bring-up.
    let mo_enable = Output::new(PA5, Level::High, Speed::Low);
    laser::install_shared(&laser::ON_ENABLE, Output::new(PA6, Level::High, Speed::Low));
    laser::install_shared(&laser::INDICATOR, Output::new(PA15, Level::Low, Speed::Low));
    let guide = Output::new(PA8, Level::Low, Speed::Low);
    let pulse_pin = Output::new(PA7, Level::Low, Speed::High);

    // Power level 0: every active-low bit output released high.
    let power_bits = [
        Output::new(PB5, Level::High, Speed::Low),
        Output::new(PB6, Level::High, Speed::Low),
        Output::new(PB7, Level::High, Speed::Low),
        Output::new(PB8, Level::High, Speed::Low),
        Output::new(PB9, Level::High, Speed::Low),
        Output::new(PC6, Level::High, Speed::Low),
        Output::new(PC7, Level::High, Speed::Low),
        Output::new(PC13, Level::High, Speed::Low),
    ];

    let port = HardwareLaserPort::new(
        DebouncedPin::new(Input::new(PB0, Pull::Up)),
        DebouncedPin::new(Input::new(PB1, Pull::Up)),
        Input::new(PB2, Pull::None),
        Input::new(PB3, Pull::None),
        Input::new(PB4, Pull::Up),
        mo_enable,
        guide,
        power_bits,
        Adc::new(ADC1),
        PA0,
        DacCh1::new_blocking(DAC1, PA4),
    );

    let controller = LaserController::new(port, EmbassyDelay, &PULSE_GATES);

    spawner
        .spawn(control_task::run(controller))
        .expect("failed to spawn control task");
    spawner
        .spawn(pulse_task::run(&PULSE_GATES, pulse_pin))
        .expect("failed to spawn pulse task");
    spawner
        .spawn(flasher_task::run(&PULSE_GATES))
        .expect("failed to spawn flasher task");
    spawner
        .spawn(status_task::run())
        .expect("failed to spawn status task");

    core::future::pending::<()>().await;
}
