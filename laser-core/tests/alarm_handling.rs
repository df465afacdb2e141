//! Alarm preemption, shutdown ordering, and recovery.

mod common;

use core::time::Duration;

use common::{PortOp, bench, position_of};
use laser_core::controller::LaserController;
use laser_core::mode::{AlarmState, OperatingMode};
use laser_core::pulse::PulseControl;
use laser_core::signals::{InputId, Level, OutputId};

#[test]
fn healthy_engine_defaults_settle_into_idle() {
    // The bench boots with the alarm bits at the no-alarm code (LSB low,
    // MSB high). A quiescent cycle must reach Idle with nothing armed;
    // only driving both bits low injects the temperature alarm.
    let (_trace, port, delay) = bench();
    let gates = PulseControl::new();
    let mut controller = LaserController::new(port, delay, &gates);

    controller.poll_cycle();
    assert_eq!(controller.mode(), OperatingMode::Idle);
    assert_eq!(controller.alarm(), AlarmState::None);
    assert!(!gates.trigger_enabled());
    assert!(!gates.flasher_armed());
}

#[test]
fn alarm_preempts_a_held_on_switch() {
    let (trace, port, delay) = bench();
    let gates = PulseControl::new();
    let mut controller = LaserController::new(port, delay, &gates);

    controller.poll_cycle();
    controller.port_mut().press(InputId::Switch1);
    controller.poll_cycle();
    assert_eq!(controller.mode(), OperatingMode::On);

    trace.borrow_mut().clear();
    controller
        .port_mut()
        .set_alarm_bits(Level::High, Level::High);
    controller.poll_cycle();

    assert_eq!(controller.mode(), OperatingMode::AlarmMo);
    assert_eq!(controller.alarm(), AlarmState::Mo);
    assert_eq!(controller.alarm().label(), "MO");

    // Shutdown ordering: gate released, 1 ms hold, oscillator released.
    let on = position_of(&trace, PortOp::Write(OutputId::OnEnable, Level::High))
        .expect("ON never released");
    let hold = position_of(&trace, PortOp::Wait(Duration::from_millis(1)))
        .expect("1 ms hold never ran");
    let mo = position_of(&trace, PortOp::Write(OutputId::MoEnable, Level::High))
        .expect("MO never released");
    assert!(on < hold && hold < mo);

    assert!(!gates.trigger_enabled());
    assert!(gates.flasher_armed());
    assert_eq!(controller.port().display, Some(0));
}

#[test]
fn every_alarm_combination_decodes_regardless_of_switches() {
    let cases = [
        (Level::High, Level::High, OperatingMode::AlarmMo),
        (Level::High, Level::Low, OperatingMode::AlarmReflection),
        (Level::Low, Level::Low, OperatingMode::AlarmTemperature),
    ];
    for (lsb, msb, expected) in cases {
        let (_trace, port, delay) = bench();
        let gates = PulseControl::new();
        let mut controller = LaserController::new(port, delay, &gates);

        controller.port_mut().press(InputId::Switch1);
        controller.port_mut().press(InputId::Switch2);
        controller.port_mut().set_alarm_bits(lsb, msb);
        controller.poll_cycle();

        assert_eq!(controller.mode(), expected);
        assert!(controller.mode().is_alarm());
        assert!(gates.flasher_armed());
    }
}

#[test]
fn persistent_alarm_repeats_safely() {
    let (trace, port, delay) = bench();
    let gates = PulseControl::new();
    let mut controller = LaserController::new(port, delay, &gates);

    controller
        .port_mut()
        .set_alarm_bits(Level::Low, Level::Low);
    controller.poll_cycle();
    assert_eq!(controller.mode(), OperatingMode::AlarmTemperature);

    // The alarm actions are level-driven and safe to re-apply each cycle.
    trace.borrow_mut().clear();
    controller.poll_cycle();
    controller.poll_cycle();
    assert_eq!(controller.mode(), OperatingMode::AlarmTemperature);
    assert_eq!(controller.alarm(), AlarmState::Temperature);
    assert_eq!(
        controller.port().output(OutputId::OnEnable),
        Some(Level::High)
    );
    assert_eq!(
        controller.port().output(OutputId::MoEnable),
        Some(Level::High)
    );
    assert_eq!(controller.port().display, Some(0));
}

#[test]
fn alarm_clear_resumes_switch_selection_next_cycle() {
    let (_trace, port, delay) = bench();
    let gates = PulseControl::new();
    let mut controller = LaserController::new(port, delay, &gates);

    controller
        .port_mut()
        .set_alarm_bits(Level::High, Level::Low);
    controller.poll_cycle();
    assert_eq!(controller.mode(), OperatingMode::AlarmReflection);

    controller
        .port_mut()
        .set_alarm_bits(Level::Low, Level::High);
    controller.poll_cycle();
    assert_eq!(controller.mode(), OperatingMode::Idle);

    // The recorded alarm is sticky through recovery; the flasher stays
    // armed because nothing ever disarms it.
    assert_eq!(controller.alarm(), AlarmState::Reflection);
    assert!(gates.flasher_armed());
}
