#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Shared status storage for the firmware target.
//!
//! Lightweight atomics carry the controller's per-cycle snapshot to the
//! status task without handing shared mutable state across tasks. The
//! control task is the only writer.

use laser_core::mode::{AlarmState, OperatingMode};
use laser_core::status::StatusReport;
use portable_atomic::{AtomicU8, Ordering};

/// Latest alarm state, encoded via [`alarm_code`].
static ALARM: AtomicU8 = AtomicU8::new(0);
/// Latest sampled power level.
static POWER: AtomicU8 = AtomicU8::new(0);
/// Latest operating-mode code; boots as the reserved code.
static MODE_CODE: AtomicU8 = AtomicU8::new(7);

const fn alarm_code(alarm: AlarmState) -> u8 {
    match alarm {
        AlarmState::None => 0,
        AlarmState::Temperature => 1,
        AlarmState::Reflection => 2,
        AlarmState::Mo => 3,
        AlarmState::Reserved => 4,
    }
}

const fn alarm_from_code(code: u8) -> AlarmState {
    match code {
        1 => AlarmState::Temperature,
        2 => AlarmState::Reflection,
        3 => AlarmState::Mo,
        4 => AlarmState::Reserved,
        _ => AlarmState::None,
    }
}

const fn mode_from_code(code: u8) -> OperatingMode {
    match code {
        0 => OperatingMode::On,
        1 => OperatingMode::Idle,
        2 => OperatingMode::OffSetRate,
        3 => OperatingMode::AlarmTemperature,
        4 => OperatingMode::AlarmReflection,
        5 => OperatingMode::AlarmMo,
        _ => OperatingMode::AlarmReserved,
    }
}

/// Stores the controller's end-of-cycle snapshot.
pub fn record_report(report: &StatusReport) {
    ALARM.store(alarm_code(report.alarm), Ordering::Relaxed);
    POWER.store(report.power_level, Ordering::Relaxed);
    MODE_CODE.store(report.mode.code(), Ordering::Relaxed);
}

/// Returns the most recently recorded snapshot.
pub fn snapshot() -> StatusReport {
    StatusReport {
        alarm: alarm_from_code(ALARM.load(Ordering::Relaxed)),
        power_level: POWER.load(Ordering::Relaxed),
        mode: mode_from_code(MODE_CODE.load(Ordering::Relaxed)),
    }
}
