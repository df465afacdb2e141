//! Operating modes and the input decode tables.
//!
//! The alarm decode reproduces the original controller's transition logic
//! bit-for-bit. Note the asymmetry: three of the four bit combinations are
//! alarms and only LSB=0/MSB=1 means normal operation. The original's
//! header comment documented a different code table (00=temp, 01=normal,
//! 10=reflection, 11=MO); the executable logic below is authoritative and
//! the discrepancy is tracked in DESIGN.md rather than resolved silently.

use core::fmt;

use crate::signals::Level;

/// Operating mode derived once per control cycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OperatingMode {
    On,
    Idle,
    OffSetRate,
    AlarmTemperature,
    AlarmReflection,
    AlarmMo,
    AlarmReserved,
}

impl OperatingMode {
    /// Numeric mode code reported on the debug channel.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            OperatingMode::On => 0,
            OperatingMode::Idle => 1,
            OperatingMode::OffSetRate => 2,
            OperatingMode::AlarmTemperature => 3,
            OperatingMode::AlarmReflection => 4,
            OperatingMode::AlarmMo => 5,
            OperatingMode::AlarmReserved => 7,
        }
    }

    /// Returns `true` for every alarm mode, reserved included.
    #[must_use]
    pub const fn is_alarm(self) -> bool {
        matches!(
            self,
            OperatingMode::AlarmTemperature
                | OperatingMode::AlarmReflection
                | OperatingMode::AlarmMo
                | OperatingMode::AlarmReserved
        )
    }
}

/// Mode the controller boots in: the reserved "unknown" code, unreachable
/// from input sampling and overwritten on the first cycle.
pub const STARTUP_MODE: OperatingMode = OperatingMode::AlarmReserved;

/// Decodes the two alarm input bits (active-high).
///
/// | LSB | MSB | meaning         |
/// |-----|-----|-----------------|
/// | 1   | 1   | MO alarm        |
/// | 1   | 0   | high reflection |
/// | 0   | 0   | temperature     |
/// | 0   | 1   | normal          |
///
/// Returns `None` for the single "normal" combination.
#[must_use]
pub const fn decode_alarm(lsb: Level, msb: Level) -> Option<OperatingMode> {
    match (lsb, msb) {
        (Level::High, Level::High) => Some(OperatingMode::AlarmMo),
        (Level::High, Level::Low) => Some(OperatingMode::AlarmReflection),
        (Level::Low, Level::Low) => Some(OperatingMode::AlarmTemperature),
        (Level::Low, Level::High) => None,
    }
}

/// Sticky alarm label reported on the debug channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AlarmState {
    None,
    Temperature,
    Reflection,
    Mo,
    Reserved,
}

impl AlarmState {
    /// Human-readable label for the debug line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AlarmState::None => "none",
            AlarmState::Temperature => "temperature",
            AlarmState::Reflection => "high reflection",
            AlarmState::Mo => "MO",
            AlarmState::Reserved => "reserved mode",
        }
    }

    /// Alarm state recorded when entering `mode`.
    #[must_use]
    pub const fn for_mode(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::AlarmTemperature => AlarmState::Temperature,
            OperatingMode::AlarmReflection => AlarmState::Reflection,
            OperatingMode::AlarmMo => AlarmState::Mo,
            OperatingMode::AlarmReserved => AlarmState::Reserved,
            OperatingMode::On | OperatingMode::Idle | OperatingMode::OffSetRate => AlarmState::None,
        }
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
