//! Pulse-train and alarm-flash primitives, plus the state shared between
//! the control cycle and the interrupt-level periodic callbacks.
//!
//! The pulse train must keep sub-millisecond timing that the control
//! loop's variable-length (and occasionally blocking) iterations cannot
//! guarantee, so the generator runs on its own periodic schedule and only
//! observes single-word flags written by the control loop.

use core::time::Duration;

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::signals::{Level, LineAction};

/// Interval between indicator toggles while the alarm flasher runs.
pub const FLASH_TOGGLE_PERIOD: Duration = Duration::from_secs(1);

/// Default pulse half-period: the 25 kHz lower bound of the rate range.
pub const DEFAULT_HALF_PERIOD_NANOS: u32 = 20_000;

/// Single-word state shared between the control loop and the periodic
/// callbacks.
///
/// The control loop is the only writer of the gate and the schedule; the
/// pulse callback only reads them. Each field is an independent atomic, so
/// no critical section is needed around individual accesses.
#[derive(Debug)]
pub struct PulseControl {
    trigger_enabled: AtomicBool,
    half_period_nanos: AtomicU32,
    flasher_armed: AtomicBool,
}

impl PulseControl {
    /// Creates the shared state with emission gated off and the schedule
    /// at the 25 kHz default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trigger_enabled: AtomicBool::new(false),
            half_period_nanos: AtomicU32::new(DEFAULT_HALF_PERIOD_NANOS),
            flasher_armed: AtomicBool::new(false),
        }
    }

    /// Gates whether the pulse callback asserts the laser-enable output.
    pub fn set_trigger_enabled(&self, enabled: bool) {
        self.trigger_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns the current trigger gate.
    #[must_use]
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled.load(Ordering::Relaxed)
    }

    /// Replaces the pulse schedule immediately; the callback picks the new
    /// half-period up on its next tick. Replacement does not queue.
    pub fn set_half_period_nanos(&self, nanos: u32) {
        self.half_period_nanos.store(nanos, Ordering::Relaxed);
    }

    /// Returns the scheduled half-period in nanoseconds.
    #[must_use]
    pub fn half_period_nanos(&self) -> u32 {
        self.half_period_nanos.load(Ordering::Relaxed)
    }

    /// Returns the scheduled half-period as a [`Duration`].
    #[must_use]
    pub fn half_period(&self) -> Duration {
        Duration::from_nanos(u64::from(self.half_period_nanos()))
    }

    /// Arms the alarm flasher. Idempotent; there is no disarm.
    pub fn arm_flasher(&self) {
        self.flasher_armed.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once any alarm has armed the flasher.
    #[must_use]
    pub fn flasher_armed(&self) -> bool {
        self.flasher_armed.load(Ordering::Relaxed)
    }
}

impl Default for PulseControl {
    fn default() -> Self {
        Self::new()
    }
}

/// What the pulse callback drives on one tick.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PulseDrive {
    pub pulse: Level,
    pub enable: LineAction,
}

/// Pulse output toggled at each half-period tick.
///
/// The toggle is a read-modify-write on the retained output level rather
/// than a derived counter, so replacing the schedule between ticks never
/// desynchronizes the square wave.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PulseChannel {
    level: Level,
}

impl PulseChannel {
    /// Creates a channel with the pulse output at its idle level.
    #[must_use]
    pub const fn new() -> Self {
        Self { level: Level::Low }
    }

    /// Advances one half-period: toggles the pulse level and reports the
    /// laser-enable action for the current gate.
    pub fn tick(&mut self, trigger_enabled: bool) -> PulseDrive {
        self.level = self.level.toggle();
        PulseDrive {
            pulse: self.level,
            enable: if trigger_enabled {
                LineAction::Assert
            } else {
                LineAction::Release
            },
        }
    }

    /// Returns the retained pulse output level.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Default for PulseChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// 1 Hz indicator toggle once any alarm has fired.
///
/// Never stops: the original controller provides no cancellation, and the
/// indicator keeps flashing even after the control loop leaves the alarm
/// mode. Preserved as a design decision, not fixed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AlarmFlasher {
    level: Level,
}

impl AlarmFlasher {
    /// Creates a flasher with the indicator at its idle level.
    #[must_use]
    pub const fn new() -> Self {
        Self { level: Level::Low }
    }

    /// Toggles the indicator level and returns the new level to drive.
    pub fn tick(&mut self) -> Level {
        self.level = self.level.toggle();
        self.level
    }
}

impl Default for AlarmFlasher {
    fn default() -> Self {
        Self::new()
    }
}
