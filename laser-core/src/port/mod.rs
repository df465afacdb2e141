//! Platform capability seam.
//!
//! The core never depends on a specific register layout; targets implement
//! these traits over whatever pin, ADC, and DAC access they have. The
//! debounced reads cover the mechanical switch inputs, the raw reads cover
//! the alarm bits reported by the laser engine.

use core::time::Duration;

use crate::signals::{InputId, Level, OutputId, input_by_id};

/// Discrete and analog access to the laser control port.
pub trait LaserPort {
    /// Samples a raw discrete input.
    fn read_input(&mut self, input: InputId) -> Level;

    /// Samples a debounced discrete input (mechanical switches).
    fn read_debounced(&mut self, input: InputId) -> Level;

    /// Drives a named discrete output.
    fn write_output(&mut self, output: OutputId, level: Level);

    /// Drives one of the eight binary power-level outputs.
    fn write_power_bit(&mut self, bit: u8, level: Level);

    /// Reads the operator dial scaled to 8 bits.
    fn read_dial(&mut self) -> u8;

    /// Writes the panel-meter output in DAC counts.
    fn write_display(&mut self, counts: u16);
}

/// Blocking wait used by the safety sequences.
///
/// Implementations must stall the calling control cycle for the full
/// duration; interrupt-level periodic callbacks keep firing during the
/// wait, but no input sampling happens.
pub trait CycleDelay {
    fn block_for(&mut self, wait: Duration);
}

/// Port that performs no hardware interaction.
///
/// Inputs read back as their released level; writes are discarded.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopLaserPort;

impl NoopLaserPort {
    /// Creates a new no-op port.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LaserPort for NoopLaserPort {
    fn read_input(&mut self, input: InputId) -> Level {
        input_by_id(input).active.released()
    }

    fn read_debounced(&mut self, input: InputId) -> Level {
        input_by_id(input).active.released()
    }

    fn write_output(&mut self, _: OutputId, _: Level) {}

    fn write_power_bit(&mut self, _: u8, _: Level) {}

    fn read_dial(&mut self) -> u8 {
        0
    }

    fn write_display(&mut self, _: u16) {}
}

/// Delay that returns immediately.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDelay;

impl NoopDelay {
    /// Creates a new no-op delay.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CycleDelay for NoopDelay {
    fn block_for(&mut self, _: Duration) {}
}
