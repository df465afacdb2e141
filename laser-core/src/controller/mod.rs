//! The front-panel control cycle.
//!
//! Each cycle samples the alarm bits and mode switches, derives the next
//! operating mode, then applies that mode's output actions. Mode actions
//! are level-driven and re-applied every cycle; only the ON-entry
//! transition runs the blocking power-up sequence, and only once per
//! entry.

use crate::encoders;
use crate::mode::{AlarmState, OperatingMode, STARTUP_MODE, decode_alarm};
use crate::port::{CycleDelay, LaserPort};
use crate::pulse::PulseControl;
use crate::sequences::{SequenceTemplate, emission_stop_template, startup_template};
use crate::signals::{InputId, LineAction, OutputId, POWER_BIT_COUNT, output_by_id};
use crate::status::StatusReport;

/// Owns the platform capabilities and the per-cycle mode state.
///
/// The shared [`PulseControl`] is borrowed rather than owned so the
/// periodic pulse and flasher callbacks can observe the same words the
/// control cycle writes.
pub struct LaserController<'a, P, D> {
    port: P,
    delay: D,
    gates: &'a PulseControl,
    mode: OperatingMode,
    alarm: AlarmState,
    power_level: u8,
}

impl<'a, P, D> LaserController<'a, P, D>
where
    P: LaserPort,
    D: CycleDelay,
{
    /// Creates a controller in the reserved boot mode with no alarm
    /// recorded.
    pub fn new(port: P, delay: D, gates: &'a PulseControl) -> Self {
        Self {
            port,
            delay,
            gates,
            mode: STARTUP_MODE,
            alarm: AlarmState::None,
            power_level: 0,
        }
    }

    /// Current operating mode.
    #[must_use]
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Sticky alarm state; cleared only by a later alarm overwrite, never
    /// by recovery.
    #[must_use]
    pub fn alarm(&self) -> AlarmState {
        self.alarm
    }

    /// Last sampled power level.
    #[must_use]
    pub fn power_level(&self) -> u8 {
        self.power_level
    }

    /// Shared access to the platform port.
    #[must_use]
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Exclusive access to the platform port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Snapshot published on the debug channel.
    #[must_use]
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            alarm: self.alarm,
            power_level: self.power_level,
            mode: self.mode,
        }
    }

    /// Runs one control cycle: derive the next mode from the inputs, then
    /// apply that mode's output actions.
    pub fn poll_cycle(&mut self) {
        let next = self.next_mode();
        self.run_mode(next);
    }

    /// Derives the next operating mode from the alarm bits and switches.
    ///
    /// Alarms preempt the switches unconditionally. Switch 1 selects ON;
    /// switch 2 is only sampled once switch 1 reads released, so holding
    /// both switches behaves as ON.
    fn next_mode(&mut self) -> OperatingMode {
        let lsb = self.port.read_input(InputId::AlarmLsb);
        let msb = self.port.read_input(InputId::AlarmMsb);
        if let Some(alarm) = decode_alarm(lsb, msb) {
            return alarm;
        }

        if self.switch_asserted(InputId::Switch1) {
            // The power-up edge fires once per ON entry; boot and alarm
            // modes take the level-driven path in run_mode instead.
            if matches!(self.mode, OperatingMode::Idle | OperatingMode::OffSetRate) {
                self.run_sequence(&startup_template());
            }
            OperatingMode::On
        } else if self.switch_asserted(InputId::Switch2) {
            OperatingMode::OffSetRate
        } else {
            OperatingMode::Idle
        }
    }

    /// Applies the output actions for `mode` and records it.
    fn run_mode(&mut self, mode: OperatingMode) {
        match mode {
            OperatingMode::On => {
                self.gates.set_trigger_enabled(true);
                // Level-driven re-assertion; on the boot-to-ON edge this is
                // the only path that raises the enables.
                self.drive(OutputId::MoEnable, LineAction::Assert);
                self.drive(OutputId::OnEnable, LineAction::Assert);
                self.encode_power_level();
                self.drive(OutputId::IndicatorLed, LineAction::Assert);
            }
            OperatingMode::Idle => {
                self.stop_emission();
                self.encode_power_level();
                self.drive(OutputId::IndicatorLed, LineAction::Release);
            }
            OperatingMode::OffSetRate => {
                self.stop_emission();
                self.encode_pulse_rate();
                self.drive(OutputId::IndicatorLed, LineAction::Release);
            }
            OperatingMode::AlarmTemperature
            | OperatingMode::AlarmReflection
            | OperatingMode::AlarmMo
            | OperatingMode::AlarmReserved => {
                self.alarm_actions(mode);
            }
        }
        self.mode = mode;
    }

    /// Closes the trigger gate and runs the emission shutdown sequence.
    fn stop_emission(&mut self) {
        self.gates.set_trigger_enabled(false);
        self.run_sequence(&emission_stop_template());
    }

    /// Alarm handling: arm the flasher, blank the display, and shut down
    /// emission. Safe to repeat every cycle while the alarm persists.
    fn alarm_actions(&mut self, mode: OperatingMode) {
        self.gates.arm_flasher();
        self.port.write_display(0);
        self.stop_emission();
        self.alarm = AlarmState::for_mode(mode);
    }

    /// Samples the dial and encodes it onto the eight binary power outputs
    /// and the panel meter.
    fn encode_power_level(&mut self) {
        let level = self.port.read_dial();
        self.power_level = level;
        for bit in 0..POWER_BIT_COUNT {
            self.port
                .write_power_bit(bit, encoders::power_bit_level(level, bit));
        }
        let millivolts = encoders::level_millivolts(level);
        self.port.write_display(encoders::display_counts(millivolts));
    }

    /// Samples the dial, reschedules the pulse generator, and shows the
    /// selected frequency (times ten) on the panel meter.
    fn encode_pulse_rate(&mut self) {
        let dial = self.port.read_dial();
        let frequency = encoders::pulse_frequency_khz(dial);
        self.gates
            .set_half_period_nanos(encoders::pulse_half_period_nanos(frequency));
        self.port
            .write_display(encoders::display_counts(frequency * encoders::RATE_DISPLAY_SCALE));
    }

    /// Drives the steps of a sequence template in order, blocking for each
    /// non-zero hold.
    fn run_sequence(&mut self, template: &SequenceTemplate) {
        for step in template.steps() {
            self.drive(step.line, step.action);
            let hold = step.hold_duration();
            if !hold.is_zero() {
                self.delay.block_for(hold);
            }
        }
    }

    /// Drives a named output through the catalog's polarity.
    fn drive(&mut self, output: OutputId, action: LineAction) {
        let line = output_by_id(output);
        self.port.write_output(output, action.level_for(line));
    }

    fn switch_asserted(&mut self, input: InputId) -> bool {
        let line = crate::signals::input_by_id(input);
        let level = self.port.read_debounced(input);
        line.active.is_asserted(level)
    }
}
