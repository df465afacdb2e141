//! Laser enable/disable sequencing shared by firmware and host targets.
//!
//! The laser engine mandates a strict actuation order on its enable lines;
//! the controller encodes each ordered actuation as a constant step
//! template so the same data drives the MCU firmware, the emulator, and
//! the tests.

use core::time::Duration;

use crate::signals::{LineAction, OutputId};

pub mod emission_stop;
pub mod startup;

pub use emission_stop::{EMISSION_STOP_STEPS, EMISSION_STOP_TEMPLATE, emission_stop_template};
pub use startup::{STARTUP_STEPS, STARTUP_TEMPLATE, startup_template};

/// Ordered actuation the controller applies to an enable line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EnableStep {
    pub line: OutputId,
    pub action: LineAction,
    /// Blocking hold after driving the line, before the next step.
    pub hold_for: Duration,
    /// Minimum hold the hardware requires, when one exists.
    pub min_hold: Option<Duration>,
}

impl EnableStep {
    pub const fn new(
        line: OutputId,
        action: LineAction,
        hold_for: Duration,
        min_hold: Option<Duration>,
    ) -> Self {
        Self {
            line,
            action,
            hold_for,
            min_hold,
        }
    }

    /// Returns the hold duration as a [`Duration`].
    #[must_use]
    pub const fn hold_duration(&self) -> Duration {
        self.hold_for
    }

    /// Validates that a hold duration satisfies the step's minimum.
    #[must_use]
    pub fn allows_hold(&self, hold: Duration) -> bool {
        match self.min_hold {
            Some(min) => hold >= min,
            None => true,
        }
    }
}

/// The kind of sequence described by a template.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SequenceKind {
    /// MO-before-ON power-up ordering.
    Startup,
    /// ON-before-MO release ordering.
    EmissionStop,
}

/// Immutable sequence template shared across targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SequenceTemplate {
    pub kind: SequenceKind,
    pub steps: &'static [EnableStep],
}

impl SequenceTemplate {
    pub const fn new(kind: SequenceKind, steps: &'static [EnableStep]) -> Self {
        Self { kind, steps }
    }

    /// Returns the ordered steps that make up the sequence.
    #[must_use]
    pub const fn steps(&self) -> &'static [EnableStep] {
        self.steps
    }

    /// Returns the number of steps contained in the template.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_hold_validation_honors_minimum() {
        let step = EnableStep::new(
            OutputId::MoEnable,
            LineAction::Assert,
            Duration::from_millis(5),
            Some(Duration::from_millis(5)),
        );
        assert!(step.allows_hold(Duration::from_millis(5)));
        assert!(step.allows_hold(Duration::from_millis(7)));
        assert!(!step.allows_hold(Duration::from_millis(4)));

        let unconstrained = EnableStep::new(
            OutputId::OnEnable,
            LineAction::Assert,
            Duration::ZERO,
            None,
        );
        assert!(unconstrained.allows_hold(Duration::ZERO));
    }

    #[test]
    fn template_reports_steps() {
        const STEPS: [EnableStep; 1] = [EnableStep::new(
            OutputId::OnEnable,
            LineAction::Release,
            Duration::from_millis(1),
            Some(Duration::from_millis(1)),
        )];
        const TEMPLATE: SequenceTemplate = SequenceTemplate::new(SequenceKind::EmissionStop, &STEPS);

        assert_eq!(TEMPLATE.kind, SequenceKind::EmissionStop);
        assert_eq!(TEMPLATE.step_count(), 1);
        assert_eq!(TEMPLATE.steps()[0].line, OutputId::OnEnable);
    }
}
