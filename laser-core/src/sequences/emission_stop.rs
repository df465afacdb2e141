//! Emission shutdown sequence.
//!
//! Leaving the ON mode (or entering any alarm mode) releases the emission
//! gate first and the master oscillator 1 ms later, mirroring the
//! manufacturer's required de-assertion ordering. The hold deliberately
//! blocks the control cycle for that millisecond.

use core::time::Duration;

use super::{EnableStep, SequenceKind, SequenceTemplate};
use crate::signals::{LineAction, OutputId};

/// Hold between the ON release and the MO release.
pub const ON_RELEASE_HOLD: Duration = Duration::from_millis(1);

/// Ordered steps that implement the emission shutdown sequence.
pub const EMISSION_STOP_STEPS: [EnableStep; 2] = [
    // Close the emission gate and wait out the required separation.
    EnableStep::new(
        OutputId::OnEnable,
        LineAction::Release,
        ON_RELEASE_HOLD,
        Some(ON_RELEASE_HOLD),
    ),
    // Disable the master oscillator.
    EnableStep::new(OutputId::MoEnable, LineAction::Release, Duration::ZERO, None),
];

/// Sequence template describing the emission shutdown workflow.
pub const EMISSION_STOP_TEMPLATE: SequenceTemplate =
    SequenceTemplate::new(SequenceKind::EmissionStop, &EMISSION_STOP_STEPS);

/// Returns the shared emission shutdown template.
#[must_use]
pub const fn emission_stop_template() -> SequenceTemplate {
    EMISSION_STOP_TEMPLATE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emission_stop_matches_required_ordering() {
        assert_eq!(EMISSION_STOP_TEMPLATE.kind, SequenceKind::EmissionStop);
        assert_eq!(EMISSION_STOP_TEMPLATE.step_count(), 2);

        let on = &EMISSION_STOP_STEPS[0];
        assert_eq!(on.line, OutputId::OnEnable);
        assert_eq!(on.action, LineAction::Release);
        assert_eq!(on.hold_for, ON_RELEASE_HOLD);
        assert_eq!(on.min_hold, Some(ON_RELEASE_HOLD));

        let mo = &EMISSION_STOP_STEPS[1];
        assert_eq!(mo.line, OutputId::MoEnable);
        assert_eq!(mo.action, LineAction::Release);
        assert_eq!(mo.hold_for, Duration::ZERO);
    }
}
