//! Power-up sequence mandated by the laser manufacturer.
//!
//! The master oscillator (MO) must be enabled at least 5 ms before the
//! emission gate. Asserting ON before MO, or with less separation, risks
//! damaging the laser engine and must never occur under any caller.

use core::time::Duration;

use super::{EnableStep, SequenceKind, SequenceTemplate};
use crate::signals::{LineAction, OutputId};

/// Minimum setup time between the MO assert and the ON assert.
pub const MO_SETUP: Duration = Duration::from_millis(5);

/// Ordered steps that implement the power-up sequence.
pub const STARTUP_STEPS: [EnableStep; 2] = [
    // Enable the master oscillator and let it settle.
    EnableStep::new(
        OutputId::MoEnable,
        LineAction::Assert,
        MO_SETUP,
        Some(MO_SETUP),
    ),
    // Open the emission gate.
    EnableStep::new(OutputId::OnEnable, LineAction::Assert, Duration::ZERO, None),
];

/// Sequence template describing the power-up workflow.
pub const STARTUP_TEMPLATE: SequenceTemplate =
    SequenceTemplate::new(SequenceKind::Startup, &STARTUP_STEPS);

/// Returns the shared power-up template.
#[must_use]
pub const fn startup_template() -> SequenceTemplate {
    STARTUP_TEMPLATE
}
