//! Periodic status reporting on the debug channel.

use core::fmt::{self, Write as _};
use core::time::Duration;

use heapless::String;

use crate::mode::{AlarmState, OperatingMode};

/// Interval between status line emissions.
pub const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Capacity of a rendered status line.
pub const STATUS_LINE_CAPACITY: usize = 48;

/// Snapshot of the controller state published once per status interval.
///
/// The reports are diagnostic only; a dropped line has no control-flow
/// consequence.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StatusReport {
    pub alarm: AlarmState,
    pub power_level: u8,
    pub mode: OperatingMode,
}

impl StatusReport {
    /// Renders the report as a fixed-capacity line.
    ///
    /// The worst-case rendering ("high reflection", three-digit level,
    /// single-digit code) fits well within the capacity, so the write
    /// cannot fail.
    #[must_use]
    pub fn render(&self) -> String<STATUS_LINE_CAPACITY> {
        let mut line = String::new();
        let _ = write!(
            line,
            "alarm={} power={} mode={}",
            self.alarm,
            self.power_level,
            self.mode.code()
        );
        line
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alarm={} power={} mode={}",
            self.alarm,
            self.power_level,
            self.mode.code()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_renders_label_level_and_code() {
        let report = StatusReport {
            alarm: AlarmState::None,
            power_level: 128,
            mode: OperatingMode::Idle,
        };
        assert_eq!(report.render().as_str(), "alarm=none power=128 mode=1");
    }

    #[test]
    fn worst_case_line_fits_capacity() {
        let report = StatusReport {
            alarm: AlarmState::Reflection,
            power_level: 255,
            mode: OperatingMode::AlarmReserved,
        };
        let line = report.render();
        assert_eq!(line.as_str(), "alarm=high reflection power=255 mode=7");
        assert!(line.len() <= STATUS_LINE_CAPACITY);
    }
}
