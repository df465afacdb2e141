//! Signal catalog for the laser control port.
//!
//! Every discrete line the controller touches is described here together
//! with its electrical contract: polarity and idle level. The catalog keeps
//! the core free of any register or pin-map knowledge; targets translate
//! [`InputId`] and [`OutputId`] to concrete pins.

/// Logic level on a discrete line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Returns the opposite level.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Polarity convention: which electrical level means "asserted".
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    ActiveLow,
    ActiveHigh,
}

impl ActiveLevel {
    /// Level that drives a line of this polarity to its asserted state.
    #[must_use]
    pub const fn asserted(self) -> Level {
        match self {
            ActiveLevel::ActiveLow => Level::Low,
            ActiveLevel::ActiveHigh => Level::High,
        }
    }

    /// Level that drives a line of this polarity to its released state.
    #[must_use]
    pub const fn released(self) -> Level {
        self.asserted().toggle()
    }

    /// Returns `true` when `level` represents the asserted state.
    #[must_use]
    pub const fn is_asserted(self, level: Level) -> bool {
        matches!(
            (self, level),
            (ActiveLevel::ActiveLow, Level::Low) | (ActiveLevel::ActiveHigh, Level::High)
        )
    }
}

/// Identifier for the discrete inputs sampled by the control cycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InputId {
    Switch1,
    Switch2,
    AlarmLsb,
    AlarmMsb,
    TriggerIn,
}

impl InputId {
    /// Deterministic index for lookups into [`CONTROL_INPUTS`].
    #[must_use]
    pub const fn as_index(self) -> usize {
        match self {
            InputId::Switch1 => 0,
            InputId::Switch2 => 1,
            InputId::AlarmLsb => 2,
            InputId::AlarmMsb => 3,
            InputId::TriggerIn => 4,
        }
    }
}

/// Identifier for the discrete outputs driven by the controller.
///
/// The eight binary power-level outputs are addressed separately by bit
/// index; see [`crate::encoders::power_bit_level`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputId {
    MoEnable,
    OnEnable,
    IndicatorLed,
    Guide,
    Pulse,
}

impl OutputId {
    /// Deterministic index for lookups into [`CONTROL_OUTPUTS`].
    #[must_use]
    pub const fn as_index(self) -> usize {
        match self {
            OutputId::MoEnable => 0,
            OutputId::OnEnable => 1,
            OutputId::IndicatorLed => 2,
            OutputId::Guide => 3,
            OutputId::Pulse => 4,
        }
    }
}

/// Number of discrete outputs carrying the binary power level.
pub const POWER_BIT_COUNT: u8 = 8;

/// Polarity of the binary power-level outputs: a set bit drives its line low.
pub const POWER_BITS_ACTIVE: ActiveLevel = ActiveLevel::ActiveLow;

/// Metadata describing an input line's electrical contract.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InputLine {
    pub id: InputId,
    pub name: &'static str,
    pub active: ActiveLevel,
    /// Mechanical switch lines are read through the platform debouncer.
    pub debounced: bool,
}

impl InputLine {
    pub const fn new(id: InputId, name: &'static str, active: ActiveLevel, debounced: bool) -> Self {
        Self {
            id,
            name,
            active,
            debounced,
        }
    }
}

/// Compile-time catalog of every input line.
pub const CONTROL_INPUTS: [InputLine; 5] = [
    InputLine::new(InputId::Switch1, "SW1", ActiveLevel::ActiveLow, true),
    InputLine::new(InputId::Switch2, "SW2", ActiveLevel::ActiveLow, true),
    InputLine::new(InputId::AlarmLsb, "ALM0", ActiveLevel::ActiveHigh, false),
    InputLine::new(InputId::AlarmMsb, "ALM1", ActiveLevel::ActiveHigh, false),
    // Pulled up on the board, currently unused by the control cycle.
    InputLine::new(InputId::TriggerIn, "TRIG", ActiveLevel::ActiveLow, false),
];

/// Metadata describing an output line's electrical contract.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OutputLine {
    pub id: OutputId,
    pub name: &'static str,
    pub active: ActiveLevel,
    /// Level the target drives during bring-up, before the first cycle.
    pub idle: Level,
}

impl OutputLine {
    pub const fn new(id: OutputId, name: &'static str, active: ActiveLevel, idle: Level) -> Self {
        Self {
            id,
            name,
            active,
            idle,
        }
    }
}

/// Compile-time catalog of every named output line.
pub const CONTROL_OUTPUTS: [OutputLine; 5] = [
    OutputLine::new(OutputId::MoEnable, "MO", ActiveLevel::ActiveLow, Level::High),
    OutputLine::new(OutputId::OnEnable, "ON", ActiveLevel::ActiveLow, Level::High),
    OutputLine::new(
        OutputId::IndicatorLed,
        "LED",
        ActiveLevel::ActiveHigh,
        Level::Low,
    ),
    // The visible guide beam is on from initialization onwards.
    OutputLine::new(OutputId::Guide, "GUIDE", ActiveLevel::ActiveLow, Level::Low),
    OutputLine::new(OutputId::Pulse, "PULSE", ActiveLevel::ActiveHigh, Level::Low),
];

/// Retrieve input metadata by identifier.
#[must_use]
pub const fn input_by_id(id: InputId) -> InputLine {
    CONTROL_INPUTS[id.as_index()]
}

/// Retrieve output metadata by identifier.
#[must_use]
pub const fn output_by_id(id: OutputId) -> OutputLine {
    CONTROL_OUTPUTS[id.as_index()]
}

/// Action applied to an output line, resolved to a level via its polarity.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineAction {
    Assert,
    Release,
}

impl LineAction {
    /// Concrete level for this action on the given line.
    #[must_use]
    pub const fn level_for(self, line: OutputLine) -> Level {
        match self {
            LineAction::Assert => line.active.asserted(),
            LineAction::Release => line.active.released(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_returns_expected_metadata() {
        let mo = output_by_id(OutputId::MoEnable);
        assert_eq!(mo.name, "MO");
        assert_eq!(mo.active, ActiveLevel::ActiveLow);
        assert_eq!(mo.idle, Level::High);

        let guide = output_by_id(OutputId::Guide);
        assert_eq!(guide.active, ActiveLevel::ActiveLow);
        assert_eq!(guide.idle, Level::Low, "guide beam is on at init");

        let sw1 = input_by_id(InputId::Switch1);
        assert!(sw1.debounced);
        assert_eq!(sw1.active, ActiveLevel::ActiveLow);

        let alarm = input_by_id(InputId::AlarmMsb);
        assert!(!alarm.debounced);
        assert_eq!(alarm.active, ActiveLevel::ActiveHigh);
    }

    #[test]
    fn actions_resolve_through_polarity() {
        let mo = output_by_id(OutputId::MoEnable);
        assert_eq!(LineAction::Assert.level_for(mo), Level::Low);
        assert_eq!(LineAction::Release.level_for(mo), Level::High);

        let led = output_by_id(OutputId::IndicatorLed);
        assert_eq!(LineAction::Assert.level_for(led), Level::High);
        assert_eq!(LineAction::Release.level_for(led), Level::Low);
    }

    #[test]
    fn asserted_level_detection_matches_polarity() {
        assert!(ActiveLevel::ActiveLow.is_asserted(Level::Low));
        assert!(!ActiveLevel::ActiveLow.is_asserted(Level::High));
        assert!(ActiveLevel::ActiveHigh.is_asserted(Level::High));
        assert_eq!(ActiveLevel::ActiveHigh.released(), Level::Low);
    }
}
