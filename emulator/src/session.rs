use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use laser_core::controller::LaserController;
use laser_core::port::{CycleDelay, LaserPort};
use laser_core::pulse::PulseControl;
use laser_core::signals::{InputId, Level, OutputId, input_by_id, output_by_id};

const HELP_TOPICS: &[(&str, &str)] = &[
    ("on", "on                    - hold switch 1 (laser on)"),
    ("setrate", "setrate               - hold switch 2 (pulse-rate setting)"),
    ("idle", "idle                  - release both switches"),
    (
        "alarm",
        "alarm <temp|reflect|mo|none> - drive the alarm input bits",
    ),
    ("dial", "dial <0-255>          - set the operator dial"),
    ("cycle", "cycle [n]             - run n control cycles (default 1)"),
    ("status", "status                - show controller and gate state"),
    ("help", "help                  - show this message"),
];

type EventLog = Rc<RefCell<Vec<String>>>;

/// Host-side stand-in for the laser control port.
///
/// Inputs are set by session commands; output transitions are recorded as
/// printable lines, edge-triggered so steady re-assertion stays quiet.
struct SimulatedPort {
    log: EventLog,
    inputs: [Level; 5],
    dial: u8,
    outputs: [Option<Level>; 5],
    power_level_bits: [Level; 8],
    display: Option<u16>,
}

impl SimulatedPort {
    fn new(log: EventLog) -> Self {
        let released = |id: InputId| input_by_id(id).active.released();
        Self {
            log,
            inputs: [
                released(InputId::Switch1),
                released(InputId::Switch2),
                // The no-alarm code is LSB low / MSB high; a fresh session
                // simulates a healthy laser engine, not floating inputs.
                Level::Low,
                Level::High,
                released(InputId::TriggerIn),
            ],
            dial: 0,
            outputs: [None; 5],
            power_level_bits: [Level::High; 8],
            display: None,
        }
    }

    fn set_input(&mut self, input: InputId, level: Level) {
        self.inputs[input.as_index()] = level;
    }

    fn press(&mut self, input: InputId) {
        self.set_input(input, input_by_id(input).active.asserted());
    }

    fn release(&mut self, input: InputId) {
        self.set_input(input, input_by_id(input).active.released());
    }

    /// Reconstructs the power level from the active-low bit outputs.
    fn power_value(&self) -> u8 {
        let mut value = 0u8;
        for (bit, level) in self.power_level_bits.iter().enumerate() {
            if *level == Level::Low {
                value |= 1 << bit;
            }
        }
        value
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Low => "low",
        Level::High => "high",
    }
}

impl LaserPort for SimulatedPort {
    fn read_input(&mut self, input: InputId) -> Level {
        self.inputs[input.as_index()]
    }

    fn read_debounced(&mut self, input: InputId) -> Level {
        // The simulation has no contact bounce to filter.
        self.inputs[input.as_index()]
    }

    fn write_output(&mut self, output: OutputId, level: Level) {
        let slot = &mut self.outputs[output.as_index()];
        if *slot != Some(level) {
            *slot = Some(level);
            let line = output_by_id(output);
            let state = if line.active.is_asserted(level) {
                "asserted"
            } else {
                "released"
            };
            self.log
                .borrow_mut()
                .push(format!("{} -> {} ({state})", line.name, level_tag(level)));
        }
    }

    fn write_power_bit(&mut self, bit: u8, level: Level) {
        if let Some(slot) = self.power_level_bits.get_mut(usize::from(bit)) {
            *slot = level;
        }
    }

    fn read_dial(&mut self) -> u8 {
        self.dial
    }

    fn write_display(&mut self, counts: u16) {
        if self.display != Some(counts) {
            self.display = Some(counts);
            self.log
                .borrow_mut()
                .push(format!("display <- {counts} counts"));
        }
    }
}

/// Delay that records the hold instead of sleeping.
struct SimulatedDelay {
    log: EventLog,
}

impl CycleDelay for SimulatedDelay {
    fn block_for(&mut self, wait: Duration) {
        self.log
            .borrow_mut()
            .push(format!("hold {} ms", wait.as_millis()));
    }
}

pub struct Session {
    controller: LaserController<'static, SimulatedPort, SimulatedDelay>,
    gates: &'static PulseControl,
    log: EventLog,
}

impl Session {
    pub fn new() -> Self {
        // Each session gets its own leaked gate block; the emulator runs
        // one session per process.
        let gates: &'static PulseControl = Box::leak(Box::new(PulseControl::new()));
        let log: EventLog = Rc::new(RefCell::new(Vec::new()));
        let port = SimulatedPort::new(Rc::clone(&log));
        let delay = SimulatedDelay {
            log: Rc::clone(&log),
        };
        Self {
            controller: LaserController::new(port, delay, gates),
            gates,
            log,
        }
    }

    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Vec::new();
        };

        match command.to_ascii_lowercase().as_str() {
            "help" => Self::handle_help(words.next()),
            "on" => {
                self.controller.port_mut().press(InputId::Switch1);
                vec!["switch 1 held".to_string()]
            }
            "setrate" => {
                self.controller.port_mut().release(InputId::Switch1);
                self.controller.port_mut().press(InputId::Switch2);
                vec!["switch 2 held".to_string()]
            }
            "idle" => {
                self.controller.port_mut().release(InputId::Switch1);
                self.controller.port_mut().release(InputId::Switch2);
                vec!["switches released".to_string()]
            }
            "alarm" => self.handle_alarm(words.next()),
            "dial" => self.handle_dial(words.next()),
            "cycle" => self.handle_cycle(words.next()),
            "status" => self.handle_status(),
            other => vec![format!("ERR unknown command `{other}`; try `help`")],
        }
    }

    fn handle_help(topic: Option<&str>) -> Vec<String> {
        match topic {
            None => HELP_TOPICS
                .iter()
                .map(|(_, text)| (*text).to_string())
                .collect(),
            Some(topic) => HELP_TOPICS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(topic))
                .map_or_else(
                    || vec![format!("ERR no help for `{topic}`; try `help`")],
                    |(_, text)| vec![(*text).to_string()],
                ),
        }
    }

    fn handle_alarm(&mut self, tag: Option<&str>) -> Vec<String> {
        let (lsb, msb, label) = match tag.map(str::to_ascii_lowercase).as_deref() {
            Some("none") => (Level::Low, Level::High, "cleared"),
            Some("temp") => (Level::Low, Level::Low, "temperature"),
            Some("reflect") => (Level::High, Level::Low, "high reflection"),
            Some("mo") => (Level::High, Level::High, "MO"),
            _ => return vec!["ERR usage: alarm <temp|reflect|mo|none>".to_string()],
        };
        let port = self.controller.port_mut();
        port.set_input(InputId::AlarmLsb, lsb);
        port.set_input(InputId::AlarmMsb, msb);
        vec![format!("alarm inputs {label}")]
    }

    fn handle_dial(&mut self, value: Option<&str>) -> Vec<String> {
        match value.and_then(|raw| raw.parse::<u8>().ok()) {
            Some(dial) => {
                self.controller.port_mut().dial = dial;
                vec![format!("dial set to {dial}")]
            }
            None => vec!["ERR usage: dial <0-255>".to_string()],
        }
    }

    fn handle_cycle(&mut self, count: Option<&str>) -> Vec<String> {
        let Some(cycles) = count.map_or(Some(1usize), |raw| raw.parse().ok()) else {
            return vec!["ERR usage: cycle [n]".to_string()];
        };

        for _ in 0..cycles {
            self.controller.poll_cycle();
        }

        let mut responses: Vec<String> = self.log.borrow_mut().drain(..).collect();
        responses.push(format!(
            "mode={:?} after {cycles} cycle(s)",
            self.controller.mode()
        ));
        responses
    }

    fn handle_status(&mut self) -> Vec<String> {
        let report = self.controller.status_report();
        let mut lines = vec![report.render().as_str().to_string()];
        lines.push(format!(
            "trigger gate {} | half-period {} ns | flasher {}",
            if self.gates.trigger_enabled() {
                "open"
            } else {
                "closed"
            },
            self.gates.half_period_nanos(),
            if self.gates.flasher_armed() {
                "armed"
            } else {
                "dormant"
            },
        ));
        lines.push(format!(
            "power outputs encode {} | display {:?}",
            self.controller.port().power_value(),
            self.controller.port().display,
        ));
        lines
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
