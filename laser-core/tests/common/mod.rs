//! Recording bench used by the integration tests.
//!
//! The port and the delay share one ordered trace so output writes and
//! blocking waits interleave exactly as the controller issued them; the
//! sequencing tests assert on that ordering.

use core::cell::RefCell;
use core::time::Duration;

use std::rc::Rc;

use laser_core::port::{CycleDelay, LaserPort};
use laser_core::signals::{InputId, Level, OutputId, input_by_id};

/// One recorded port interaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PortOp {
    Write(OutputId, Level),
    PowerBit(u8, Level),
    Display(u16),
    Wait(Duration),
}

pub type Trace = Rc<RefCell<Vec<PortOp>>>;

/// Settable input state plus an op recorder.
pub struct BenchPort {
    trace: Trace,
    inputs: [Level; 5],
    dial: u8,
    pub outputs: [Option<Level>; 5],
    pub power_bits: [Option<Level>; 8],
    pub display: Option<u16>,
}

impl BenchPort {
    /// Creates a port with the switches released and the alarm bits at
    /// the no-alarm code.
    ///
    /// The alarm pattern is asymmetric: only LSB low / MSB high reads as
    /// normal, so "everything released" is not a quiescent laser engine.
    pub fn new(trace: Trace) -> Self {
        let released = |id| -> Level { input_by_id(id).active.released() };
        Self {
            trace,
            inputs: [
                released(InputId::Switch1),
                released(InputId::Switch2),
                Level::Low,
                Level::High,
                released(InputId::TriggerIn),
            ],
            dial: 0,
            outputs: [None; 5],
            power_bits: [None; 8],
            display: None,
        }
    }

    pub fn set_input(&mut self, input: InputId, level: Level) {
        self.inputs[input.as_index()] = level;
    }

    /// Drives an input to its asserted level.
    pub fn press(&mut self, input: InputId) {
        self.set_input(input, input_by_id(input).active.asserted());
    }

    /// Drives an input back to its released level.
    pub fn release(&mut self, input: InputId) {
        self.set_input(input, input_by_id(input).active.released());
    }

    pub fn set_alarm_bits(&mut self, lsb: Level, msb: Level) {
        self.set_input(InputId::AlarmLsb, lsb);
        self.set_input(InputId::AlarmMsb, msb);
    }

    pub fn set_dial(&mut self, value: u8) {
        self.dial = value;
    }

    /// Latest level written to a named output.
    pub fn output(&self, output: OutputId) -> Option<Level> {
        self.outputs[output.as_index()]
    }
}

impl LaserPort for BenchPort {
    fn read_input(&mut self, input: InputId) -> Level {
        self.inputs[input.as_index()]
    }

    fn read_debounced(&mut self, input: InputId) -> Level {
        self.inputs[input.as_index()]
    }

    fn write_output(&mut self, output: OutputId, level: Level) {
        self.outputs[output.as_index()] = Some(level);
        self.trace.borrow_mut().push(PortOp::Write(output, level));
    }

    fn write_power_bit(&mut self, bit: u8, level: Level) {
        self.power_bits[usize::from(bit)] = Some(level);
        self.trace.borrow_mut().push(PortOp::PowerBit(bit, level));
    }

    fn read_dial(&mut self) -> u8 {
        self.dial
    }

    fn write_display(&mut self, counts: u16) {
        self.display = Some(counts);
        self.trace.borrow_mut().push(PortOp::Display(counts));
    }
}

/// Delay that records its waits into the shared trace.
pub struct BenchDelay {
    trace: Trace,
}

impl BenchDelay {
    pub fn new(trace: Trace) -> Self {
        Self { trace }
    }
}

impl CycleDelay for BenchDelay {
    fn block_for(&mut self, wait: Duration) {
        self.trace.borrow_mut().push(PortOp::Wait(wait));
    }
}

/// Creates a trace plus a port/delay pair recording into it.
pub fn bench() -> (Trace, BenchPort, BenchDelay) {
    let trace: Trace = Rc::new(RefCell::new(Vec::new()));
    let port = BenchPort::new(Rc::clone(&trace));
    let delay = BenchDelay::new(Rc::clone(&trace));
    (trace, port, delay)
}

/// Index of the first occurrence of `op` in the trace, if any.
pub fn position_of(trace: &Trace, op: PortOp) -> Option<usize> {
    trace.borrow().iter().position(|recorded| *recorded == op)
}
