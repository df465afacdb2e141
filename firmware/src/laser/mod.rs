//! Hardware binding of the laser control port for the STM32G0 target.
//!
//! Maps the signal catalog onto concrete pins and the ADC/DAC pair. The
//! ON-enable and indicator outputs are shared between the control cycle
//! and the periodic tasks, so those two pins live behind blocking
//! critical-section mutexes instead of being owned by the port.

#![cfg(target_os = "none")]

use core::cell::RefCell;
use core::convert::TryFrom;

use embassy_stm32::adc::Adc;
use embassy_stm32::dac::{DacCh1, Value};
use embassy_stm32::gpio::{Input, Level as PinLevel, Output};
use embassy_stm32::peripherals::{ADC1, DAC1, PA0};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use laser_core::port::{CycleDelay, LaserPort};
use laser_core::signals::{InputId, Level, OutputId};

/// Output pin shared between the control cycle and a periodic task.
pub type SharedOutput = Mutex<CriticalSectionRawMutex, RefCell<Option<Output<'static>>>>;

/// ON-enable line: written by the control cycle and the pulse tick.
pub static ON_ENABLE: SharedOutput = Mutex::new(RefCell::new(None));

/// Indicator LED: written by the control cycle and the alarm flasher.
pub static INDICATOR: SharedOutput = Mutex::new(RefCell::new(None));

/// Places a configured pin into a shared output slot during bring-up.
pub fn install_shared(slot: &SharedOutput, output: Output<'static>) {
    slot.lock(|cell| {
        cell.replace(Some(output));
    });
}

/// Drives a shared output to `level`. A slot that is not yet installed is
/// ignored; last writer wins between contending tasks.
pub fn drive_shared(slot: &SharedOutput, level: Level) {
    slot.lock(|cell| {
        if let Some(output) = cell.borrow_mut().as_mut() {
            output.set_level(pin_level(level));
        }
    });
}

pub fn pin_level(level: Level) -> PinLevel {
    match level {
        Level::Low => PinLevel::Low,
        Level::High => PinLevel::High,
    }
}

fn logic_level(level: PinLevel) -> Level {
    match level {
        PinLevel::Low => Level::Low,
        PinLevel::High => Level::High,
    }
}

/// Two-sample agreement debouncer for the mechanical switch inputs.
///
/// A level only becomes the stable reading after two consecutive control
/// cycles agree, which filters contact bounce at the 1 ms cycle cadence.
pub struct DebouncedPin {
    input: Input<'static>,
    last: Level,
    stable: Level,
}

impl DebouncedPin {
    pub fn new(input: Input<'static>) -> Self {
        let level = logic_level(input.get_level());
        Self {
            input,
            last: level,
            stable: level,
        }
    }

    fn sample(&mut self) -> Level {
        let level = logic_level(self.input.get_level());
        if level == self.last {
            self.stable = level;
        }
        self.last = level;
        self.stable
    }
}

/// Concrete laser control port over the MCU pins.
pub struct HardwareLaserPort {
    switch_1: DebouncedPin,
    switch_2: DebouncedPin,
    alarm_lsb: Input<'static>,
    alarm_msb: Input<'static>,
    trigger_in: Input<'static>,
    mo_enable: Output<'static>,
    guide: Output<'static>,
    power_bits: [Output<'static>; 8],
    adc: Adc<'static, ADC1>,
    dial: PA0,
    dac: DacCh1<'static, DAC1>,
}

impl HardwareLaserPort {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        switch_1: DebouncedPin,
        switch_2: DebouncedPin,
        alarm_lsb: Input<'static>,
        alarm_msb: Input<'static>,
        trigger_in: Input<'static>,
        mo_enable: Output<'static>,
        guide: Output<'static>,
        power_bits: [Output<'static>; 8],
        adc: Adc<'static, ADC1>,
        dial: PA0,
        dac: DacCh1<'static, DAC1>,
    ) -> Self {
        Self {
            switch_1,
            switch_2,
            alarm_lsb,
            alarm_msb,
            trigger_in,
            mo_enable,
            guide,
            power_bits,
            adc,
            dial,
            dac,
        }
    }
}

impl LaserPort for HardwareLaserPort {
    fn read_input(&mut self, input: InputId) -> Level {
        match input {
            InputId::Switch1 => logic_level(self.switch_1.input.get_level()),
            InputId::Switch2 => logic_level(self.switch_2.input.get_level()),
            InputId::AlarmLsb => logic_level(self.alarm_lsb.get_level()),
            InputId::AlarmMsb => logic_level(self.alarm_msb.get_level()),
            InputId::TriggerIn => logic_level(self.trigger_in.get_level()),
        }
    }

    fn read_debounced(&mut self, input: InputId) -> Level {
        match input {
            InputId::Switch1 => self.switch_1.sample(),
            InputId::Switch2 => self.switch_2.sample(),
            // The remaining inputs have no debouncer; fall back to raw.
            other => self.read_input(other),
        }
    }

    fn write_output(&mut self, output: OutputId, level: Level) {
        match output {
            OutputId::MoEnable => self.mo_enable.set_level(pin_level(level)),
            OutputId::OnEnable => drive_shared(&ON_ENABLE, level),
            OutputId::IndicatorLed => drive_shared(&INDICATOR, level),
            OutputId::Guide => self.guide.set_level(pin_level(level)),
            // The pulse pin is owned and driven by the pulse task.
            OutputId::Pulse => {}
        }
    }

    fn write_power_bit(&mut self, bit: u8, level: Level) {
        if let Some(output) = self.power_bits.get_mut(usize::from(bit)) {
            output.set_level(pin_level(level));
        }
    }

    fn read_dial(&mut self) -> u8 {
        // 12-bit sample scaled to the 8-bit dial range.
        (self.adc.blocking_read(&mut self.dial) >> 4) as u8
    }

    fn write_display(&mut self, counts: u16) {
        // The DAC is 12 bits wide; out-of-range values truncate just as
        // the original hardware register write did.
        self.dac.set(Value::Bit12Right(counts & 0x0FFF));
    }
}

/// Blocking delay backed by the embassy time driver.
///
/// Used only by the safety sequences; the control task stalls for the
/// full hold while the periodic tasks keep running from interrupts.
pub struct EmbassyDelay;

impl CycleDelay for EmbassyDelay {
    fn block_for(&mut self, wait: core::time::Duration) {
        embassy_time::block_for(embassy_duration(wait));
    }
}

pub fn embassy_duration(duration: core::time::Duration) -> embassy_time::Duration {
    let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
    embassy_time::Duration::from_micros(micros)
}
