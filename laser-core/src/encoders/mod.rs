//! Open-loop dial encoders and the panel-meter display mapping.
//!
//! The dial reading is mapped directly to electrical outputs: no feedback,
//! no hidden state. All calibration factors live here as named constants so
//! the firmware, the emulator, and the tests agree on the exact arithmetic.

use libm::roundf;

use crate::signals::{Level, POWER_BITS_ACTIVE};

/// Millivolt-equivalent per power-level count: 255 counts map to roughly
/// 300 mV on the meter, representing 30 W full scale.
pub const LEVEL_MILLIVOLTS_PER_COUNT: f32 = 1.17641;

/// Pulse-frequency slope in kHz per dial count.
pub const RATE_KHZ_PER_COUNT: f32 = 0.156_863;

/// Pulse-frequency offset: dial 0 maps to 25 kHz.
pub const RATE_BASE_KHZ: f32 = 25.0;

/// Display scale while setting the pulse rate (frequency times ten).
pub const RATE_DISPLAY_SCALE: f32 = 10.0;

/// DAC counts per millivolt for the 12-bit panel-meter output on a
/// 3300 mV rail.
pub const DISPLAY_COUNTS_PER_MILLIVOLT: f32 = 4095.0 / 3300.0;

/// Millivolt-equivalent meter value for a power level.
#[must_use]
pub fn level_millivolts(level: u8) -> f32 {
    f32::from(level) * LEVEL_MILLIVOLTS_PER_COUNT
}

/// Laser pulse frequency in kHz for a dial reading (0 maps to 25 kHz,
/// 255 to 65 kHz).
#[must_use]
pub fn pulse_frequency_khz(dial: u8) -> f32 {
    RATE_KHZ_PER_COUNT * f32::from(dial) + RATE_BASE_KHZ
}

/// Half-period of the pulse train in microseconds. The generator toggles
/// the output twice per cycle, hence 500/f rather than 1000/f.
#[must_use]
pub fn pulse_half_period_us(frequency_khz: f32) -> f32 {
    500.0 / frequency_khz
}

/// Half-period in integer nanoseconds for the shared schedule word.
#[must_use]
pub fn pulse_half_period_nanos(frequency_khz: f32) -> u32 {
    roundf(pulse_half_period_us(frequency_khz) * 1_000.0) as u32
}

/// Level for one of the eight power outputs: the expansion follows the
/// catalog polarity, so a set bit drives its active-low output low.
#[must_use]
pub const fn power_bit_level(value: u8, bit: u8) -> Level {
    if value & (1 << bit) != 0 {
        POWER_BITS_ACTIVE.asserted()
    } else {
        POWER_BITS_ACTIVE.released()
    }
}

/// DAC counts for a millivolt-equivalent display value.
///
/// No range clamping is performed: the conversion saturates at the `u16`
/// boundary and the 12-bit output truncates anything beyond its width,
/// exactly as the original hardware silently did. Known fragility,
/// intentionally preserved.
#[must_use]
pub fn display_counts(millivolts: f32) -> u16 {
    roundf(millivolts * DISPLAY_COUNTS_PER_MILLIVOLT) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn frequency_mapping_covers_rate_range() {
        assert!(close(pulse_frequency_khz(0), 25.0, 0.001));
        assert!(close(pulse_frequency_khz(255), 65.0, 0.01));
    }

    #[test]
    fn half_period_follows_frequency() {
        assert!(close(pulse_half_period_us(25.0), 20.0, 0.001));
        assert!(close(pulse_half_period_us(65.0), 7.6923, 0.001));

        assert_eq!(pulse_half_period_nanos(25.0), 20_000);
        let fast = pulse_half_period_nanos(pulse_frequency_khz(255));
        assert!((7_691..=7_693).contains(&fast));
    }

    #[test]
    fn level_millivolts_hits_full_scale() {
        assert!(close(level_millivolts(0), 0.0, 0.001));
        // 255 counts represent 30 W, shown as roughly 300 mV.
        assert!(close(level_millivolts(255), 299.98, 0.05));
    }

    #[test]
    fn power_bits_are_complement_of_binary_expansion() {
        assert_eq!(POWER_BITS_ACTIVE.asserted(), Level::Low);
        for value in [0u8, 1, 2, 0x55, 0xAA, 0xFE, 0xFF] {
            for bit in 0..8 {
                let expected = if value & (1 << bit) != 0 {
                    Level::Low
                } else {
                    Level::High
                };
                assert_eq!(power_bit_level(value, bit), expected);
            }
        }
    }

    #[test]
    fn display_counts_round_without_clamping() {
        assert_eq!(display_counts(0.0), 0);
        assert_eq!(
            display_counts(100.0),
            roundf(100.0 * DISPLAY_COUNTS_PER_MILLIVOLT) as u16
        );
        // Values past the 12-bit range are not clamped by the encoder; the
        // cast saturates only at the u16 boundary.
        assert!(display_counts(4000.0) > 4095);
    }
}
