//! Capability grids: representable range and step of every control, per chip.
//!
//! A grid row describes the raw register range a chip accepts for a control
//! and the size of one raw step in 1/8 dB. Stored parameter values are always
//! in raw grid units; [`display_value`] turns them into the number shown on
//! screen.
//!
//! Controls a chip does not implement map to [`Grid::FROZEN`] (`[0, 0]`),
//! which pins the value at zero and marks the control unsupported.

use crate::chip::ChipVariant;
use crate::param::ParamId;

/// Range and resolution of one control on one chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Grid {
    /// Lowest raw value (inclusive).
    pub min: i8,
    /// Highest raw value (inclusive).
    pub max: i8,
    /// Size of one raw step in 1/8 dB.
    pub step: u8,
}

impl Grid {
    /// Grid of a control the chip does not implement.
    pub const FROZEN: Grid = Grid::new(0, 0, 0);

    pub const fn new(min: i8, max: i8, step: u8) -> Self {
        Self { min, max, step }
    }

    /// `true` for [`Grid::FROZEN`].
    pub fn is_frozen(&self) -> bool {
        *self == Grid::FROZEN
    }

    /// Saturate `value` into `[min, max]`.
    pub fn clamp(&self, value: i16) -> i8 {
        value.clamp(self.min as i16, self.max as i16) as i8
    }
}

// ── Grid rows ──────────────────────────────────────────────────────────────

/// -79..0 dB, 1 dB step.
const VOLUME_79: Grid = Grid::new(-79, 0, 8);
/// -14..+14 dB, 2 dB step.
const TONE_14: Grid = Grid::new(-7, 7, 16);
/// -47..0 dB, 1 dB step.
const PREAMP_47: Grid = Grid::new(-47, 0, 8);
/// -21..+21 dB, 1 dB step.
const BALANCE_21: Grid = Grid::new(-21, 21, 8);
/// 0..30 dB, 2 dB step.
const GAIN_30: Grid = Grid::new(0, 15, 16);
/// -78.75..0 dB, 1.25 dB step.
const VOLUME_63: Grid = Grid::new(-63, 0, 10);
/// -18.75..+18.75 dB, 1.25 dB step.
const BALANCE_15: Grid = Grid::new(-15, 15, 10);
/// 0..11.25 dB, 3.75 dB step.
const GAIN_11: Grid = Grid::new(0, 3, 30);
/// 0..18.75 dB, 6.25 dB step.
const GAIN_18: Grid = Grid::new(0, 3, 50);

/// Grid of `id` on `variant`. Pure: the same pair always yields the same row.
pub fn grid_for(variant: ChipVariant, id: ParamId) -> Grid {
    use ParamId::*;

    match variant {
        ChipVariant::Tda7439 => match id {
            Volume => VOLUME_79,
            Bass | Middle | Treble => TONE_14,
            Preamp => PREAMP_47,
            Balance => BALANCE_21,
            Gain0 | Gain1 | Gain2 | Gain3 => GAIN_30,
        },
        ChipVariant::Tda7312 => match id {
            Volume => VOLUME_63,
            Bass | Treble => TONE_14,
            Balance => BALANCE_15,
            _ => Grid::FROZEN,
        },
        ChipVariant::Tda7313 => match id {
            Volume => VOLUME_63,
            Bass | Treble => TONE_14,
            Preamp | Balance => BALANCE_15,
            Gain0 | Gain1 | Gain2 => GAIN_11,
            _ => Grid::FROZEN,
        },
        ChipVariant::Tda7314 => match id {
            Volume => VOLUME_63,
            Bass | Treble => TONE_14,
            Preamp | Balance => BALANCE_15,
            Gain0 => GAIN_18,
            _ => Grid::FROZEN,
        },
        ChipVariant::Tda7318 => match id {
            Volume => VOLUME_63,
            Bass | Treble => TONE_14,
            Preamp | Balance => BALANCE_15,
            Gain0 | Gain1 | Gain2 | Gain3 => GAIN_18,
            _ => Grid::FROZEN,
        },
    }
}

/// Whether `variant` implements `id` at all.
pub fn is_supported(variant: ChipVariant, id: ParamId) -> bool {
    !grid_for(variant, id).is_frozen()
}

/// Display multiplier compensating the native step of the TDA7313/TDA7318.
fn display_multiplier(variant: ChipVariant, id: ParamId) -> i32 {
    if !variant.scaled_display() {
        return 8;
    }
    match id {
        ParamId::Volume | ParamId::Preamp | ParamId::Balance => 10,
        ParamId::Gain0 | ParamId::Gain1 | ParamId::Gain2 | ParamId::Gain3 => 15,
        _ => 8,
    }
}

/// Value shown on screen for a raw `value` with grid step `step`.
///
/// `(value * step * mult + 4) >> 3`; the `+ 4` rounds half up for positive
/// magnitudes. With `mult = 8` the result is in 1/8 dB (`value * step`);
/// the scaled multipliers of the TDA7313/TDA7318 stretch it to the display
/// scale of those chips. Stored values are never touched.
pub fn display_value(variant: ChipVariant, id: ParamId, value: i8, step: u8) -> i16 {
    let mult = display_multiplier(variant, id);
    ((value as i32 * step as i32 * mult + 4) >> 3) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tda7439_supports_everything() {
        for id in ParamId::ALL {
            assert!(is_supported(ChipVariant::Tda7439, id), "{:?}", id);
        }
        assert_eq!(grid_for(ChipVariant::Tda7439, ParamId::Volume), Grid::new(-79, 0, 8));
        assert_eq!(grid_for(ChipVariant::Tda7439, ParamId::Gain3), Grid::new(0, 15, 16));
    }

    #[test]
    fn family_a_has_no_middle() {
        for v in [
            ChipVariant::Tda7312,
            ChipVariant::Tda7313,
            ChipVariant::Tda7314,
            ChipVariant::Tda7318,
        ] {
            assert_eq!(grid_for(v, ParamId::Middle), Grid::FROZEN);
        }
    }

    #[test]
    fn gain_rows_follow_input_count() {
        assert!(is_supported(ChipVariant::Tda7313, ParamId::Gain2));
        assert!(!is_supported(ChipVariant::Tda7313, ParamId::Gain3));
        assert!(is_supported(ChipVariant::Tda7314, ParamId::Gain0));
        assert!(!is_supported(ChipVariant::Tda7314, ParamId::Gain1));
        assert!(!is_supported(ChipVariant::Tda7312, ParamId::Gain0));
        assert!(!is_supported(ChipVariant::Tda7312, ParamId::Preamp));
    }

    #[test]
    fn clamp_saturates() {
        let g = Grid::new(-7, 7, 16);
        assert_eq!(g.clamp(100), 7);
        assert_eq!(g.clamp(-100), -7);
        assert_eq!(g.clamp(3), 3);
        assert_eq!(Grid::FROZEN.clamp(5), 0);
    }

    #[test]
    fn display_plain_step() {
        // (3 * 16 * 8 + 4) >> 3 = 48
        assert_eq!(display_value(ChipVariant::Tda7439, ParamId::Bass, 3, 16), 48);
        // (-20 * 8 * 8 + 4) >> 3 = -160
        assert_eq!(display_value(ChipVariant::Tda7439, ParamId::Volume, -20, 8), -160);
        // (1 * 10 * 8 + 4) >> 3 = 10
        assert_eq!(display_value(ChipVariant::Tda7312, ParamId::Volume, 1, 10), 10);
    }

    #[test]
    fn display_scaled_on_tda7313() {
        // (3 * 10 * 10 + 4) >> 3 = 38
        assert_eq!(display_value(ChipVariant::Tda7313, ParamId::Volume, 3, 10), 38);
        // (1 * 30 * 15 + 4) >> 3 = 56
        assert_eq!(display_value(ChipVariant::Tda7313, ParamId::Gain0, 1, 30), 56);
        // tone controls are not scaled: (2 * 16 * 8 + 4) >> 3 = 32
        assert_eq!(display_value(ChipVariant::Tda7318, ParamId::Treble, 2, 16), 32);
    }

    #[test]
    fn display_rounds_half_up() {
        // 150 / 8 = 18.75 -> 19
        assert_eq!(display_value(ChipVariant::Tda7318, ParamId::Gain1, 1, 10), 19);
        // 100 / 8 = 12.5 -> 13
        assert_eq!(display_value(ChipVariant::Tda7313, ParamId::Balance, 1, 10), 13);
        // -100 / 8 = -12.5 -> -12
        assert_eq!(display_value(ChipVariant::Tda7313, ParamId::Balance, -1, 10), -12);
    }
}
