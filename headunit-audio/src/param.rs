//! Logical audio parameters and the index-keyed parameter store.
//!
//! Ten parameters are tracked. Values are chip-agnostic raw grid units held
//! as `i8`; each parameter carries the [`Grid`] of the active chip, and the
//! invariant `min <= value <= max` holds after every mutation. Out-of-range
//! requests are saturated, never rejected.

use crate::chip::{ChipVariant, Family};
use crate::constants::LABEL_LEN;
use crate::grid::{grid_for, Grid};

/// Identity of a tracked parameter. The discriminant is the storage index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ParamId {
    Volume = 0,
    Bass = 1,
    Middle = 2,
    Treble = 3,
    /// Preamp on the TDA7439, front/rear fader on Family A chips.
    Preamp = 4,
    Balance = 5,
    Gain0 = 6,
    Gain1 = 7,
    Gain2 = 8,
    Gain3 = 9,
}

impl ParamId {
    /// Number of tracked parameters.
    pub const COUNT: usize = 10;

    /// Front/rear fader. Shares the preamp slot.
    pub const FRONT_REAR: ParamId = ParamId::Preamp;

    /// All parameters in storage order.
    pub const ALL: [ParamId; ParamId::COUNT] = [
        ParamId::Volume,
        ParamId::Bass,
        ParamId::Middle,
        ParamId::Treble,
        ParamId::Preamp,
        ParamId::Balance,
        ParamId::Gain0,
        ParamId::Gain1,
        ParamId::Gain2,
        ParamId::Gain3,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Gain parameter of input `input`, if one exists.
    pub fn gain(input: u8) -> Option<Self> {
        Self::from_index(ParamId::Gain0.index() + input as usize)
            .filter(|id| id.gain_input().is_some())
    }

    /// Input number for gain parameters.
    pub fn gain_input(self) -> Option<u8> {
        match self {
            ParamId::Gain0 => Some(0),
            ParamId::Gain1 => Some(1),
            ParamId::Gain2 => Some(2),
            ParamId::Gain3 => Some(3),
            _ => None,
        }
    }

    /// Byte offset of this parameter's caption in the label text table.
    pub fn label_offset(self) -> usize {
        self.index() * LABEL_LEN
    }

    /// Icon shown next to the parameter. The preamp slot shows the fader
    /// icon on chips where it acts as front/rear balance.
    pub fn icon(self, variant: ChipVariant) -> Icon {
        match self {
            ParamId::Volume => Icon::Volume,
            ParamId::Bass => Icon::Bass,
            ParamId::Middle => Icon::Middle,
            ParamId::Treble => Icon::Treble,
            ParamId::Preamp if variant.family() == Family::A => Icon::FrontRear,
            ParamId::Preamp => Icon::Preamp,
            ParamId::Balance => Icon::Balance,
            ParamId::Gain0 => Icon::Tuner,
            ParamId::Gain1 => Icon::Pc,
            ParamId::Gain2 => Icon::Tv,
            ParamId::Gain3 => Icon::Dvd,
        }
    }
}

/// Icon reference handed to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    Volume,
    Bass,
    Middle,
    Treble,
    Preamp,
    FrontRear,
    Balance,
    Tuner,
    Pc,
    Tv,
    Dvd,
}

/// A single logical parameter: its value and the grid of the active chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Parameter {
    value: i8,
    grid: Grid,
}

impl Parameter {
    fn new(grid: Grid) -> Self {
        Self {
            value: grid.clamp(0),
            grid,
        }
    }

    /// Current value, always within `[min, max]`.
    pub fn value(&self) -> i8 {
        self.value
    }

    pub fn min(&self) -> i8 {
        self.grid.min
    }

    pub fn max(&self) -> i8 {
        self.grid.max
    }

    /// Step size in 1/8 dB.
    pub fn step(&self) -> u8 {
        self.grid.step
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// `false` when the active chip does not implement this parameter.
    pub fn is_supported(&self) -> bool {
        !self.grid.is_frozen()
    }

    fn set(&mut self, value: i16) -> i8 {
        self.value = self.grid.clamp(value);
        self.value
    }
}

/// Result of an edit: value before and after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Change {
    pub old: i8,
    pub new: i8,
}

impl Change {
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }
}

/// The canonical parameter set, indexed by [`ParamId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterStore {
    params: [Parameter; ParamId::COUNT],
}

impl ParameterStore {
    /// All parameters at zero (saturated into range) on `variant`'s grids.
    pub fn new(variant: ChipVariant) -> Self {
        let mut params = [Parameter::new(Grid::FROZEN); ParamId::COUNT];
        for id in ParamId::ALL {
            params[id.index()] = Parameter::new(grid_for(variant, id));
        }
        Self { params }
    }

    pub fn get(&self, id: ParamId) -> &Parameter {
        &self.params[id.index()]
    }

    pub fn value(&self, id: ParamId) -> i8 {
        self.params[id.index()].value
    }

    /// `value <- clamp(value + delta, min, max)`.
    pub fn change(&mut self, id: ParamId, delta: i8) -> Change {
        let param = &mut self.params[id.index()];
        let old = param.value;
        let new = param.set(old as i16 + delta as i16);
        Change { old, new }
    }

    /// Set an absolute value, saturated into range. Used when hydrating from
    /// storage and when rolling back a failed push.
    pub fn restore(&mut self, id: ParamId, value: i8) -> i8 {
        self.params[id.index()].set(value as i16)
    }

    /// Switch every parameter to `variant`'s grids, saturating values that
    /// fall outside the new ranges.
    pub fn regrid(&mut self, variant: ChipVariant) {
        for id in ParamId::ALL {
            let param = &mut self.params[id.index()];
            param.grid = grid_for(variant, id);
            param.set(param.value as i16);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamId, &Parameter)> {
        ParamId::ALL.into_iter().zip(self.params.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_clamps_for_every_delta() {
        for variant in ChipVariant::ALL {
            for id in ParamId::ALL {
                for delta in i8::MIN..=i8::MAX {
                    let mut store = ParameterStore::new(variant);
                    let p = *store.get(id);
                    let old = p.value();
                    let expected = (old as i16 + delta as i16).clamp(p.min() as i16, p.max() as i16);
                    let change = store.change(id, delta);
                    assert_eq!(change.old, old);
                    assert_eq!(change.new as i16, expected);
                    assert_eq!(store.value(id), change.new);
                }
            }
        }
    }

    #[test]
    fn repeated_edits_stay_in_range() {
        let mut store = ParameterStore::new(ChipVariant::Tda7439);
        let deltas = [5i8, 90, -128, 127, -3, 1, -1, 60, -60];
        for _ in 0..10 {
            for &d in &deltas {
                for id in ParamId::ALL {
                    store.change(id, d);
                    let p = store.get(id);
                    assert!(p.min() <= p.value() && p.value() <= p.max());
                }
            }
        }
    }

    #[test]
    fn unsupported_parameter_pinned_at_zero() {
        let mut store = ParameterStore::new(ChipVariant::Tda7313);
        let change = store.change(ParamId::Middle, 5);
        assert_eq!(change, Change { old: 0, new: 0 });
        assert!(change.is_noop());
        assert!(!store.get(ParamId::Middle).is_supported());
    }

    #[test]
    fn new_store_saturates_zero_into_range() {
        let store = ParameterStore::new(ChipVariant::Tda7439);
        assert_eq!(store.value(ParamId::Volume), 0);
        assert_eq!(store.get(ParamId::Volume).min(), -79);
    }

    #[test]
    fn regrid_saturates_values() {
        let mut store = ParameterStore::new(ChipVariant::Tda7439);
        store.restore(ParamId::Volume, -79);
        store.restore(ParamId::Middle, 4);
        store.restore(ParamId::Gain0, 12);
        store.regrid(ChipVariant::Tda7313);
        assert_eq!(store.value(ParamId::Volume), -63);
        assert_eq!(store.value(ParamId::Middle), 0);
        assert_eq!(store.value(ParamId::Gain0), 3);
        assert_eq!(store.get(ParamId::Volume).step(), 10);
    }

    #[test]
    fn gain_lookup() {
        assert_eq!(ParamId::gain(0), Some(ParamId::Gain0));
        assert_eq!(ParamId::gain(3), Some(ParamId::Gain3));
        assert_eq!(ParamId::gain(4), None);
        assert_eq!(ParamId::Treble.gain_input(), None);
    }

    #[test]
    fn preamp_is_the_fader_slot() {
        assert_eq!(ParamId::FRONT_REAR, ParamId::Preamp);
        assert_eq!(ParamId::Preamp.icon(ChipVariant::Tda7313), Icon::FrontRear);
        assert_eq!(ParamId::Preamp.icon(ChipVariant::Tda7439), Icon::Preamp);
        assert_eq!(ParamId::Balance.label_offset(), 5 * LABEL_LEN);
    }
}
