//! The single owned state object: parameters, modes and the active chip.

use crate::chip::ChipVariant;
use crate::grid::display_value;
use crate::mode::ModeFlags;
use crate::param::{Icon, ParamId, ParameterStore};
use crate::persist::DeviceSettings;

/// Snapshot of one parameter for the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamView {
    pub id: ParamId,
    /// Offset of the caption in the label text table.
    pub label_offset: usize,
    pub icon: Icon,
    pub value: i8,
    pub min: i8,
    pub max: i8,
    /// Value in display units (see [`display_value`]).
    pub displayed: i16,
    pub supported: bool,
}

/// Everything the control core knows about the device.
///
/// The chip variant is stored here and read at every hardware push, so the
/// active chip can change at runtime without rebinding anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioState {
    pub(crate) params: ParameterStore,
    pub(crate) modes: ModeFlags,
    variant: ChipVariant,
    input_count: u8,
    pub(crate) settings: DeviceSettings,
}

impl AudioState {
    /// Fresh state for `variant`: every parameter at zero, all modes off,
    /// all inputs of the chip available.
    pub fn new(variant: ChipVariant) -> Self {
        Self {
            params: ParameterStore::new(variant),
            modes: ModeFlags::default(),
            variant,
            input_count: variant.input_count(),
            settings: DeviceSettings::default(),
        }
    }

    pub(crate) fn from_parts(
        variant: ChipVariant,
        params: ParameterStore,
        modes: ModeFlags,
        input_count: u8,
        settings: DeviceSettings,
    ) -> Self {
        Self {
            params,
            modes,
            variant,
            input_count,
            settings,
        }
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn modes(&self) -> &ModeFlags {
        &self.modes
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    pub fn variant(&self) -> ChipVariant {
        self.variant
    }

    /// Number of inputs wired on this unit, `1..=variant.input_count()`.
    pub fn input_count(&self) -> u8 {
        self.input_count
    }

    /// Volume to drive the chip with: the floor while muted, the stored
    /// value otherwise.
    pub fn effective_volume(&self) -> i8 {
        let volume = self.params.get(ParamId::Volume);
        if self.modes.is_muted() {
            volume.min()
        } else {
            volume.value()
        }
    }

    /// Gain of the selected input, 0 when the chip has none for it.
    pub fn active_gain(&self) -> i8 {
        ParamId::gain(self.modes.input())
            .map(|id| self.params.value(id))
            .unwrap_or(0)
    }

    pub fn view(&self, id: ParamId) -> ParamView {
        let param = self.params.get(id);
        ParamView {
            id,
            label_offset: id.label_offset(),
            icon: id.icon(self.variant),
            value: param.value(),
            min: param.min(),
            max: param.max(),
            displayed: display_value(self.variant, id, param.value(), param.step()),
            supported: param.is_supported(),
        }
    }

    /// Switch to another chip: re-grid every parameter and take over the
    /// new chip's input count.
    pub(crate) fn set_variant(&mut self, variant: ChipVariant) {
        self.variant = variant;
        self.params.regrid(variant);
        self.input_count = variant.input_count();
        let input = self.modes.input();
        self.modes.select_input(input, self.input_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Flag;

    #[test]
    fn mute_floors_effective_volume() {
        let mut state = AudioState::new(ChipVariant::Tda7439);
        state.params.restore(ParamId::Volume, -30);
        assert_eq!(state.effective_volume(), -30);
        state.modes.set(Flag::Mute, true);
        assert_eq!(state.effective_volume(), -79);
        assert_eq!(state.params.value(ParamId::Volume), -30);
    }

    #[test]
    fn active_gain_follows_input() {
        let mut state = AudioState::new(ChipVariant::Tda7439);
        state.params.restore(ParamId::Gain2, 9);
        assert_eq!(state.active_gain(), 0);
        state.modes.select_input(2, state.input_count());
        assert_eq!(state.active_gain(), 9);
    }

    #[test]
    fn view_reports_display_units() {
        let mut state = AudioState::new(ChipVariant::Tda7313);
        state.params.restore(ParamId::Volume, -8);
        let view = state.view(ParamId::Volume);
        assert_eq!(view.value, -8);
        assert_eq!((view.min, view.max), (-63, 0));
        // (-8 * 10 * 10 + 4) >> 3 = -100
        assert_eq!(view.displayed, -100);
        assert!(view.supported);
        assert!(!state.view(ParamId::Middle).supported);
    }

    #[test]
    fn set_variant_regrids_and_wraps_input() {
        let mut state = AudioState::new(ChipVariant::Tda7439);
        state.modes.select_input(3, 4);
        state.params.restore(ParamId::Bass, 5);
        state.set_variant(ChipVariant::Tda7313);
        assert_eq!(state.input_count(), 3);
        assert_eq!(state.modes.input(), 0);
        assert_eq!(state.params.value(ParamId::Bass), 5);
        assert_eq!(state.params.get(ParamId::Volume).min(), -63);
    }
}
