//! Non-volatile storage of parameters and device modes.
//!
//! Every field occupies one byte at a fixed offset (see [`layout`]). Signed
//! values are stored as their two's-complement byte.
//!
//! Loading never fails on bad content: an unknown chip id falls back to the
//! TDA7439, out-of-range values are saturated into the chip's grid, and an
//! out-of-range input selection falls back to input 0. Only storage access
//! errors are reported.

use crate::chip::ChipVariant;
use crate::constants::{NV_SIZE, RC_COMMAND_COUNT};
use crate::mode::ModeFlags;
use crate::param::{ParamId, ParameterStore};
use crate::state::AudioState;

/// Byte offsets of the persisted fields.
pub mod layout {
    use crate::param::ParamId;

    pub const VALUES: usize = 0x00;
    pub const MINIMUMS: usize = VALUES + ParamId::COUNT;
    pub const MAXIMUMS: usize = MINIMUMS + ParamId::COUNT;
    pub const STEPS: usize = MAXIMUMS + ParamId::COUNT;
    pub const INPUT: usize = 0x28;
    pub const LOUDNESS: usize = 0x29;
    pub const INPUT_COUNT: usize = 0x2A;
    pub const CHIP_ID: usize = 0x2B;
    pub const BACKLIGHT: usize = 0x2C;
    pub const BRIGHTNESS_WORK: usize = 0x2D;
    pub const BRIGHTNESS_STANDBY: usize = 0x2E;
    pub const SPECTRUM_MODE: usize = 0x2F;
    pub const DEFAULT_DISPLAY: usize = 0x30;
    pub const MUTE: usize = 0x31;
    pub const RC_ADDRESS: usize = 0x32;
    pub const RC_COMMANDS: usize = 0x33;
}

/// Byte-addressed non-volatile store.
pub trait NvStore {
    type Error;

    fn read(&mut self, offset: usize) -> Result<u8, Self::Error>;

    fn write(&mut self, offset: usize, byte: u8) -> Result<(), Self::Error>;

    /// Write `byte` only if it differs from what is stored. Returns whether a
    /// write happened.
    fn update(&mut self, offset: usize, byte: u8) -> Result<bool, Self::Error> {
        if self.read(offset)? == byte {
            return Ok(false);
        }
        self.write(offset, byte)?;
        Ok(true)
    }
}

/// Access outside the bounds of a [`RamStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfBounds {
    pub offset: usize,
}

/// In-memory store, e.g. a shadow of an external EEPROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RamStore<const N: usize = NV_SIZE> {
    bytes: [u8; N],
    writes: usize,
}

impl<const N: usize> RamStore<N> {
    /// Store filled with `0xFF`, the erased state of an EEPROM.
    pub const fn new() -> Self {
        Self::from_bytes([0xFF; N])
    }

    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes, writes: 0 }
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Number of byte writes performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl<const N: usize> Default for RamStore<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> NvStore for RamStore<N> {
    type Error = OutOfBounds;

    fn read(&mut self, offset: usize) -> Result<u8, Self::Error> {
        self.bytes.get(offset).copied().ok_or(OutOfBounds { offset })
    }

    fn write(&mut self, offset: usize, byte: u8) -> Result<(), Self::Error> {
        let slot = self.bytes.get_mut(offset).ok_or(OutOfBounds { offset })?;
        *slot = byte;
        self.writes += 1;
        Ok(())
    }
}

/// Settings owned by other parts of the firmware (display, remote control)
/// that share the store. Carried through unchanged so a save never
/// clobbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceSettings {
    pub brightness_work: u8,
    pub brightness_standby: u8,
    pub spectrum_mode: u8,
    pub default_display: u8,
    pub rc_address: u8,
    pub rc_commands: [u8; RC_COMMAND_COUNT],
}

impl DeviceSettings {
    fn load<S: NvStore>(store: &mut S) -> Result<Self, S::Error> {
        let mut rc_commands = [0u8; RC_COMMAND_COUNT];
        for (i, cmd) in rc_commands.iter_mut().enumerate() {
            *cmd = store.read(layout::RC_COMMANDS + i)?;
        }
        Ok(Self {
            brightness_work: store.read(layout::BRIGHTNESS_WORK)?,
            brightness_standby: store.read(layout::BRIGHTNESS_STANDBY)?,
            spectrum_mode: store.read(layout::SPECTRUM_MODE)?,
            default_display: store.read(layout::DEFAULT_DISPLAY)?,
            rc_address: store.read(layout::RC_ADDRESS)?,
            rc_commands,
        })
    }

    fn save<S: NvStore>(&self, store: &mut S) -> Result<usize, S::Error> {
        let mut written = 0;
        for (offset, byte) in [
            (layout::BRIGHTNESS_WORK, self.brightness_work),
            (layout::BRIGHTNESS_STANDBY, self.brightness_standby),
            (layout::SPECTRUM_MODE, self.spectrum_mode),
            (layout::DEFAULT_DISPLAY, self.default_display),
            (layout::RC_ADDRESS, self.rc_address),
        ] {
            written += store.update(offset, byte)? as usize;
        }
        for (i, &cmd) in self.rc_commands.iter().enumerate() {
            written += store.update(layout::RC_COMMANDS + i, cmd)? as usize;
        }
        Ok(written)
    }
}

/// Hydrate the complete state from `store`.
///
/// The chip id is read first; its grids then define the bounds of every
/// parameter. Stored bounds that disagree with the grid (an image written
/// for another chip) are ignored.
pub fn load<S: NvStore>(store: &mut S) -> Result<AudioState, S::Error> {
    let variant = ChipVariant::from_id(store.read(layout::CHIP_ID)?);

    let mut params = ParameterStore::new(variant);
    for id in ParamId::ALL {
        let i = id.index();
        let stored = store.read(layout::VALUES + i)? as i8;
        let value = params.restore(id, stored);
        if value != stored {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} stored as {}, clamped to {}", id, stored, value);
        }

        // Bounds come from the grid of the stored chip. The stored bytes only
        // mirror it for older images and are never taken over.
        let grid = params.get(id).grid();
        let bounds = (
            store.read(layout::MINIMUMS + i)? as i8,
            store.read(layout::MAXIMUMS + i)? as i8,
            store.read(layout::STEPS + i)?,
        );
        if bounds != (grid.min, grid.max, grid.step) {
            #[cfg(feature = "defmt")]
            defmt::debug!("{}: stored bounds differ from {} grid", id, variant);
        }
    }

    let stored_count = store.read(layout::INPUT_COUNT)?;
    let input_count = if (1..=variant.input_count()).contains(&stored_count) {
        stored_count
    } else {
        variant.input_count()
    };

    let mut modes = ModeFlags::new(
        store.read(layout::MUTE)? != 0,
        store.read(layout::LOUDNESS)? != 0,
        store.read(layout::BACKLIGHT)? != 0,
        0,
    );
    modes.select_input(store.read(layout::INPUT)?, input_count);

    let settings = DeviceSettings::load(store)?;

    #[cfg(feature = "defmt")]
    defmt::info!("loaded {} with {} inputs", variant, input_count);

    Ok(AudioState::from_parts(variant, params, modes, input_count, settings))
}

/// Flush `state` to `store`, writing only bytes that changed. Returns the
/// number of bytes written; a repeated save of the same state writes none.
pub fn save<S: NvStore>(store: &mut S, state: &AudioState) -> Result<usize, S::Error> {
    let mut written = 0;
    for (id, param) in state.params().iter() {
        let i = id.index();
        written += store.update(layout::VALUES + i, param.value() as u8)? as usize;
        written += store.update(layout::MINIMUMS + i, param.min() as u8)? as usize;
        written += store.update(layout::MAXIMUMS + i, param.max() as u8)? as usize;
        written += store.update(layout::STEPS + i, param.step())? as usize;
    }

    let modes = state.modes();
    for (offset, byte) in [
        (layout::INPUT, modes.input()),
        (layout::LOUDNESS, modes.loudness() as u8),
        (layout::INPUT_COUNT, state.input_count()),
        (layout::CHIP_ID, state.variant().id()),
        (layout::BACKLIGHT, modes.backlight() as u8),
        (layout::MUTE, modes.is_muted() as u8),
    ] {
        written += store.update(offset, byte)? as usize;
    }

    written += state.settings().save(store)?;

    #[cfg(feature = "defmt")]
    defmt::debug!("saved state, {} bytes written", written);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Flag;

    fn sample_state() -> AudioState {
        let mut state = AudioState::new(ChipVariant::Tda7318);
        state.params.restore(ParamId::Volume, -33);
        state.params.restore(ParamId::Bass, -4);
        state.params.restore(ParamId::Treble, 6);
        state.params.restore(ParamId::Preamp, -2);
        state.params.restore(ParamId::Balance, 7);
        state.params.restore(ParamId::Gain3, 2);
        state.modes.select_input(3, 4);
        state.modes.set(Flag::Loudness, true);
        state.modes.set(Flag::Backlight, true);
        state.settings.brightness_work = 30;
        state.settings.rc_address = 0x1A;
        state.settings.rc_commands[4] = 0x21;
        state
    }

    #[test]
    fn layout_fits_store() {
        assert_eq!(layout::STEPS + ParamId::COUNT, layout::INPUT);
        assert_eq!(layout::RC_COMMANDS + RC_COMMAND_COUNT, NV_SIZE);
    }

    #[test]
    fn save_then_load_round_trip() {
        let state = sample_state();
        let mut store: RamStore = RamStore::new();
        save(&mut store, &state).unwrap();

        let loaded = load(&mut store).unwrap();
        assert_eq!(loaded, state);
        for id in ParamId::ALL {
            assert_eq!(loaded.params().get(id), state.params().get(id));
        }
    }

    #[test]
    fn save_is_idempotent() {
        let state = sample_state();
        let mut store: RamStore = RamStore::new();
        assert!(save(&mut store, &state).unwrap() > 0);
        let bytes = *store.as_bytes();
        let writes = store.writes();

        assert_eq!(save(&mut store, &state).unwrap(), 0);
        assert_eq!(store.as_bytes(), &bytes);
        assert_eq!(store.writes(), writes);
    }

    #[test]
    fn signed_values_use_twos_complement() {
        let state = sample_state();
        let mut store: RamStore = RamStore::new();
        save(&mut store, &state).unwrap();
        assert_eq!(store.as_bytes()[layout::VALUES], (-33i8) as u8);
        assert_eq!(store.as_bytes()[layout::MINIMUMS], (-63i8) as u8);
        assert_eq!(store.as_bytes()[layout::STEPS], 10);
        assert_eq!(store.as_bytes()[layout::CHIP_ID], 3);
    }

    #[test]
    fn erased_store_loads_safe_defaults() {
        // 0xFF everywhere: chip id 255, values -1, input 255
        let mut store: RamStore = RamStore::new();
        let state = load(&mut store).unwrap();
        assert_eq!(state.variant(), ChipVariant::Tda7439);
        assert_eq!(state.input_count(), 4);
        assert_eq!(state.modes().input(), 0);
        assert_eq!(state.params().value(ParamId::Volume), -1);
        // 0..15 grid saturates -1 to 0
        assert_eq!(state.params().value(ParamId::Gain0), 0);
        assert!(state.modes().is_muted());
    }

    #[test]
    fn stored_values_are_clamped_into_grid() {
        let mut store: RamStore = RamStore::from_bytes([0; NV_SIZE]);
        store.write(layout::CHIP_ID, ChipVariant::Tda7313.id()).unwrap();
        store.write(layout::VALUES + ParamId::Volume.index(), (-79i8) as u8).unwrap();
        store.write(layout::VALUES + ParamId::Middle.index(), 5).unwrap();
        store.write(layout::VALUES + ParamId::Gain0.index(), 9).unwrap();

        let state = load(&mut store).unwrap();
        assert_eq!(state.params().value(ParamId::Volume), -63);
        assert_eq!(state.params().value(ParamId::Middle), 0);
        assert_eq!(state.params().value(ParamId::Gain0), 3);
    }

    #[test]
    fn stored_bounds_do_not_override_grid() {
        let mut store: RamStore = RamStore::from_bytes([0; NV_SIZE]);
        store.write(layout::CHIP_ID, ChipVariant::Tda7439.id()).unwrap();
        let volume = ParamId::Volume.index();
        store.write(layout::MINIMUMS + volume, (-10i8) as u8).unwrap();
        store.write(layout::MAXIMUMS + volume, 20).unwrap();
        store.write(layout::STEPS + volume, 3).unwrap();
        store.write(layout::VALUES + volume, (-40i8) as u8).unwrap();

        let state = load(&mut store).unwrap();
        let param = state.params().get(ParamId::Volume);
        assert_eq!((param.min(), param.max(), param.step()), (-79, 0, 8));
        assert_eq!(param.value(), -40);

        // the next save rewrites the bytes from the grid
        save(&mut store, &state).unwrap();
        assert_eq!(store.as_bytes()[layout::MINIMUMS + volume], (-79i8) as u8);
        assert_eq!(store.as_bytes()[layout::STEPS + volume], 8);
    }

    #[test]
    fn input_count_and_channel_validated() {
        let mut store: RamStore = RamStore::from_bytes([0; NV_SIZE]);
        store.write(layout::CHIP_ID, ChipVariant::Tda7313.id()).unwrap();
        store.write(layout::INPUT_COUNT, 2).unwrap();
        store.write(layout::INPUT, 2).unwrap();
        let state = load(&mut store).unwrap();
        assert_eq!(state.input_count(), 2);
        assert_eq!(state.modes().input(), 0);

        store.write(layout::INPUT_COUNT, 9).unwrap();
        store.write(layout::INPUT, 2).unwrap();
        let state = load(&mut store).unwrap();
        assert_eq!(state.input_count(), 3);
        assert_eq!(state.modes().input(), 2);
    }

    #[test]
    fn update_skips_equal_bytes() {
        let mut store: RamStore<4> = RamStore::from_bytes([1, 2, 3, 4]);
        assert!(!store.update(1, 2).unwrap());
        assert!(store.update(1, 9).unwrap());
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn out_of_bounds_access_is_an_error() {
        let mut store: RamStore<4> = RamStore::new();
        assert_eq!(store.read(4), Err(OutOfBounds { offset: 4 }));
        assert_eq!(store.write(7, 0), Err(OutOfBounds { offset: 7 }));

        let state = AudioState::new(ChipVariant::Tda7439);
        assert!(save(&mut store, &state).is_err());
    }
}
