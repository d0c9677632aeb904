//! Two-valued device modes and the active input channel.

/// An on/off mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flag {
    Mute,
    Loudness,
    Backlight,
}

/// Mute, loudness, backlight and the selected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeFlags {
    mute: bool,
    loudness: bool,
    backlight: bool,
    input: u8,
}

impl ModeFlags {
    pub fn new(mute: bool, loudness: bool, backlight: bool, input: u8) -> Self {
        Self {
            mute,
            loudness,
            backlight,
            input,
        }
    }

    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Mute => self.mute,
            Flag::Loudness => self.loudness,
            Flag::Backlight => self.backlight,
        }
    }

    pub fn set(&mut self, flag: Flag, on: bool) {
        match flag {
            Flag::Mute => self.mute = on,
            Flag::Loudness => self.loudness = on,
            Flag::Backlight => self.backlight = on,
        }
    }

    /// Flip `flag`, returning the new state.
    pub fn toggle(&mut self, flag: Flag) -> bool {
        let on = !self.get(flag);
        self.set(flag, on);
        on
    }

    pub fn is_muted(&self) -> bool {
        self.mute
    }

    pub fn loudness(&self) -> bool {
        self.loudness
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Selected input, `0..input_count`.
    pub fn input(&self) -> u8 {
        self.input
    }

    /// Select `index`, falling back to input 0 when it is not below
    /// `input_count`. Returns the input actually selected.
    pub fn select_input(&mut self, index: u8, input_count: u8) -> u8 {
        self.input = if index < input_count { index } else { 0 };
        self.input
    }

    /// Step to the next input, wrapping after the last one.
    pub fn next_input(&mut self, input_count: u8) -> u8 {
        self.select_input(self.input.saturating_add(1), input_count)
    }
}
