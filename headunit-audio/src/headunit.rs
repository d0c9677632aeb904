//! Application root: owns the state, the audio processor, the store and the
//! output lines, and turns edit events into hardware pushes.
//!
//! Every operation runs to completion before returning. When a bus write
//! fails, the logical change is rolled back and the previous state is pushed
//! again on a best-effort basis, so the model does not silently drift from
//! what the chip is actually doing.

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};

use crate::chip::ChipVariant;
use crate::control::{AudioControl, Push};
use crate::error::Error;
use crate::mode::Flag;
use crate::param::ParamId;
use crate::persist::{self, NvStore};
use crate::state::{AudioState, ParamView};

/// Error type of a [`HeadUnit`] built from `C`, `S` and `P`.
pub type UnitError<C, S, P> =
    Error<<C as AudioControl>::Error, <S as NvStore>::Error, <P as PinErrorType>::Error>;

/// A discrete edit coming from the encoder, buttons or remote control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Move a parameter by a signed number of steps.
    Adjust { id: ParamId, delta: i8 },
    ToggleMute,
    ToggleLoudness,
    ToggleBacklight,
    /// Select an input; out-of-range indices select input 0.
    SelectInput(u8),
    NextInput,
    Save,
}

/// What the display should show after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feedback {
    Param(ParamView),
    Flag { flag: Flag, on: bool },
    Saved,
}

/// What a push targets.
#[derive(Debug, Clone, Copy)]
enum Target {
    Param(ParamId),
    Input,
    Loudness,
}

/// The audio head-unit control core.
pub struct HeadUnit<C, S, P> {
    control: C,
    store: S,
    backlight: P,
    /// Standby/mute line, low while muted.
    mute_line: P,
    state: AudioState,
}

impl<C, S, P> HeadUnit<C, S, P>
where
    C: AudioControl,
    S: NvStore,
    P: OutputPin,
{
    /// Hydrate the state from `store`. Nothing is pushed to hardware until
    /// [`power_on`](Self::power_on).
    pub fn load(
        control: C,
        mut store: S,
        backlight: P,
        mute_line: P,
    ) -> Result<Self, UnitError<C, S, P>> {
        let state = persist::load(&mut store).map_err(Error::Store)?;
        Ok(Self {
            control,
            store,
            backlight,
            mute_line,
            state,
        })
    }

    /// Drive the output lines and push every register.
    ///
    /// The unit always comes up unmuted, whatever mute state was saved.
    pub fn power_on(&mut self) -> Result<(), UnitError<C, S, P>> {
        self.state.modes.set(Flag::Mute, false);
        let backlight = self.state.modes.backlight();
        self.drive_backlight(backlight)?;
        self.control.apply_all(&self.state).map_err(Error::Bus)?;
        self.drive_mute_line(false)?;
        #[cfg(feature = "defmt")]
        defmt::info!("powered on, {}", self.state.variant());
        Ok(())
    }

    /// Flush state before power is removed.
    pub fn power_off(&mut self) -> Result<usize, UnitError<C, S, P>> {
        self.save()
    }

    /// Write the state to the store. Returns the number of bytes written.
    pub fn save(&mut self) -> Result<usize, UnitError<C, S, P>> {
        persist::save(&mut self.store, &self.state).map_err(Error::Store)
    }

    pub fn state(&self) -> &AudioState {
        &self.state
    }

    pub fn view(&self, id: ParamId) -> ParamView {
        self.state.view(id)
    }

    /// Release the owned peripherals.
    pub fn release(self) -> (C, S, P, P) {
        (self.control, self.store, self.backlight, self.mute_line)
    }

    // ── Edits ──────────────────────────────────────────────────────────

    /// `value <- clamp(value + delta, min, max)`, then push. Returns the new
    /// value.
    pub fn change_param(&mut self, id: ParamId, delta: i8) -> Result<i8, UnitError<C, S, P>> {
        let change = self.state.params.change(id, delta);
        if let Err(e) = self.push(Target::Param(id)) {
            self.state.params.restore(id, change.old);
            self.resync(Target::Param(id));
            return Err(Error::Bus(e));
        }
        Ok(change.new)
    }

    /// Mute or unmute. The stored volume is left untouched.
    pub fn set_mute(&mut self, on: bool) -> Result<(), UnitError<C, S, P>> {
        let was = self.state.modes.is_muted();
        self.state.modes.set(Flag::Mute, on);
        if let Err(e) = self.push(Target::Param(ParamId::Volume)) {
            self.state.modes.set(Flag::Mute, was);
            self.resync(Target::Param(ParamId::Volume));
            return Err(Error::Bus(e));
        }
        if let Err(e) = self.drive_mute_line(on) {
            self.state.modes.set(Flag::Mute, was);
            self.resync(Target::Param(ParamId::Volume));
            return Err(e);
        }
        Ok(())
    }

    pub fn toggle_mute(&mut self) -> Result<bool, UnitError<C, S, P>> {
        let on = !self.state.modes.is_muted();
        self.set_mute(on)?;
        Ok(on)
    }

    pub fn toggle_loudness(&mut self) -> Result<bool, UnitError<C, S, P>> {
        let on = self.state.modes.toggle(Flag::Loudness);
        if let Err(e) = self.push(Target::Loudness) {
            self.state.modes.set(Flag::Loudness, !on);
            self.resync(Target::Loudness);
            return Err(Error::Bus(e));
        }
        Ok(on)
    }

    pub fn toggle_backlight(&mut self) -> Result<bool, UnitError<C, S, P>> {
        let on = self.state.modes.toggle(Flag::Backlight);
        if let Err(e) = self.drive_backlight(on) {
            self.state.modes.set(Flag::Backlight, !on);
            return Err(e);
        }
        Ok(on)
    }

    /// Select input `index`, wrapping to 0 when out of range. Returns the
    /// input actually selected.
    pub fn select_input(&mut self, index: u8) -> Result<u8, UnitError<C, S, P>> {
        let old = self.state.modes.input();
        let input = self.state.modes.select_input(index, self.state.input_count());
        if let Err(e) = self.push(Target::Input) {
            self.state.modes.select_input(old, self.state.input_count());
            self.resync(Target::Input);
            return Err(Error::Bus(e));
        }
        Ok(input)
    }

    pub fn next_input(&mut self) -> Result<u8, UnitError<C, S, P>> {
        let mut modes = self.state.modes;
        let next = modes.next_input(self.state.input_count());
        self.select_input(next)
    }

    /// Switch to another chip at runtime and push the complete state to it.
    ///
    /// The state keeps the new variant even when the push fails, since it
    /// describes the fitted chip. A failed push is retried once in full so
    /// that a partly written chip is brought back in line when possible.
    pub fn set_variant(&mut self, variant: ChipVariant) -> Result<(), UnitError<C, S, P>> {
        #[cfg(feature = "defmt")]
        defmt::info!("switching {} -> {}", self.state.variant(), variant);
        self.state.set_variant(variant);
        if let Err(e) = self.control.apply_all(&self.state) {
            #[cfg(feature = "defmt")]
            defmt::warn!("bus write failed, resyncing");
            if self.control.apply_all(&self.state).is_err() {
                #[cfg(feature = "defmt")]
                defmt::error!("resync failed, hardware may differ from state");
            }
            return Err(Error::Bus(e));
        }
        Ok(())
    }

    /// Process one event and report what to display.
    pub fn handle(&mut self, event: Event) -> Result<Feedback, UnitError<C, S, P>> {
        let feedback = match event {
            Event::Adjust { id, delta } => {
                self.change_param(id, delta)?;
                Feedback::Param(self.view(id))
            }
            Event::ToggleMute => Feedback::Flag {
                flag: Flag::Mute,
                on: self.toggle_mute()?,
            },
            Event::ToggleLoudness => Feedback::Flag {
                flag: Flag::Loudness,
                on: self.toggle_loudness()?,
            },
            Event::ToggleBacklight => Feedback::Flag {
                flag: Flag::Backlight,
                on: self.toggle_backlight()?,
            },
            Event::SelectInput(index) => {
                let input = self.select_input(index)?;
                self.input_feedback(input)
            }
            Event::NextInput => {
                let input = self.next_input()?;
                self.input_feedback(input)
            }
            Event::Save => {
                self.save()?;
                Feedback::Saved
            }
        };
        Ok(feedback)
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn input_feedback(&self, input: u8) -> Feedback {
        // Every chip has at least Gain0, and inputs never exceed four.
        let id = ParamId::gain(input).unwrap_or(ParamId::Gain0);
        Feedback::Param(self.view(id))
    }

    fn push(&mut self, target: Target) -> Result<Push, C::Error> {
        let push = match target {
            Target::Param(id) => self.control.apply(id, &self.state),
            Target::Input => self.control.apply_input(&self.state),
            Target::Loudness => self.control.apply_loudness(&self.state),
        }?;
        if push == Push::Unsupported {
            #[cfg(feature = "defmt")]
            defmt::debug!("push ignored by {}", self.state.variant());
        }
        Ok(push)
    }

    /// Push the (rolled back) state again after a failed write.
    fn resync(&mut self, target: Target) {
        #[cfg(feature = "defmt")]
        defmt::warn!("bus write failed, resyncing");
        if self.push(target).is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("resync failed, hardware may differ from state");
        }
    }

    fn drive_backlight(&mut self, on: bool) -> Result<(), UnitError<C, S, P>> {
        let result = if on {
            self.backlight.set_high()
        } else {
            self.backlight.set_low()
        };
        result.map_err(Error::Pin)
    }

    fn drive_mute_line(&mut self, muted: bool) -> Result<(), UnitError<C, S, P>> {
        let result = if muted {
            self.mute_line.set_low()
        } else {
            self.mute_line.set_high()
        };
        result.map_err(Error::Pin)
    }
}
