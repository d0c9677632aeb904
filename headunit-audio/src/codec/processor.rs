//! TDA731x / TDA7439 audio-processor driver.
//!
//! One driver covers all five supported chips. Which register layout is used
//! is decided on every call from [`AudioState::variant`], so switching chips
//! at runtime needs no reconfiguration of the driver.
//!
//! The driver is generic over any [`embedded_hal::i2c::I2c`] implementation.
//!
//! # Example
//!
//! ```ignore
//! let mut processor = AudioProcessor::new(i2c);
//! let state = AudioState::new(ChipVariant::Tda7313);
//! processor.apply_all(&state)?;             // Push every register
//! processor.apply(ParamId::Bass, &state)?;  // One control
//! ```

use embedded_hal::i2c::I2c;

use super::registers::{self as reg, set_bmt, Speaker, Tda7439Register, Tda731xCommand};
use crate::chip::Family;
use crate::control::{AudioControl, Push};
use crate::mixer;
use crate::param::ParamId;
use crate::state::AudioState;

/// Audio-processor driver.
pub struct AudioProcessor<I2C> {
    i2c: I2C,
    /// Address of the command-byte target (Family A).
    command_address: u8,
    /// Address of the sub-addressed target (Family B).
    register_address: u8,
}

impl<I2C> AudioProcessor<I2C>
where
    I2C: I2c,
{
    /// Create a driver using the default bus addresses.
    pub fn new(i2c: I2C) -> Self {
        Self::new_with_addresses(i2c, reg::TDA731X_ADDR, reg::TDA7439_ADDR)
    }

    /// Create a driver with explicit 7-bit addresses for both targets.
    pub fn new_with_addresses(i2c: I2C, command_address: u8, register_address: u8) -> Self {
        Self {
            i2c,
            command_address,
            register_address,
        }
    }

    /// Release the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // ── Bus helpers ────────────────────────────────────────────────────

    /// Send one self-contained command byte.
    pub fn send_command(&mut self, command: Tda731xCommand) -> Result<(), I2C::Error> {
        self.i2c.write(self.command_address, &[command.encode()])
    }

    /// Write one sub-addressed register.
    pub fn write_register(&mut self, register: Tda7439Register) -> Result<(), I2C::Error> {
        self.i2c.write(self.register_address, &register.encode())
    }

    // ── Family A ───────────────────────────────────────────────────────

    /// Master volume plus the four speaker attenuators.
    ///
    /// The mixer yields each channel's total attenuation. The part shared by
    /// all channels goes to the master volume register and each speaker
    /// attenuator carries the rest.
    fn tda731x_volume(&mut self, state: &AudioState) -> Result<Push, I2C::Error> {
        let params = state.params();
        let att = mixer::mix(
            state.effective_volume(),
            params.value(ParamId::Balance),
            params.value(ParamId::FRONT_REAR),
        );
        let master = att.common();
        self.send_command(Tda731xCommand::Volume { attenuation: master })?;
        for (speaker, total) in Speaker::ALL.into_iter().zip(att.as_array()) {
            self.send_command(Tda731xCommand::Speaker {
                speaker,
                attenuation: total - master,
            })?;
        }
        Ok(Push::Sent(5))
    }

    /// Input gain, loudness and input select share one command.
    fn tda731x_switch(&mut self, state: &AudioState) -> Result<Push, I2C::Error> {
        self.send_command(Tda731xCommand::Switch {
            gain: state.active_gain(),
            loudness: state.modes().loudness(),
            input: state.modes().input(),
        })?;
        Ok(Push::Sent(1))
    }

    fn apply_tda731x(&mut self, id: ParamId, state: &AudioState) -> Result<Push, I2C::Error> {
        let value = state.params().value(id);
        match id {
            ParamId::Volume | ParamId::Balance | ParamId::Preamp => self.tda731x_volume(state),
            ParamId::Bass => {
                self.send_command(Tda731xCommand::Bass { code: set_bmt(value) })?;
                Ok(Push::Sent(1))
            }
            ParamId::Treble => {
                self.send_command(Tda731xCommand::Treble { code: set_bmt(value) })?;
                Ok(Push::Sent(1))
            }
            ParamId::Middle => Ok(Push::Unsupported),
            ParamId::Gain0 | ParamId::Gain1 | ParamId::Gain2 | ParamId::Gain3 => {
                self.tda731x_switch(state)
            }
        }
    }

    // ── Family B ───────────────────────────────────────────────────────

    /// Left and right volume. Positive balance lowers the left side,
    /// negative the right, never below the volume floor.
    fn tda7439_volume(&mut self, state: &AudioState) -> Result<Push, I2C::Error> {
        let floor = state.params().get(ParamId::Volume).min() as i16;
        let volume = state.effective_volume() as i16;
        let balance = state.params().value(ParamId::Balance) as i16;

        let (mut left, mut right) = (volume, volume);
        if balance > 0 {
            left = (volume - balance).max(floor);
        } else {
            right = (volume + balance).max(floor);
        }

        self.write_register(Tda7439Register::VolumeLeft(-left))?;
        self.write_register(Tda7439Register::VolumeRight(-right))?;
        Ok(Push::Sent(2))
    }

    fn apply_tda7439(&mut self, id: ParamId, state: &AudioState) -> Result<Push, I2C::Error> {
        let value = state.params().value(id);
        let register = match id {
            ParamId::Volume | ParamId::Balance => return self.tda7439_volume(state),
            ParamId::Preamp => Tda7439Register::Preamp(-(value as i16)),
            ParamId::Bass => Tda7439Register::Bass(set_bmt(value)),
            ParamId::Middle => Tda7439Register::Middle(set_bmt(value)),
            ParamId::Treble => Tda7439Register::Treble(set_bmt(value)),
            ParamId::Gain0 | ParamId::Gain1 | ParamId::Gain2 | ParamId::Gain3 => {
                Tda7439Register::InputGain(value)
            }
        };
        self.write_register(register)?;
        Ok(Push::Sent(1))
    }
}

impl<I2C> AudioControl for AudioProcessor<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn apply(&mut self, id: ParamId, state: &AudioState) -> Result<Push, Self::Error> {
        let variant = state.variant();
        if !state.params().get(id).is_supported() {
            #[cfg(feature = "defmt")]
            defmt::debug!("{} not implemented on {}", id, variant);
            return Ok(Push::Unsupported);
        }
        // Gains of inactive inputs wait until their input is selected.
        if id.gain_input().is_some_and(|input| input != state.modes().input()) {
            return Ok(Push::Deferred);
        }
        match variant.family() {
            Family::A => self.apply_tda731x(id, state),
            Family::B => self.apply_tda7439(id, state),
        }
    }

    fn apply_input(&mut self, state: &AudioState) -> Result<Push, Self::Error> {
        match state.variant().family() {
            Family::A => self.tda731x_switch(state),
            Family::B => {
                // The chip numbers its inputs in reverse of the UI order.
                let chip_input = state.input_count() - 1 - state.modes().input();
                self.write_register(Tda7439Register::InputSelect(chip_input))?;
                self.write_register(Tda7439Register::InputGain(state.active_gain()))?;
                Ok(Push::Sent(2))
            }
        }
    }

    fn apply_loudness(&mut self, state: &AudioState) -> Result<Push, Self::Error> {
        match state.variant().family() {
            Family::A => self.tda731x_switch(state),
            Family::B => Ok(Push::Unsupported),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
