//! TDA731x and TDA7439 command layouts.
//!
//! Family A chips (TDA7312/7313/7314/7318) take self-contained command bytes:
//! the high bits select the function, the low bits carry the value. The
//! TDA7439 takes `[sub_address, value]` pairs.
//!
//! Every command is built from named fields through [`Tda731xCommand::encode`]
//! or [`Tda7439Register::encode`]. Field values are saturated to their bit
//! width so an oversized value can never change the register-select bits.

// ── I2C addresses ──────────────────────────────────────────────────────────

/// 7-bit address of the TDA731x family (0x88 on the wire).
pub const TDA731X_ADDR: u8 = 0x44;

/// 7-bit address of the TDA7439 (0x88 on the wire).
pub const TDA7439_ADDR: u8 = 0x44;

// ── TDA731x function select ────────────────────────────────────────────────

/// Master volume, bits 5:0 = attenuation in 1.25 dB steps.
const TDA731X_VOLUME: u8 = 0x00;
/// Speaker attenuator left rear, bits 4:0.
const TDA731X_SP_REAR_LEFT: u8 = 0x80;
/// Speaker attenuator right rear, bits 4:0.
const TDA731X_SP_REAR_RIGHT: u8 = 0xA0;
/// Speaker attenuator left front, bits 4:0.
const TDA731X_SP_FRONT_LEFT: u8 = 0xC0;
/// Speaker attenuator right front, bits 4:0.
const TDA731X_SP_FRONT_RIGHT: u8 = 0xE0;
/// Audio switch.
/// - Bits 4:3: input gain (0 = max gain, 3 = 0 dB)
/// - Bit  2  : loudness (0 = on)
/// - Bits 1:0: input select
const TDA731X_SWITCH: u8 = 0x40;
/// Bass, bits 3:0.
const TDA731X_BASS: u8 = 0x60;
/// Treble, bits 3:0.
const TDA731X_TREBLE: u8 = 0x70;

const VOLUME_MAX: u8 = 0x3F;
/// Also the speaker mute code.
const SPEAKER_MAX: u8 = 0x1F;
const TONE_MAX: u8 = 0x0F;
const SWITCH_GAIN_MAX: u8 = 0x03;
const SWITCH_INPUT_MAX: u8 = 0x03;

// ── TDA7439 sub-addresses ──────────────────────────────────────────────────

const TDA7439_INPUT_SELECT: u8 = 0x00;
const TDA7439_INPUT_GAIN: u8 = 0x01;
/// Labelled "volume" in the datasheet; used as the preamp stage here.
const TDA7439_PREAMP: u8 = 0x02;
const TDA7439_BASS: u8 = 0x03;
const TDA7439_MIDDLE: u8 = 0x04;
const TDA7439_TREBLE: u8 = 0x05;
const TDA7439_VOLUME_RIGHT: u8 = 0x06;
const TDA7439_VOLUME_LEFT: u8 = 0x07;

const TDA7439_INPUT_MAX: u8 = 0x03;
const TDA7439_GAIN_MAX: u8 = 0x0F;
/// 0x38 and above mute the preamp stage.
const TDA7439_PREAMP_MAX: u8 = 0x38;
const TDA7439_TONE_MAX: u8 = 0x0F;
/// 0x78 and above mute the speaker output.
const TDA7439_VOLUME_MAX: u8 = 0x78;

fn saturate(value: i16, max: u8) -> u8 {
    value.clamp(0, max as i16) as u8
}

/// Map a signed tone value onto the 4-bit tone code shared by both families:
/// 0..7 cut (0 = deepest), 7 = flat, 15..8 boost.
pub fn set_bmt(value: i8) -> u8 {
    if value > 0 {
        (15 - value as i16) as u8
    } else {
        (7 + value as i16) as u8
    }
}

/// Speaker attenuator of a Family A chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speaker {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl Speaker {
    /// Speakers in the order the mixer reports them.
    pub const ALL: [Speaker; 4] = [
        Speaker::FrontLeft,
        Speaker::FrontRight,
        Speaker::RearLeft,
        Speaker::RearRight,
    ];

    fn select(self) -> u8 {
        match self {
            Speaker::FrontLeft => TDA731X_SP_FRONT_LEFT,
            Speaker::FrontRight => TDA731X_SP_FRONT_RIGHT,
            Speaker::RearLeft => TDA731X_SP_REAR_LEFT,
            Speaker::RearRight => TDA731X_SP_REAR_RIGHT,
        }
    }
}

/// A Family A command with its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tda731xCommand {
    /// Master attenuation in raw steps.
    Volume { attenuation: i16 },
    /// Speaker attenuation in raw steps.
    Speaker { speaker: Speaker, attenuation: i16 },
    /// Tone code from [`set_bmt`].
    Bass { code: u8 },
    Treble { code: u8 },
    /// Input gain (0 = 0 dB), loudness and input select share this byte.
    Switch { gain: i8, loudness: bool, input: u8 },
}

impl Tda731xCommand {
    pub fn encode(self) -> u8 {
        match self {
            Tda731xCommand::Volume { attenuation } => {
                TDA731X_VOLUME | saturate(attenuation, VOLUME_MAX)
            }
            Tda731xCommand::Speaker { speaker, attenuation } => {
                speaker.select() | saturate(attenuation, SPEAKER_MAX)
            }
            Tda731xCommand::Bass { code } => TDA731X_BASS | (code & TONE_MAX),
            Tda731xCommand::Treble { code } => TDA731X_TREBLE | (code & TONE_MAX),
            Tda731xCommand::Switch { gain, loudness, input } => {
                let gain_bits = SWITCH_GAIN_MAX - saturate(gain as i16, SWITCH_GAIN_MAX);
                let loudness_bit = if loudness { 0 } else { 1 };
                TDA731X_SWITCH
                    | gain_bits << 3
                    | loudness_bit << 2
                    | saturate(input as i16, SWITCH_INPUT_MAX)
            }
        }
    }
}

/// A TDA7439 register write with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tda7439Register {
    /// Chip input number (reverse of the UI order).
    InputSelect(u8),
    InputGain(i8),
    /// Preamp attenuation in dB.
    Preamp(i16),
    Bass(u8),
    Middle(u8),
    Treble(u8),
    /// Speaker attenuation in dB.
    VolumeLeft(i16),
    VolumeRight(i16),
}

impl Tda7439Register {
    /// `[sub_address, value]`.
    pub fn encode(self) -> [u8; 2] {
        match self {
            Tda7439Register::InputSelect(input) => {
                [TDA7439_INPUT_SELECT, saturate(input as i16, TDA7439_INPUT_MAX)]
            }
            Tda7439Register::InputGain(gain) => {
                [TDA7439_INPUT_GAIN, saturate(gain as i16, TDA7439_GAIN_MAX)]
            }
            Tda7439Register::Preamp(att) => [TDA7439_PREAMP, saturate(att, TDA7439_PREAMP_MAX)],
            Tda7439Register::Bass(code) => [TDA7439_BASS, code & TDA7439_TONE_MAX],
            Tda7439Register::Middle(code) => [TDA7439_MIDDLE, code & TDA7439_TONE_MAX],
            Tda7439Register::Treble(code) => [TDA7439_TREBLE, code & TDA7439_TONE_MAX],
            Tda7439Register::VolumeLeft(att) => {
                [TDA7439_VOLUME_LEFT, saturate(att, TDA7439_VOLUME_MAX)]
            }
            Tda7439Register::VolumeRight(att) => {
                [TDA7439_VOLUME_RIGHT, saturate(att, TDA7439_VOLUME_MAX)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmt_examples() {
        assert_eq!(set_bmt(3), 12);
        assert_eq!(set_bmt(-3), 4);
        assert_eq!(set_bmt(0), 7);
    }

    #[test]
    fn bmt_full_domain() {
        for v in -7i8..=7 {
            let expected = if v > 0 { 15 - v } else { 7 + v };
            assert_eq!(set_bmt(v) as i8, expected);
            assert!(set_bmt(v) <= 15);
        }
        // boost codes never collide with cut codes
        assert_eq!(set_bmt(7), 8);
        assert_eq!(set_bmt(-7), 0);
    }

    #[test]
    fn tda731x_volume_and_speakers() {
        assert_eq!(Tda731xCommand::Volume { attenuation: 20 }.encode(), 20);
        assert_eq!(
            Tda731xCommand::Speaker { speaker: Speaker::FrontLeft, attenuation: 5 }.encode(),
            0xC5
        );
        assert_eq!(
            Tda731xCommand::Speaker { speaker: Speaker::RearRight, attenuation: 0 }.encode(),
            0xA0
        );
    }

    #[test]
    fn tda731x_fields_saturate() {
        // 40 would spill into bit 5 of the speaker select; saturate to mute
        assert_eq!(
            Tda731xCommand::Speaker { speaker: Speaker::RearLeft, attenuation: 40 }.encode(),
            0x80 | 0x1F
        );
        assert_eq!(
            Tda731xCommand::Speaker { speaker: Speaker::FrontRight, attenuation: -3 }.encode(),
            0xE0
        );
        assert_eq!(Tda731xCommand::Volume { attenuation: 100 }.encode(), 0x3F);
    }

    #[test]
    fn tda731x_tone() {
        assert_eq!(Tda731xCommand::Bass { code: set_bmt(3) }.encode(), 0x6C);
        assert_eq!(Tda731xCommand::Treble { code: set_bmt(-7) }.encode(), 0x70);
    }

    #[test]
    fn tda731x_switch_layout() {
        // gain 0 -> bits 4:3 = 3, loudness on -> bit 2 clear, input 2
        assert_eq!(
            Tda731xCommand::Switch { gain: 0, loudness: true, input: 2 }.encode(),
            0x40 | 3 << 3 | 2
        );
        assert_eq!(
            Tda731xCommand::Switch { gain: 3, loudness: false, input: 0 }.encode(),
            0x40 | 1 << 2
        );
    }

    #[test]
    fn tda7439_registers() {
        assert_eq!(Tda7439Register::InputSelect(3).encode(), [0x00, 3]);
        assert_eq!(Tda7439Register::InputGain(15).encode(), [0x01, 15]);
        assert_eq!(Tda7439Register::Preamp(47).encode(), [0x02, 47]);
        assert_eq!(Tda7439Register::Middle(set_bmt(2)).encode(), [0x04, 13]);
        assert_eq!(Tda7439Register::VolumeLeft(79).encode(), [0x07, 0x4F]);
        assert_eq!(Tda7439Register::VolumeRight(200).encode(), [0x06, 0x78]);
    }
}
