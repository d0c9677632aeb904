//! Supported audio-processor chips.
//!
//! Five ST audio processors are supported. They fall into two families that
//! differ in how they are addressed on the bus and in which controls have
//! dedicated registers:
//!
//! | Variant | Family | Inputs | Balance / fader |
//! |---------|--------|--------|-----------------|
//! | TDA7312 | A | 4 | synthesized (4 speaker attenuators) |
//! | TDA7313 | A | 3 | synthesized |
//! | TDA7314 | A | 1 | synthesized |
//! | TDA7318 | A | 4 | synthesized |
//! | TDA7439 | B | 4 | independent left/right volume |

/// Register family of a chip variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    /// Self-contained command bytes, four speaker attenuators, no
    /// balance/fader registers.
    A,
    /// Sub-addressed registers with independent left/right volume.
    B,
}

/// One of the five supported audio processors.
///
/// The discriminant is the id stored in non-volatile memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChipVariant {
    Tda7312 = 0,
    Tda7313 = 1,
    Tda7314 = 2,
    Tda7318 = 3,
    /// Default and fallback variant.
    #[default]
    Tda7439 = 4,
}

impl ChipVariant {
    /// All variants in id order.
    pub const ALL: [ChipVariant; 5] = [
        ChipVariant::Tda7312,
        ChipVariant::Tda7313,
        ChipVariant::Tda7314,
        ChipVariant::Tda7318,
        ChipVariant::Tda7439,
    ];

    /// Resolve a stored id. Unknown ids fall back to [`ChipVariant::Tda7439`].
    pub fn from_id(id: u8) -> Self {
        match id {
            0 => ChipVariant::Tda7312,
            1 => ChipVariant::Tda7313,
            2 => ChipVariant::Tda7314,
            3 => ChipVariant::Tda7318,
            4 => ChipVariant::Tda7439,
            _ => {
                #[cfg(feature = "defmt")]
                defmt::warn!("unknown chip id {}, using TDA7439", id);
                ChipVariant::default()
            }
        }
    }

    /// Id written to non-volatile memory.
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn family(self) -> Family {
        match self {
            ChipVariant::Tda7439 => Family::B,
            _ => Family::A,
        }
    }

    /// Number of selectable stereo inputs.
    pub fn input_count(self) -> u8 {
        match self {
            ChipVariant::Tda7313 => 3,
            ChipVariant::Tda7314 => 1,
            _ => 4,
        }
    }

    /// Whether the display scales this chip's values with a per-control
    /// multiplier instead of the plain 1/8 dB step.
    pub(crate) fn scaled_display(self) -> bool {
        matches!(self, ChipVariant::Tda7313 | ChipVariant::Tda7318)
    }
}
