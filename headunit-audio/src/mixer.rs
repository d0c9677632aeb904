//! Per-speaker attenuation for chips without balance or fader registers.
//!
//! Family A chips expose four speaker attenuators and nothing else for
//! spatial control. Balance (left/right) and fader (front/rear) are
//! synthesized by giving the disfavored speakers extra reduction.
//!
//! The logical model speaks in gain (0 = loudest, negative = quieter) while
//! the chip speaks in attenuation, so the final wire code of a channel is
//! `-(volume + reduction)`. Codes are returned unclamped.

/// Attenuation wire code per speaker channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelAttenuation {
    pub front_left: i16,
    pub front_right: i16,
    pub rear_left: i16,
    pub rear_right: i16,
}

impl ChannelAttenuation {
    /// Channels in the order they are sent to the chip.
    pub fn as_array(&self) -> [i16; 4] {
        [self.front_left, self.front_right, self.rear_left, self.rear_right]
    }

    /// Attenuation shared by all four channels.
    pub fn common(&self) -> i16 {
        let [a, b, c, d] = self.as_array();
        a.min(b).min(c).min(d)
    }
}

/// Mix logical volume, balance and fader into four channel codes.
///
/// Positive balance favors the left side, positive fader favors the front.
pub fn mix(volume: i8, balance: i8, fader: i8) -> ChannelAttenuation {
    let (balance, fader) = (balance as i16, fader as i16);
    let mut front_left = 0i16;
    let mut front_right = 0i16;
    let mut rear_left = 0i16;
    let mut rear_right = 0i16;

    if balance > 0 {
        front_right -= balance;
        rear_right -= balance;
    } else {
        front_left += balance;
        rear_left += balance;
    }

    if fader > 0 {
        rear_left -= fader;
        rear_right -= fader;
    } else {
        front_left += fader;
        front_right += fader;
    }

    let volume = volume as i16;
    ChannelAttenuation {
        front_left: -(volume + front_left),
        front_right: -(volume + front_right),
        rear_left: -(volume + rear_left),
        rear_right: -(volume + rear_right),
    }
}
