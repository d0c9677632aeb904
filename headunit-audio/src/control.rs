use crate::param::ParamId;
use crate::state::AudioState;

/// Outcome of a hardware push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Push {
    /// This many bus transactions were sent.
    Sent(u8),
    /// The active chip does not implement the control. Nothing was sent.
    Unsupported,
    /// Stored only; applied when its input becomes active.
    Deferred,
}

/// Trait for audio processors that turn logical state into register writes.
///
/// Implementations read everything they need from `state`, including the
/// chip variant, at call time.
pub trait AudioControl {
    /// Error type for bus writes.
    type Error;

    /// Push parameter `id` to the chip.
    fn apply(&mut self, id: ParamId, state: &AudioState) -> Result<Push, Self::Error>;

    /// Push input selection together with the selected input's gain.
    fn apply_input(&mut self, state: &AudioState) -> Result<Push, Self::Error>;

    /// Push the loudness mode.
    fn apply_loudness(&mut self, state: &AudioState) -> Result<Push, Self::Error>;

    /// Push the complete state: input, preamp, tone controls, then volume.
    fn apply_all(&mut self, state: &AudioState) -> Result<(), Self::Error> {
        self.apply_input(state)?;
        for id in [ParamId::Preamp, ParamId::Bass, ParamId::Middle, ParamId::Treble, ParamId::Volume] {
            self.apply(id, state)?;
        }
        Ok(())
    }
}
