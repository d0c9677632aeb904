//! Error type of the control core.

use core::fmt;

/// Errors reported by [`HeadUnit`](crate::HeadUnit).
///
/// Out-of-range values and unsupported controls are not errors: the first
/// are saturated, the second are silent no-ops.
#[derive(Debug, PartialEq, Eq)]
pub enum Error<B, S, P> {
    /// Control bus write failed. The logical change was rolled back.
    Bus(B),

    /// Non-volatile store access failed.
    Store(S),

    /// Driving an output line failed.
    Pin(P),
}

impl<B: fmt::Debug, S: fmt::Debug, P: fmt::Debug> fmt::Display for Error<B, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus error: {:?}", e),
            Error::Store(e) => write!(f, "store error: {:?}", e),
            Error::Pin(e) => write!(f, "output line error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<B, S, P> defmt::Format for Error<B, S, P> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Bus(_) => defmt::write!(f, "bus error"),
            Error::Store(_) => defmt::write!(f, "store error"),
            Error::Pin(_) => defmt::write!(f, "output line error"),
        }
    }
}
