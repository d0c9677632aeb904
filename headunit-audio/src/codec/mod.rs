//! Audio-processor driver module.
//!
//! Provides the register layouts of the TDA731x family and the TDA7439, and
//! [`AudioProcessor`], the driver that implements
//! [`AudioControl`](crate::control::AudioControl) for all of them.

pub mod registers;
mod processor;

pub use processor::AudioProcessor;
pub use registers::{set_bmt, Speaker, Tda7439Register, Tda731xCommand};
