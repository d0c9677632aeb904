//! # headunit-audio
//!
//! A `no_std`, zero-allocation control core for car head units built around
//! the ST TDA731x family (TDA7312, TDA7313, TDA7314, TDA7318) and the
//! TDA7439 audio processors. It keeps a single owned model of every user
//! control, clamps edits to what the fitted chip can represent, mixes
//! balance and fader into per-speaker attenuation, and pushes the result
//! over I²C.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Capability | [`chip`] / [`grid`] | Chip variants and their per-control grids |
//! | Model | [`param`] / [`mode`] / [`state`] | Parameter values, mode flags, owned state |
//! | Mixing | [`mixer`] | Balance and fader to per-channel attenuation |
//! | Trait | [`control`] | `AudioControl` trait for hardware backends |
//! | Codec | [`codec`] | TDA731x / TDA7439 register encoding and driver |
//! | Storage | [`persist`] | Byte layout, `NvStore` trait, load and save |
//! | Root | [`headunit`] | Event handling, rollback on bus failure |
//!
//! ## Quick start
//!
//! ```ignore
//! use headunit_audio::{AudioProcessor, Event, HeadUnit, ParamId, RamStore};
//!
//! let mut unit = HeadUnit::load(AudioProcessor::new(i2c), eeprom, backlight, mute)?;
//! unit.power_on()?;
//!
//! // From the encoder / remote control handler:
//! let feedback = unit.handle(Event::Adjust { id: ParamId::Volume, delta: 1 })?;
//!
//! // Before power is removed:
//! unit.power_off()?;
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `defmt` | no | `defmt::Format` impls and log output |
//!
//! ## Units
//!
//! - **Stored values:** raw grid units of the fitted chip ([`grid::grid_for`])
//! - **Grid step:** 1/8 dB
//! - **Displayed values:** see [`grid::display_value`]

#![no_std]

pub mod constants;
pub mod chip;
pub mod grid;
pub mod param;
pub mod mixer;
pub mod mode;
pub mod state;
pub mod control;
pub mod codec;
pub mod persist;
pub mod error;
pub mod headunit;


pub use chip::{ChipVariant, Family};
pub use codec::AudioProcessor;
pub use control::{AudioControl, Push};
pub use error::Error;
pub use headunit::{Event, Feedback, HeadUnit, UnitError};
pub use mode::{Flag, ModeFlags};
pub use param::ParamId;
pub use persist::{NvStore, RamStore};
pub use state::{AudioState, ParamView};
