//! Centralized error type for the synthlink umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] synthlink_core::Error),

    #[error("Devices: {0}")]
    Devices(#[from] synthlink_devices::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] synthlink_midi_io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
