//! Core types for the pitchwheel pitch shifter.
//!
//! Shared by the real-time engine, the format readers and the controller.
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod audio_buffer;
mod config;
mod pitch;
mod window;

pub use audio_buffer::AudioBuffer;
pub use config::{
    ChannelConfig, ConfigError, EngineConfig, DEFAULT_BLOCK_SIZE, MAX_CHANNELS, QUANTUM_SIZE,
};
pub use pitch::{
    clamp_semitones, semitones_to_factor, validate_pitch_factor, DEFAULT_PITCH_FACTOR,
    SEMITONE_MAX, SEMITONE_MIN,
};
pub use window::WindowTable;
