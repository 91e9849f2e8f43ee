//! Audio output trait and error types.

use pw_core::AudioBuffer;
use thiserror::Error;

/// Error type for audio operations.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio device available")]
    NoDevice,

    #[error("Device init error: {0}")]
    DeviceInit(#[from] cpal::DefaultStreamConfigError),

    #[error("Stream create error: {0}")]
    StreamCreate(#[from] cpal::BuildStreamError),

    #[error("Playback error: {0}")]
    Playback(#[from] cpal::PlayStreamError),

    #[error("Pause error: {0}")]
    Pause(#[from] cpal::PauseStreamError),
}

/// Trait for audio output backends.
pub trait AudioOutput {
    /// Device sample rate.
    fn sample_rate(&self) -> u32;

    /// Device channel count.
    fn channels(&self) -> u16;

    /// Queue one planar quantum, spinning until the device has room.
    fn write_quantum(&mut self, quantum: &AudioBuffer);

    /// Start playback.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop playback.
    fn stop(&mut self) -> Result<(), AudioError>;
}
