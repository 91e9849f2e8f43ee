//! Audio file formats for pitchwheel.
//!
//! Decodes WAV into planar f32 buffers and encodes them back out.

mod wav_format;

pub use wav_format::{load_wav, wav_to_bytes, write_wav, WavData};

use thiserror::Error;

/// Error type for format parsing.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Invalid file header")]
    InvalidHeader,

    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("Unsupported format: tag {format}, {bits} bits, {channels} channels")]
    UnsupportedFormat { format: u16, bits: u16, channels: u16 },

    #[error("Audio too long for a WAV file")]
    TooLarge,

    #[error("Malformed chunk: {0}")]
    Binary(binrw::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for FormatError {
    fn from(err: binrw::Error) -> Self {
        if err.is_eof() {
            FormatError::UnexpectedEof
        } else {
            FormatError::Binary(err)
        }
    }
}
