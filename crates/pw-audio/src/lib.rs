//! Audio output backends for pitchwheel.

mod cpal_backend;
mod traits;

pub use cpal_backend::{interleave_into, CpalOutput};
pub use traits::{AudioError, AudioOutput};
