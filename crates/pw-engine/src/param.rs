//! Lock-free pitch factor hand-off from the control thread to the audio thread.

use alloc::sync::Arc;
use atomic_float::AtomicF32;
use core::sync::atomic::Ordering;
use pw_core::{validate_pitch_factor, ConfigError};

/// Cache-line aligned cell so the writer never shares a line with audio state.
#[derive(Debug)]
#[repr(align(64))]
struct PitchCell {
    value: AtomicF32,
}

/// Control-side handle. Not `Clone`: there is exactly one writer.
#[derive(Debug)]
pub struct PitchWriter {
    cell: Arc<PitchCell>,
}

/// Audio-side handle. Not `Clone`: there is exactly one reader.
#[derive(Debug)]
pub struct PitchReader {
    cell: Arc<PitchCell>,
}

/// Create a connected writer/reader pair holding `initial`.
///
/// `initial` is not checked here; [`PitchNode::new`](crate::PitchNode::new)
/// rejects a reader whose value is not a usable factor.
pub fn pitch_channel(initial: f32) -> (PitchWriter, PitchReader) {
    let cell = Arc::new(PitchCell {
        value: AtomicF32::new(initial),
    });
    (
        PitchWriter { cell: cell.clone() },
        PitchReader { cell },
    )
}

impl PitchWriter {
    /// Publish a new factor. The reader sees either the old or the new
    /// value, never a mix.
    ///
    /// Non-positive or non-finite factors are refused and the previous value
    /// stays in place.
    #[inline]
    pub fn set(&self, factor: f32) -> Result<(), ConfigError> {
        let factor = validate_pitch_factor(factor)?;
        self.cell.value.store(factor, Ordering::Release);
        Ok(())
    }

    /// Last value written.
    #[inline]
    pub fn get(&self) -> f32 {
        self.cell.value.load(Ordering::Relaxed)
    }
}

impl PitchReader {
    /// Current factor. Wait-free, never allocates.
    #[inline]
    pub fn get(&self) -> f32 {
        self.cell.value.load(Ordering::Acquire)
    }
}
