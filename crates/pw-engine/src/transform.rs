//! Block pitch transforms.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use pw_core::WindowTable;

/// Turns one analysis block into one synthesis block of the same length.
///
/// Called on the audio thread once per full block, per channel. Channels
/// do not interact. Implementations must not allocate or block.
pub trait PitchTransform: Send {
    /// `pitch_factor` must be finite and positive. Other values are a caller
    /// error: the output is unspecified and may contain NaN.
    fn transform(&mut self, analysis: &[f32], synthesis: &mut [f32], pitch_factor: f32);

    /// Drop any internal history.
    fn reset(&mut self) {}
}

impl<T: PitchTransform + ?Sized> PitchTransform for Box<T> {
    fn transform(&mut self, analysis: &[f32], synthesis: &mut [f32], pitch_factor: f32) {
        (**self).transform(analysis, synthesis, pitch_factor)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Hann-windowed linear-interpolation resampler.
///
/// The block is windowed, read back at position `i / factor` with linear
/// interpolation, then windowed again. With a factor below 1 the read
/// position runs off the end of the block and the tail comes out silent;
/// above 1 only the head of the block is read. Blocks are replaced, not
/// overlap-added.
pub struct WindowedResampler {
    window: WindowTable,
    scratch: Vec<f32>,
}

impl WindowedResampler {
    pub fn new(block_size: usize) -> Self {
        Self {
            window: WindowTable::hann(block_size),
            scratch: vec![0.0; block_size],
        }
    }

    pub fn window(&self) -> &WindowTable {
        &self.window
    }
}

impl PitchTransform for WindowedResampler {
    fn transform(&mut self, analysis: &[f32], synthesis: &mut [f32], pitch_factor: f32) {
        let n = self.scratch.len();
        debug_assert_eq!(analysis.len(), n);
        debug_assert_eq!(synthesis.len(), n);

        self.window.apply_into(analysis, &mut self.scratch);
        let src = &self.scratch;
        let factor = pitch_factor as f64;

        for (i, y) in synthesis.iter_mut().enumerate().take(n) {
            let pos = i as f64 / factor;
            // Saturating cast; +inf lands past the end and reads silence
            let i0 = pos as usize;
            if i0 >= n {
                *y = 0.0;
                continue;
            }
            let frac = (pos - i0 as f64) as f32;
            *y = if i0 + 1 < n {
                src[i0] * (1.0 - frac) + src[i0 + 1] * frac
            } else {
                src[i0]
            };
        }

        self.window.apply(synthesis);
    }
}
