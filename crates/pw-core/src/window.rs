//! Hann window table.
//!
//! Computed once per block length and shared read-only by every channel.

use alloc::vec::Vec;
use core::f64::consts::PI;
use core::ops::Deref;

/// Precomputed Hann weights, `w[i] = 0.5 * (1 - cos(2πi / len))`.
///
/// The curve is periodic: `w[0] == 0`, peak of 1.0 at `len / 2`, and
/// `w[i] == w[len - i]` for `0 < i < len`.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowTable {
    weights: Vec<f32>,
}

impl WindowTable {
    /// Generate a table of `len` weights.
    ///
    /// Lengths of 0 or 1 produce a table that is all zeros (`w[0] = 0`)
    /// instead of dividing by zero.
    pub fn hann(len: usize) -> Self {
        if len <= 1 {
            return Self { weights: alloc::vec![0.0; len] };
        }
        let n = len as f64;
        let weights = (0..len)
            .map(|i| (0.5 * (1.0 - libm::cos(2.0 * PI * i as f64 / n))) as f32)
            .collect();
        Self { weights }
    }

    /// Number of weights.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// True when the table holds no weights.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Multiply `samples` elementwise by the table, in place.
    #[inline]
    pub fn apply(&self, samples: &mut [f32]) {
        for (s, w) in samples.iter_mut().zip(&self.weights) {
            *s *= *w;
        }
    }

    /// Write `src[i] * w[i]` into `dst`.
    #[inline]
    pub fn apply_into(&self, src: &[f32], dst: &mut [f32]) {
        for ((d, s), w) in dst.iter_mut().zip(src).zip(&self.weights) {
            *d = *s * *w;
        }
    }
}

impl Deref for WindowTable {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.weights
    }
}
