//! Semitone to pitch-factor conversion for the control layer.
//!
//! The engine only ever consumes the multiplicative factor; semitones stay
//! on the control side.

use crate::config::ConfigError;

/// Lowest semitone offset exposed to users.
pub const SEMITONE_MIN: f64 = -12.0;

/// Highest semitone offset exposed to users.
pub const SEMITONE_MAX: f64 = 12.0;

/// Factor applied when no shift is requested.
pub const DEFAULT_PITCH_FACTOR: f32 = 1.0;

/// Clamp a semitone offset to `[SEMITONE_MIN, SEMITONE_MAX]`.
///
/// NaN maps to 0 (no shift).
pub fn clamp_semitones(semitones: f64) -> f64 {
    if semitones.is_nan() {
        return 0.0;
    }
    semitones.clamp(SEMITONE_MIN, SEMITONE_MAX)
}

/// Convert a semitone offset to a resampling factor, `2^(s/12)`.
///
/// 12 → 2.0, 0 → 1.0, -12 → 0.5.
pub fn semitones_to_factor(semitones: f64) -> f64 {
    libm::exp2(semitones / 12.0)
}

/// Accept `factor` only if it is finite and strictly positive.
///
/// Anything else would send NaN or silence through the resampler.
pub fn validate_pitch_factor(factor: f32) -> Result<f32, ConfigError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(factor)
    } else {
        Err(ConfigError::InvalidPitchFactor(factor))
    }
}
