//! Offline rendering: drives the engine quantum by quantum over a whole clip.

use pw_core::{AudioBuffer, ConfigError, EngineConfig};
use pw_engine::{pitch_channel, PitchNode};
use pw_formats::WavData;

/// Pitch-shift `clip` with a fixed factor.
///
/// The output has the clip's length and channel count. The engine's
/// warm-up latency is compensated: the leading `B - Q` silent samples are
/// dropped and the clip is padded with silence so the tail still comes out.
///
/// `config` must have the clip's channel count, and `pitch_factor` must be
/// finite and positive.
pub fn render_clip(clip: &WavData, config: EngineConfig, pitch_factor: f32) -> Result<WavData, ConfigError> {
    config.validate()?;
    let channels = clip.channels();
    if config.num_channels() != channels {
        return Err(ConfigError::SourceChannels {
            source_channels: channels,
            engine: config.num_channels(),
        });
    }

    let (_writer, reader) = pitch_channel(pitch_factor);
    let mut node = PitchNode::new(config, reader)?;

    let q = node.quantum_size();
    let latency = node.latency();
    let frames = clip.audio.frames();

    let mut input = AudioBuffer::new(channels, q);
    let mut quantum = AudioBuffer::new(channels, q);
    let mut output = AudioBuffer::new(channels, frames);

    let mut pos = 0;
    while pos < frames + latency {
        input.copy_window(&clip.audio, pos);
        node.process_quantum(&input, &mut quantum);
        // Latency is a whole number of quanta, so skipped quanta are all silent
        if pos >= latency {
            quantum.write_into(&mut output, pos - latency);
        }
        pos += q;
    }

    Ok(WavData::new(clip.sample_rate, output))
}
