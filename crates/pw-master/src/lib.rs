//! Headless controller for pitchwheel.
//!
//! Owns the loaded clip and the control side of the pitch parameter, and
//! drives the engine either offline (render to WAV) or in real time on a
//! playback thread.

mod render;

use pw_audio::{AudioError, AudioOutput, CpalOutput};
use pw_core::{clamp_semitones, semitones_to_factor, AudioBuffer, EngineConfig};
use pw_engine::{pitch_channel, PitchNode, PitchWriter};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;

// Re-export common types so callers don't need pw-core/pw-formats directly.
pub use pw_core::{ConfigError, DEFAULT_BLOCK_SIZE, QUANTUM_SIZE, SEMITONE_MAX, SEMITONE_MIN};
pub use pw_formats::{FormatError, WavData};

pub use render::render_clip;

/// Error type for controller operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("No clip loaded")]
    NoClip,
}

/// Headless pitch controller. Owns a clip and manages playback.
pub struct Controller {
    clip: Option<Arc<WavData>>,
    block_size: usize,
    semitones: f64,
    playback: Option<PlaybackHandle>,
}

struct PlaybackHandle {
    pitch: PitchWriter,
    stop_signal: Arc<AtomicBool>,
    frames_played: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
    sample_rate: u32,
    thread: Option<JoinHandle<()>>,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            clip: None,
            block_size: DEFAULT_BLOCK_SIZE,
            semitones: 0.0,
            playback: None,
        }
    }

    // --- Clip management ---

    pub fn clip(&self) -> Option<&WavData> {
        self.clip.as_deref()
    }

    pub fn load_wav(&mut self, data: &[u8]) -> Result<(), FormatError> {
        let wav = pw_formats::load_wav(data)?;
        tracing::debug!(
            sample_rate = wav.sample_rate,
            channels = wav.channels(),
            frames = wav.audio.frames(),
            "loaded clip"
        );
        self.set_clip(wav);
        Ok(())
    }

    pub fn set_clip(&mut self, wav: WavData) {
        self.stop();
        self.clip = Some(Arc::new(wav));
    }

    // --- Engine settings ---

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Change the analysis block length. Takes effect on the next play or
    /// render.
    pub fn set_block_size(&mut self, block_size: usize) -> Result<(), ConfigError> {
        EngineConfig::default().with_block_size(block_size).validate()?;
        self.block_size = block_size;
        Ok(())
    }

    /// Engine config for the current clip and block size.
    pub fn engine_config(&self) -> Result<EngineConfig, Error> {
        let clip = self.clip.as_ref().ok_or(Error::NoClip)?;
        let config = EngineConfig::default()
            .with_channels(clip.channels())
            .with_block_size(self.block_size);
        config.validate()?;
        Ok(config)
    }

    // --- Pitch control ---

    pub fn semitones(&self) -> f64 {
        self.semitones
    }

    /// Set the shift in semitones, clamped to [-12, 12]. Applies live if
    /// playing. Returns the value actually stored.
    pub fn set_semitones(&mut self, semitones: f64) -> f64 {
        self.semitones = clamp_semitones(semitones);
        if let Some(pb) = &self.playback {
            if let Err(e) = pb.pitch.set(self.pitch_factor()) {
                tracing::warn!("Pitch update refused: {}", e);
            }
        }
        tracing::debug!(semitones = self.semitones, factor = self.pitch_factor(), "pitch changed");
        self.semitones
    }

    /// Shift by `delta` semitones from the current value.
    pub fn nudge_semitones(&mut self, delta: f64) -> f64 {
        self.set_semitones(self.semitones + delta)
    }

    /// Resampling factor for the current shift, `2^(s/12)`.
    pub fn pitch_factor(&self) -> f32 {
        semitones_to_factor(self.semitones) as f32
    }

    // --- Real-time playback ---

    pub fn play(&mut self) -> Result<(), Error> {
        self.stop();

        let clip = self.clip.clone().ok_or(Error::NoClip)?;
        let (pitch, reader) = pitch_channel(self.pitch_factor());
        // Reject bad shapes here, before anything reaches the audio thread
        let node = PitchNode::new(self.engine_config()?, reader)?;

        let stop_signal = Arc::new(AtomicBool::new(false));
        let frames_played = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stop = stop_signal.clone();
        let played = frames_played.clone();
        let done = finished.clone();
        let sample_rate = clip.sample_rate;

        let thread = std::thread::spawn(move || {
            audio_thread(node, clip, stop, played, done);
        });

        self.playback = Some(PlaybackHandle {
            pitch,
            stop_signal,
            frames_played,
            finished,
            sample_rate,
            thread: Some(thread),
        });
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut pb) = self.playback.take() {
            pb.stop_signal.store(true, Ordering::Relaxed);
            if let Some(handle) = pb.thread.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| !p.finished.load(Ordering::Relaxed))
    }

    pub fn is_finished(&self) -> bool {
        self.playback
            .as_ref()
            .is_some_and(|p| p.finished.load(Ordering::Relaxed))
    }

    /// Playback position in seconds of source audio consumed.
    pub fn position(&self) -> Option<f64> {
        let pb = self.playback.as_ref()?;
        if pb.finished.load(Ordering::Relaxed) || pb.sample_rate == 0 {
            return None;
        }
        let frames = pb.frames_played.load(Ordering::Relaxed);
        Some(frames as f64 / pb.sample_rate as f64)
    }

    // --- Offline rendering ---

    /// Run the whole clip through the engine at the current pitch.
    pub fn render(&self) -> Result<WavData, Error> {
        let clip = self.clip.as_ref().ok_or(Error::NoClip)?;
        Ok(render_clip(clip, self.engine_config()?, self.pitch_factor())?)
    }

    pub fn render_to_wav(&self) -> Result<Vec<u8>, Error> {
        Ok(pw_formats::wav_to_bytes(&self.render()?)?)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn audio_thread(
    mut node: PitchNode,
    clip: Arc<WavData>,
    stop_signal: Arc<AtomicBool>,
    frames_played: Arc<AtomicU64>,
    finished: Arc<AtomicBool>,
) {
    if let Err(e) = stream_clip(&mut node, &clip, &stop_signal, &frames_played) {
        tracing::error!("Playback failed: {}", e);
    }
    finished.store(true, Ordering::Relaxed);
}

fn stream_clip(
    node: &mut PitchNode,
    clip: &WavData,
    stop_signal: &AtomicBool,
    frames_played: &AtomicU64,
) -> Result<(), AudioError> {
    let (mut output, consumer) = CpalOutput::new()?;
    if output.sample_rate() != clip.sample_rate {
        tracing::warn!(
            device = output.sample_rate(),
            clip = clip.sample_rate,
            "device rate differs from clip rate; playback speed will be off"
        );
    }
    output.build_stream(consumer)?;
    output.start()?;

    let q = node.quantum_size();
    let channels = clip.channels();
    let mut input = AudioBuffer::new(channels, q);
    let mut quantum = AudioBuffer::new(channels, q);

    // Run past the end of the clip by the engine latency to flush the tail
    let total = clip.audio.frames() + node.latency();
    let mut pos = 0;
    while pos < total && !stop_signal.load(Ordering::Relaxed) {
        input.copy_window(&clip.audio, pos);
        node.process_quantum(&input, &mut quantum);
        output.write_quantum(&quantum);
        pos += q;
        frames_played.store(pos.min(clip.audio.frames()) as u64, Ordering::Relaxed);
    }

    // Let the ring buffer drain before the stream is dropped
    quantum.silence();
    for _ in 0..(output.sample_rate() as usize / q).max(1) {
        output.write_quantum(&quantum);
    }
    output.stop()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone_clip(frames: usize) -> WavData {
        let samples: Vec<f32> = (0..frames)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();
        WavData::new(44100, AudioBuffer::from_interleaved(&samples, 1))
    }

    #[test]
    fn semitones_are_clamped() {
        let mut ctrl = Controller::new();
        assert_eq!(ctrl.set_semitones(20.0), 12.0);
        assert_eq!(ctrl.pitch_factor(), 2.0);
        assert_eq!(ctrl.nudge_semitones(-30.0), -12.0);
        assert_eq!(ctrl.pitch_factor(), 0.5);
    }

    #[test]
    fn block_size_is_validated() {
        let mut ctrl = Controller::new();
        assert!(ctrl.set_block_size(1000).is_err());
        assert_eq!(ctrl.block_size(), DEFAULT_BLOCK_SIZE);
        ctrl.set_block_size(1024).unwrap();
        assert_eq!(ctrl.block_size(), 1024);
    }

    #[test]
    fn render_without_clip_fails() {
        let ctrl = Controller::new();
        assert!(matches!(ctrl.render(), Err(Error::NoClip)));
    }

    #[test]
    fn render_keeps_clip_shape() {
        let mut ctrl = Controller::new();
        ctrl.set_clip(tone_clip(10_000));
        ctrl.set_semitones(5.0);
        let out = ctrl.render().unwrap();
        assert_eq!(out.sample_rate, 44100);
        assert_eq!(out.channels(), 1);
        assert_eq!(out.audio.frames(), 10_000);
        assert!(out.audio.peak() > 0.0);
    }

    #[test]
    fn render_to_wav_produces_riff() {
        let mut ctrl = Controller::new();
        ctrl.set_clip(tone_clip(2048));
        let bytes = ctrl.render_to_wav().unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(bytes.len(), 44 + 2048 * 2);
    }

    #[test]
    fn idle_controller_reports_no_position() {
        let ctrl = Controller::new();
        assert!(!ctrl.is_playing());
        assert!(!ctrl.is_finished());
        assert_eq!(ctrl.position(), None);
    }
}
