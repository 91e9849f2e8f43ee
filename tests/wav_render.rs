//! Integration test: WAV bytes → controller → shifted WAV bytes.

use pw_core::AudioBuffer;
use pw_formats::{load_wav, wav_to_bytes, WavData};
use pw_master::Controller;

const RATE: u32 = 44100;

fn sine_wav(channels: u16, seconds: f32, freq: f32) -> Vec<u8> {
    let frames = (RATE as f32 * seconds) as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let s = (i as f32 * freq * std::f32::consts::TAU / RATE as f32).sin() * 0.5;
        for ch in 0..channels {
            samples.push(if ch == 0 { s } else { -s });
        }
    }
    wav_to_bytes(&WavData::new(RATE, AudioBuffer::from_interleaved(&samples, channels))).unwrap()
}

fn render(data: &[u8], semitones: f64) -> WavData {
    let mut ctrl = Controller::new();
    ctrl.load_wav(data).unwrap();
    ctrl.set_semitones(semitones);
    let bytes = ctrl.render_to_wav().unwrap();
    load_wav(&bytes).unwrap()
}

#[test]
fn unshifted_render_is_audible() {
    let out = render(&sine_wav(1, 0.5, 440.0), 0.0);
    assert!(out.audio.peak() > 0.1, "peak {} too low", out.audio.peak());
}

#[test]
fn render_preserves_rate_length_and_channels() {
    let input = sine_wav(2, 0.25, 330.0);
    let original = load_wav(&input).unwrap();
    let out = render(&input, -3.0);
    assert_eq!(out.sample_rate, RATE);
    assert_eq!(out.channels(), 2);
    assert_eq!(out.audio.frames(), original.audio.frames());
}

#[test]
fn output_never_exceeds_input_peak() {
    // Both window passes have gain <= 1 and interpolation cannot overshoot
    for semitones in [-12.0, -7.0, 0.0, 4.0, 12.0] {
        let out = render(&sine_wav(1, 0.3, 220.0), semitones);
        assert!(out.audio.peak() <= 0.5 + 1e-3, "peak {} at {} st", out.audio.peak(), semitones);
    }
}

#[test]
fn shift_changes_the_output() {
    let input = sine_wav(1, 0.3, 440.0);
    let up = render(&input, 5.0);
    let down = render(&input, -5.0);
    assert_ne!(up.audio, down.audio);
}

#[test]
fn stereo_channels_stay_separate() {
    // Right is the negated left; the transform is linear per channel
    let out = render(&sine_wav(2, 0.3, 500.0), 2.0);
    for (l, r) in out.audio.channel(0).iter().zip(out.audio.channel(1)) {
        assert!((l + r).abs() < 1e-3);
    }
}

#[test]
fn silence_stays_silent() {
    let wav = wav_to_bytes(&WavData::new(RATE, AudioBuffer::new(1, 20_000))).unwrap();
    let out = render(&wav, 7.0);
    assert_eq!(out.audio.peak(), 0.0);
}

#[test]
fn smaller_block_is_still_valid() {
    let mut ctrl = Controller::new();
    ctrl.load_wav(&sine_wav(1, 0.2, 440.0)).unwrap();
    ctrl.set_block_size(1024).unwrap();
    let out = ctrl.render().unwrap();
    assert!(out.audio.peak() > 0.1);
}
