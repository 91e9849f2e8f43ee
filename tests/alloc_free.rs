//! Allocation-free processing path tests.
//!
//! These tests verify that `BlockEngine::process()` and
//! `PitchNode::process_quantum()` do not allocate once constructed. They run
//! several seconds of audio through the engine, across warm-up, the first
//! transform, and live pitch changes.
//!
//! Just run `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use pw_core::{AudioBuffer, EngineConfig, QUANTUM_SIZE};
use pw_engine::{pitch_channel, BlockEngine, PitchNode};

const SAMPLE_RATE: usize = 48000;

fn sine(frames: usize, freq: f32) -> Vec<f32> {
    (0..frames)
        .map(|i| (i as f32 * freq * std::f32::consts::TAU / SAMPLE_RATE as f32).sin())
        .collect()
}

/// Run `quanta` quanta through a stereo engine, aborting on any heap allocation.
fn assert_engine_alloc_free(block_size: usize, factors: &[f32], quanta: usize) {
    let config = EngineConfig::default().with_block_size(block_size);
    let mut engine = BlockEngine::new(config).unwrap();
    let left = sine(QUANTUM_SIZE, 440.0);
    let right = sine(QUANTUM_SIZE, 660.0);
    let mut out_l = vec![0.0f32; QUANTUM_SIZE];
    let mut out_r = vec![0.0f32; QUANTUM_SIZE];

    assert_no_alloc(|| {
        for n in 0..quanta {
            let factor = &factors[n % factors.len()..][..1];
            engine.process(
                &[&left[..], &right[..]],
                &mut [&mut out_l[..], &mut out_r[..]],
                factor,
            );
        }
    });
    assert!(engine.blocks_processed() > 0);
}

#[test]
fn engine_default_block_alloc_free() {
    assert_engine_alloc_free(4096, &[1.0], SAMPLE_RATE * 5 / QUANTUM_SIZE);
}

#[test]
fn engine_changing_factor_alloc_free() {
    assert_engine_alloc_free(1024, &[0.5, 0.75, 1.0, 1.5, 2.0], SAMPLE_RATE * 2 / QUANTUM_SIZE);
}

#[test]
fn engine_block_equals_quantum_alloc_free() {
    assert_engine_alloc_free(QUANTUM_SIZE, &[1.25], 1000);
}

#[test]
fn pitch_node_alloc_free() {
    let (writer, reader) = pitch_channel(1.0);
    let mut node = PitchNode::new(EngineConfig::default().with_block_size(2048), reader).unwrap();
    let clip = AudioBuffer::from_interleaved(&sine(SAMPLE_RATE * 2, 220.0), 2);
    let mut input = AudioBuffer::new(2, QUANTUM_SIZE);
    let mut output = AudioBuffer::new(2, QUANTUM_SIZE);

    assert_no_alloc(|| {
        let mut pos = 0;
        while pos < clip.frames() {
            if pos % 4096 == 0 {
                writer.set(if pos % 8192 == 0 { 0.5 } else { 2.0 }).unwrap();
            }
            input.copy_window(&clip, pos);
            node.process_quantum(&input, &mut output);
            pos += QUANTUM_SIZE;
        }
    });
    assert!(node.processor().blocks_processed() > 0);
}
