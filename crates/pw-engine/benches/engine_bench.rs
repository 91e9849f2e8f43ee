//! Per-quantum cost of the block engine.
//!
//! Once warm, the engine transforms a whole block on every quantum, so the
//! budget that matters is `quantum_size / sample_rate` (2.67 ms for 128
//! samples at 48 kHz) against one full block transform per channel.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pw_core::{EngineConfig, QUANTUM_SIZE};
use pw_engine::{BlockEngine, PitchTransform, WindowedResampler};

const BLOCK_SIZES: [usize; 4] = [512, 1024, 2048, 4096];

fn warm_engine(block_size: usize, channels: u16) -> BlockEngine {
    let config = EngineConfig::default()
        .with_channels(channels)
        .with_block_size(block_size);
    let mut engine = BlockEngine::new(config).unwrap();
    let input = [0.25f32; QUANTUM_SIZE];
    let mut outputs = vec![[0.0f32; QUANTUM_SIZE]; channels as usize];
    let inputs: Vec<&[f32]> = (0..channels).map(|_| &input[..]).collect();
    for _ in 0..block_size / QUANTUM_SIZE {
        let mut outs: Vec<&mut [f32]> = outputs.iter_mut().map(|o| &mut o[..]).collect();
        engine.process(&inputs, &mut outs, &[1.2]);
    }
    engine
}

fn bench_process_quantum(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_quantum_stereo");
    group.throughput(Throughput::Elements(QUANTUM_SIZE as u64));

    for &block in &BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(block), &block, |b, &block| {
            let mut engine = warm_engine(block, 2);
            let input: Vec<f32> = (0..QUANTUM_SIZE).map(|i| (i as f32 * 0.05).sin()).collect();
            let mut out_l = [0.0f32; QUANTUM_SIZE];
            let mut out_r = [0.0f32; QUANTUM_SIZE];
            b.iter(|| {
                engine.process(
                    black_box(&[&input[..], &input[..]][..]),
                    &mut [&mut out_l[..], &mut out_r[..]],
                    black_box(&[0.8f32][..]),
                );
                black_box(out_l[0]);
            });
        });
    }
    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed_resampler");
    for &block in &BLOCK_SIZES {
        group.throughput(Throughput::Elements(block as u64));
        group.bench_with_input(BenchmarkId::from_parameter(block), &block, |b, &block| {
            let mut t = WindowedResampler::new(block);
            let input: Vec<f32> = (0..block).map(|i| (i as f32 * 0.01).sin()).collect();
            let mut output = vec![0.0f32; block];
            b.iter(|| {
                t.transform(black_box(&input), &mut output, black_box(1.5));
                black_box(output[block / 2]);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_process_quantum, bench_transform);
criterion_main!(benches);
