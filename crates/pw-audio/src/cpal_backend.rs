//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use pw_core::AudioBuffer;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::traits::{AudioError, AudioOutput};

/// CPAL-based audio output.
///
/// Samples travel from the producer thread to the device callback through
/// a lock-free ring buffer, already interleaved for the device layout.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<f32>,
    running: Arc<AtomicBool>,
    scratch: Vec<f32>,
}

impl CpalOutput {
    /// Open the default output device.
    pub fn new() -> Result<(Self, HeapCons<f32>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config: StreamConfig = device.default_output_config()?.into();

        let name = device.name().unwrap_or_default();
        tracing::info!(
            device = %name,
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "opened output device"
        );

        // About 100ms of audio
        let buffer_size = (config.sample_rate.0 as usize / 10) * config.channels as usize;
        let rb = HeapRb::<f32>::new(buffer_size);
        let (producer, consumer) = rb.split();

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
            scratch: Vec::new(),
        };

        Ok((output, consumer))
    }

    /// Build and start the audio stream.
    pub fn build_stream(&mut self, mut consumer: HeapCons<f32>) -> Result<(), AudioError> {
        let running = self.running.clone();

        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                if !running.load(Ordering::Relaxed) {
                    data.fill(0.0);
                    return;
                }
                for sample in data.iter_mut() {
                    *sample = consumer.try_pop().unwrap_or(0.0);
                }
            },
            |err| tracing::error!("Audio stream error: {}", err),
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Push interleaved samples, spinning until the ring buffer has room.
    fn push_spin(&mut self, samples_len: usize) {
        for i in 0..samples_len {
            let s = self.scratch[i];
            while self.producer.try_push(s).is_err() {
                std::hint::spin_loop();
            }
        }
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn channels(&self) -> u16 {
        self.config.channels
    }

    fn write_quantum(&mut self, quantum: &AudioBuffer) {
        let len = quantum.frames() * self.config.channels as usize;
        if self.scratch.len() < len {
            self.scratch.resize(len, 0.0);
        }
        interleave_into(quantum, self.config.channels, &mut self.scratch[..len]);
        self.push_spin(len);
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.play()?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.pause()?;
        }
        Ok(())
    }
}

/// Interleave a planar quantum for a device with `device_channels` outputs.
///
/// Device channel `c` plays source channel `c`. A mono source is copied to
/// every device channel; other missing channels are silent.
pub fn interleave_into(quantum: &AudioBuffer, device_channels: u16, out: &mut [f32]) {
    let src_channels = quantum.channels();
    let dc = device_channels as usize;
    for (frame, chunk) in out.chunks_exact_mut(dc.max(1)).take(quantum.frames()).enumerate() {
        for (c, slot) in chunk.iter_mut().enumerate() {
            let c = c as u16;
            *slot = if c < src_channels {
                quantum.channel(c)[frame]
            } else if src_channels == 1 {
                quantum.channel(0)[frame]
            } else {
                0.0
            };
        }
    }
}
