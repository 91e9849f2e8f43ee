//! Host wrapper binding a quantum processor to the pitch parameter channel.

use arrayvec::ArrayVec;
use pw_core::{validate_pitch_factor, AudioBuffer, ConfigError, EngineConfig, MAX_CHANNELS};

use crate::engine::BlockEngine;
use crate::node::QuantumProcessor;
use crate::param::PitchReader;

const MAX_PLANES: usize = MAX_CHANNELS as usize;

/// A processor plus the audio-side end of the pitch channel.
///
/// Owns everything the audio thread touches; build it on the control
/// thread and move it into the callback.
pub struct PitchNode<P: QuantumProcessor = BlockEngine> {
    processor: P,
    pitch: PitchReader,
}

impl PitchNode {
    /// Validate `config` and the channel's current factor, then build a
    /// node around a fresh [`BlockEngine`].
    pub fn new(config: EngineConfig, pitch: PitchReader) -> Result<Self, ConfigError> {
        Self::with_processor(BlockEngine::new(config)?, pitch)
    }
}

impl<P: QuantumProcessor> PitchNode<P> {
    /// Fails if the channel holds a factor the transform cannot use. Later
    /// writes go through [`PitchWriter::set`](crate::PitchWriter::set), which
    /// refuses the same values.
    pub fn with_processor(processor: P, pitch: PitchReader) -> Result<Self, ConfigError> {
        validate_pitch_factor(pitch.get())?;
        Ok(Self { processor, pitch })
    }

    /// Run one quantum from `input` into `output`.
    ///
    /// Both buffers must be `quantum_size` frames long with the processor's
    /// channel count. The pitch factor is sampled once per call.
    pub fn process_quantum(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        #[cfg(feature = "alloc_check")]
        {
            assert_no_alloc::assert_no_alloc(|| self.process_planes(input, output))
        }
        #[cfg(not(feature = "alloc_check"))]
        {
            self.process_planes(input, output)
        }
    }

    fn process_planes(&mut self, input: &AudioBuffer, output: &mut AudioBuffer) {
        debug_assert_eq!(input.frames(), self.processor.quantum_size());
        debug_assert_eq!(output.frames(), self.processor.quantum_size());

        let params = [self.pitch.get()];
        let inputs: ArrayVec<&[f32], MAX_PLANES> = input.planes().take(MAX_PLANES).collect();
        let mut outputs: ArrayVec<&mut [f32], MAX_PLANES> =
            output.planes_mut().take(MAX_PLANES).collect();
        self.processor.process(&inputs, &mut outputs, &params);
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    pub fn quantum_size(&self) -> usize {
        self.processor.quantum_size()
    }

    pub fn latency(&self) -> usize {
        self.processor.latency()
    }

    /// Current value on the pitch channel.
    pub fn pitch_factor(&self) -> f32 {
        self.pitch.get()
    }
}
