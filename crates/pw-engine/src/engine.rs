//! Block orchestrator: quantum in, block transform, quantum out.

use pw_core::{ChannelConfig, ConfigError, EngineConfig, DEFAULT_PITCH_FACTOR};

use crate::accumulator::QuantumAccumulator;
use crate::drain::QuantumDrain;
use crate::node::{NodeInfo, ParamInfo, QuantumProcessor};
use crate::transform::{PitchTransform, WindowedResampler};

/// Id of the `pitchFactor` parameter.
pub const PITCH_FACTOR_PARAM: u16 = 0;

static INFO: NodeInfo = NodeInfo {
    name: "Block Pitch Shifter",
    short_name: "Pitch",
    params: &[ParamInfo {
        id: PITCH_FACTOR_PARAM,
        name: "pitchFactor",
        min: 0.5,
        max: 2.0,
        default: DEFAULT_PITCH_FACTOR,
    }],
};

/// The real-time pitch engine.
///
/// Each call to [`process`](Self::process) takes one quantum per channel,
/// and once a full block has accumulated, runs the transform over it. It
/// then hands back one quantum per channel from the latest synthesis block.
/// All buffers are allocated in the constructor.
///
/// After the first transform the input fill level only drops by one hop
/// (one quantum), so from then on a transform runs on every call.
pub struct BlockEngine<T: PitchTransform = WindowedResampler> {
    config: EngineConfig,
    accumulator: QuantumAccumulator,
    drain: QuantumDrain,
    transform: T,
    /// Fill released after each transform, `B / (B / Q)`.
    hop: usize,
    /// Factor used by the most recent transform
    last_factor: f32,
    blocks_processed: u64,
}

impl BlockEngine {
    /// Create an engine with the default windowed resampler.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_transform(config, WindowedResampler::new(config.block_size))
    }
}

impl<T: PitchTransform> BlockEngine<T> {
    /// Create an engine around a custom transform.
    pub fn with_transform(config: EngineConfig, transform: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let channels = config.num_channels();
        let overlaps = config.quanta_per_block();
        Ok(Self {
            config,
            accumulator: QuantumAccumulator::new(channels, config.block_size, config.quantum_size),
            drain: QuantumDrain::new(channels, config.block_size, config.quantum_size),
            transform,
            hop: config.block_size / overlaps,
            last_factor: DEFAULT_PITCH_FACTOR,
            blocks_processed: 0,
        })
    }

    /// Process one quantum.
    ///
    /// `inputs` and `outputs` hold one slice of at least `quantum_size`
    /// samples per channel. Only the last entry of `pitch_factor` is used;
    /// an empty slice means the default factor of 1.0.
    pub fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], pitch_factor: &[f32]) {
        let channels = self.config.num_channels();
        debug_assert_eq!(inputs.len(), channels as usize);
        debug_assert_eq!(outputs.len(), channels as usize);

        // 1. Accumulate
        for (ch, input) in (0..channels).zip(inputs) {
            self.accumulator.write(ch, input);
        }
        self.accumulator.advance();

        // 2. Transform when a block is ready
        if self.accumulator.is_full() {
            let factor = pitch_factor.last().copied().unwrap_or(DEFAULT_PITCH_FACTOR);
            for ch in 0..channels {
                self.transform.transform(
                    self.accumulator.block(ch),
                    self.drain.block_mut(ch),
                    factor,
                );
            }
            self.drain.mark_full();
            self.accumulator.consume(self.hop);
            self.last_factor = factor;
            self.blocks_processed += 1;
        }

        // 3. Drain
        for (ch, output) in (0..channels).zip(outputs.iter_mut()) {
            self.drain.read(ch, output);
        }
        self.drain.advance();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Most recent synthesis block for `channel`.
    pub fn synthesis(&self, channel: u16) -> &[f32] {
        self.drain.block(channel)
    }

    pub fn write_cursor(&self) -> usize {
        self.accumulator.cursor()
    }

    pub fn read_cursor(&self) -> usize {
        self.drain.cursor()
    }

    pub fn input_fill(&self) -> usize {
        self.accumulator.fill()
    }

    pub fn output_fill(&self) -> usize {
        self.drain.fill()
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Pitch factor applied by the most recent transform.
    pub fn last_factor(&self) -> f32 {
        self.last_factor
    }

    /// Number of transforms run since construction or the last reset.
    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed
    }

    /// Return to the freshly constructed state without reallocating.
    pub fn reset(&mut self) {
        self.accumulator.reset();
        self.drain.reset();
        self.transform.reset();
        self.last_factor = DEFAULT_PITCH_FACTOR;
        self.blocks_processed = 0;
    }
}

impl<T: PitchTransform> QuantumProcessor for BlockEngine<T> {
    fn info(&self) -> &NodeInfo {
        &INFO
    }

    fn channel_config(&self) -> ChannelConfig {
        self.config.channels
    }

    fn quantum_size(&self) -> usize {
        self.config.quantum_size
    }

    fn latency(&self) -> usize {
        self.config.latency()
    }

    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], params: &[f32]) {
        BlockEngine::<T>::process(self, inputs, outputs, params)
    }

    fn reset(&mut self) {
        BlockEngine::<T>::reset(self)
    }
}
