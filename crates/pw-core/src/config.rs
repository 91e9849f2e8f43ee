//! Engine construction parameters and their validation.

use thiserror::Error;

/// Maximum number of audio channels per engine.
pub const MAX_CHANNELS: u16 = 8;

/// Fixed host callback size in samples.
pub const QUANTUM_SIZE: usize = 128;

/// Default analysis/synthesis block length in samples.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Rejected engine construction.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("Engine needs at least one channel")]
    ZeroChannels,

    #[error("Too many channels: {0} (max {max})", max = MAX_CHANNELS)]
    TooManyChannels(u16),

    #[error("Quantum size must be positive")]
    ZeroQuantum,

    #[error("Block size must be positive")]
    ZeroBlock,

    #[error("Block size {block} is not a multiple of quantum size {quantum}")]
    BlockNotMultiple { block: usize, quantum: usize },

    #[error("Channel mismatch: {inputs} inputs, {outputs} outputs")]
    ChannelMismatch { inputs: u16, outputs: u16 },

    #[error("Source has {source_channels} channels, engine expects {engine}")]
    SourceChannels { source_channels: u16, engine: u16 },

    #[error("Pitch factor must be finite and positive, got {0}")]
    InvalidPitchFactor(f32),
}

/// Channel configuration for a quantum processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    pub inputs: u16,
    pub outputs: u16,
}

impl ChannelConfig {
    /// Symmetric layout with `channels` in and out.
    pub const fn symmetric(channels: u16) -> Self {
        Self { inputs: channels, outputs: channels }
    }
}

/// Fixed-at-construction engine shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub channels: ChannelConfig,
    /// Host quantum length Q.
    pub quantum_size: usize,
    /// Analysis/synthesis block length B.
    pub block_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channels: ChannelConfig::symmetric(2),
            quantum_size: QUANTUM_SIZE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = ChannelConfig::symmetric(channels);
        self
    }

    pub fn with_channel_config(mut self, channels: ChannelConfig) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_quantum_size(mut self, quantum_size: usize) -> Self {
        self.quantum_size = quantum_size;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Number of channels processed (inputs and outputs are equal once validated).
    pub fn num_channels(&self) -> u16 {
        self.channels.inputs
    }

    /// Quanta per block, `B / Q`.
    pub fn quanta_per_block(&self) -> usize {
        self.block_size / self.quantum_size.max(1)
    }

    /// Samples of silence emitted before the first transformed audio, `B - Q`.
    pub fn latency(&self) -> usize {
        self.block_size.saturating_sub(self.quantum_size)
    }

    /// Check every construction precondition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ChannelConfig { inputs, outputs } = self.channels;
        if inputs != outputs {
            return Err(ConfigError::ChannelMismatch { inputs, outputs });
        }
        if inputs == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if inputs > MAX_CHANNELS {
            return Err(ConfigError::TooManyChannels(inputs));
        }
        if self.quantum_size == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlock);
        }
        if self.block_size % self.quantum_size != 0 {
            return Err(ConfigError::BlockNotMultiple {
                block: self.block_size,
                quantum: self.quantum_size,
            });
        }
        Ok(())
    }
}
