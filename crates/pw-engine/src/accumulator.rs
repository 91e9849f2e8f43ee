//! Input side: absorbs host quanta into the ring-buffered analysis block.

use pw_core::AudioBuffer;

/// Ring buffer of one analysis block per channel.
///
/// Every channel shares the same write cursor and fill level; the host
/// writes all channels of a quantum, then calls [`advance`](Self::advance)
/// once.
pub struct QuantumAccumulator {
    blocks: AudioBuffer,
    quantum: usize,
    cursor: usize,
    fill: usize,
}

impl QuantumAccumulator {
    pub fn new(channels: u16, block_size: usize, quantum: usize) -> Self {
        Self {
            blocks: AudioBuffer::new(channels, block_size),
            quantum,
            cursor: 0,
            fill: 0,
        }
    }

    /// Copy one quantum into `channel`'s block at the write cursor.
    ///
    /// Samples outside the quantum are left as they are, so a block fills
    /// up across invocations.
    #[inline]
    pub fn write(&mut self, channel: u16, quantum: &[f32]) {
        let q = self.quantum;
        let start = self.cursor;
        self.blocks.channel_mut(channel)[start..start + q].copy_from_slice(&quantum[..q]);
    }

    /// Commit the quantum written to every channel: cursor moves by Q
    /// (modulo B) and the fill level grows by Q.
    #[inline]
    pub fn advance(&mut self) {
        let len = self.blocks.frames();
        self.cursor = (self.cursor + self.quantum) % len;
        self.fill = (self.fill + self.quantum).min(len);
    }

    /// True once a full block of samples has accumulated.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.fill >= self.blocks.frames()
    }

    /// Give back `hop` samples of fill after a transform.
    #[inline]
    pub fn consume(&mut self, hop: usize) {
        self.fill = self.fill.saturating_sub(hop);
    }

    /// The analysis block for `channel`, in ring order (not rotated).
    pub fn block(&self, channel: u16) -> &[f32] {
        self.blocks.channel(channel)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Clear samples, cursor and fill level.
    pub fn reset(&mut self) {
        self.blocks.silence();
        self.cursor = 0;
        self.fill = 0;
    }
}
