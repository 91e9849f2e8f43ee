//! Output side: hands out host quanta from the latest synthesis block.

use pw_core::AudioBuffer;

/// One synthesis block per channel, read back a quantum at a time.
///
/// The read cursor keeps moving even while nothing is available; quanta
/// requested with an empty fill level come out silent.
pub struct QuantumDrain {
    blocks: AudioBuffer,
    quantum: usize,
    cursor: usize,
    fill: usize,
}

impl QuantumDrain {
    pub fn new(channels: u16, block_size: usize, quantum: usize) -> Self {
        Self {
            blocks: AudioBuffer::new(channels, block_size),
            quantum,
            cursor: 0,
            fill: 0,
        }
    }

    /// Copy the quantum at the read cursor into `out`, or silence if the
    /// block has been used up.
    #[inline]
    pub fn read(&self, channel: u16, out: &mut [f32]) {
        let q = self.quantum;
        let out = &mut out[..q];
        if self.fill > 0 {
            let start = self.cursor;
            out.copy_from_slice(&self.blocks.channel(channel)[start..start + q]);
        } else {
            out.fill(0.0);
        }
    }

    /// Move past the quantum just read. Runs every invocation.
    #[inline]
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + self.quantum) % self.blocks.frames();
        self.fill = self.fill.saturating_sub(self.quantum);
    }

    /// Writable synthesis block for `channel`.
    pub fn block_mut(&mut self, channel: u16) -> &mut [f32] {
        self.blocks.channel_mut(channel)
    }

    pub fn block(&self, channel: u16) -> &[f32] {
        self.blocks.channel(channel)
    }

    /// Publish a freshly transformed block: the whole block becomes readable.
    #[inline]
    pub fn mark_full(&mut self) {
        self.fill = self.blocks.frames();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn fill(&self) -> usize {
        self.fill
    }

    pub fn reset(&mut self) {
        self.blocks.silence();
        self.cursor = 0;
        self.fill = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_drain_emits_silence_and_still_advances() {
        let mut drain = QuantumDrain::new(1, 4, 2);
        let mut out = [9.0f32; 2];
        drain.read(0, &mut out);
        drain.advance();
        assert_eq!(out, [0.0, 0.0]);
        assert_eq!(drain.cursor(), 2);
        assert_eq!(drain.fill(), 0);
    }

    #[test]
    fn reads_from_cursor_after_refill() {
        let mut drain = QuantumDrain::new(1, 4, 2);
        drain.block_mut(0).copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        drain.advance();
        drain.mark_full();

        let mut out = [0.0f32; 2];
        drain.read(0, &mut out);
        assert_eq!(out, [3.0, 4.0]);
        drain.advance();
        assert_eq!(drain.cursor(), 0);
        assert_eq!(drain.fill(), 2);

        drain.read(0, &mut out);
        assert_eq!(out, [1.0, 2.0]);
    }

    #[test]
    fn fill_floors_at_zero() {
        let mut drain = QuantumDrain::new(1, 4, 2);
        drain.mark_full();
        for _ in 0..10 {
            drain.advance();
        }
        assert_eq!(drain.fill(), 0);
        let mut out = [1.0f32; 2];
        drain.read(0, &mut out);
        assert_eq!(out, [0.0, 0.0]);
    }
}
