//! Multichannel f32 audio buffer with planar layout.

use alloc::vec;
use alloc::vec::Vec;

/// A multichannel f32 audio buffer in planar layout.
///
/// Data is stored as `channels` contiguous planes of `frames` samples each.
/// `data[ch * frames + frame]` gives the sample for channel `ch` at `frame`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBuffer {
    data: Vec<f32>,
    channels: u16,
    frames: usize,
}

impl AudioBuffer {
    /// Create a new silent buffer with the given dimensions.
    pub fn new(channels: u16, frames: usize) -> Self {
        Self {
            data: vec![0.0; channels as usize * frames],
            channels,
            frames,
        }
    }

    /// Build a planar buffer from interleaved samples.
    ///
    /// Trailing samples that do not fill a whole frame are dropped.
    pub fn from_interleaved(samples: &[f32], channels: u16) -> Self {
        let chs = channels as usize;
        let frames = if chs == 0 { 0 } else { samples.len() / chs };
        let mut buf = Self::new(channels, frames);
        for (frame, chunk) in samples.chunks_exact(chs.max(1)).take(frames).enumerate() {
            for (ch, &s) in chunk.iter().enumerate() {
                buf.data[ch * frames + frame] = s;
            }
        }
        buf
    }

    /// Fill all samples with zero.
    pub fn silence(&mut self) {
        self.data.fill(0.0);
    }

    /// Number of channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Read-only access to one channel's sample data.
    pub fn channel(&self, ch: u16) -> &[f32] {
        let start = ch as usize * self.frames;
        &self.data[start..start + self.frames]
    }

    /// Mutable access to one channel's sample data.
    pub fn channel_mut(&mut self, ch: u16) -> &mut [f32] {
        let start = ch as usize * self.frames;
        let len = self.frames;
        &mut self.data[start..start + len]
    }

    /// Iterate over every channel plane in order.
    pub fn planes(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.frames.max(1)).take(self.channels as usize)
    }

    /// Iterate mutably over every channel plane in order.
    pub fn planes_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        let chs = self.channels as usize;
        self.data.chunks_exact_mut(self.frames.max(1)).take(chs)
    }

    /// Copy `self.frames()` frames out of `source` starting at `offset`.
    ///
    /// Frames past the end of `source` read as silence, and channels beyond
    /// `source.channels()` are cleared. Never allocates.
    pub fn copy_window(&mut self, source: &AudioBuffer, offset: usize) {
        let avail = source.frames.saturating_sub(offset).min(self.frames);
        for ch in 0..self.channels {
            let dst = self.channel_mut(ch);
            if ch < source.channels {
                let src = source.channel(ch);
                dst[..avail].copy_from_slice(&src[offset..offset + avail]);
                dst[avail..].fill(0.0);
            } else {
                dst.fill(0.0);
            }
        }
    }

    /// Write `frames` frames of this buffer into `dest` starting at `offset`.
    ///
    /// Frames that would land past the end of `dest` are discarded.
    pub fn write_into(&self, dest: &mut AudioBuffer, offset: usize) {
        let avail = dest.frames.saturating_sub(offset).min(self.frames);
        let chs = self.channels.min(dest.channels);
        for ch in 0..chs {
            let src = &self.channel(ch)[..avail];
            dest.channel_mut(ch)[offset..offset + avail].copy_from_slice(src);
        }
    }

    /// Interleave frame `frame` into `out`, one sample per channel.
    pub fn read_frame(&self, frame: usize, out: &mut [f32]) {
        for (ch, slot) in out.iter_mut().enumerate().take(self.channels as usize) {
            *slot = self.data[ch * self.frames + frame];
        }
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.data.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_silent() {
        let buf = AudioBuffer::new(2, 4);
        assert_eq!(buf.channels(), 2);
        assert_eq!(buf.frames(), 4);
        assert!(buf.channel(0).iter().all(|&s| s == 0.0));
        assert!(buf.channel(1).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn channel_mut_writes_correctly() {
        let mut buf = AudioBuffer::new(2, 2);
        buf.channel_mut(0)[0] = 1.0;
        buf.channel_mut(1)[1] = -0.5;
        assert_eq!(buf.channel(0), &[1.0, 0.0]);
        assert_eq!(buf.channel(1), &[0.0, -0.5]);
    }

    #[test]
    fn silence_clears_data() {
        let mut buf = AudioBuffer::new(1, 2);
        buf.channel_mut(0)[0] = 1.0;
        buf.silence();
        assert_eq!(buf.channel(0), &[0.0, 0.0]);
    }

    #[test]
    fn from_interleaved_splits_planes() {
        let buf = AudioBuffer::from_interleaved(&[1.0, -1.0, 2.0, -2.0, 3.0], 2);
        assert_eq!(buf.frames(), 2);
        assert_eq!(buf.channel(0), &[1.0, 2.0]);
        assert_eq!(buf.channel(1), &[-1.0, -2.0]);
    }

    #[test]
    fn copy_window_zero_pads_past_end() {
        let src = AudioBuffer::from_interleaved(&[1.0, 2.0, 3.0], 1);
        let mut dst = AudioBuffer::new(2, 4);
        dst.channel_mut(1)[0] = 9.0;
        dst.copy_window(&src, 1);
        assert_eq!(dst.channel(0), &[2.0, 3.0, 0.0, 0.0]);
        // Channel missing from the source is cleared
        assert_eq!(dst.channel(1), &[0.0; 4]);
    }

    #[test]
    fn write_into_truncates_at_destination_end() {
        let mut quantum = AudioBuffer::new(1, 3);
        quantum.channel_mut(0).copy_from_slice(&[1.0, 2.0, 3.0]);
        let mut dest = AudioBuffer::new(1, 4);
        quantum.write_into(&mut dest, 2);
        assert_eq!(dest.channel(0), &[0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn read_frame_interleaves() {
        let buf = AudioBuffer::from_interleaved(&[0.1, 0.2, 0.3, 0.4], 2);
        let mut out = [0.0; 2];
        buf.read_frame(1, &mut out);
        assert_eq!(out, [0.3, 0.4]);
    }

    #[test]
    fn peak_spans_all_channels() {
        let mut buf = AudioBuffer::new(2, 1);
        buf.channel_mut(0)[0] = 0.5;
        buf.channel_mut(1)[0] = -0.75;
        assert_eq!(buf.peak(), 0.75);
    }

    #[test]
    fn planes_yield_each_channel() {
        let mut buf = AudioBuffer::new(3, 2);
        for (i, plane) in buf.planes_mut().enumerate() {
            plane.fill(i as f32);
        }
        let sums: Vec<f32> = buf.planes().map(|p| p.iter().sum()).collect();
        assert_eq!(sums, vec![0.0, 2.0, 4.0]);
    }
}
