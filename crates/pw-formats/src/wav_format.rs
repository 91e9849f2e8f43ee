//! WAV encoding and decoding for planar f32 audio.

use std::io::{Cursor, Seek, SeekFrom, Write};

use binrw::{BinRead, BinWrite};
use pw_core::AudioBuffer;

use crate::FormatError;

const FORMAT_PCM: u16 = 1;
const FORMAT_IEEE_FLOAT: u16 = 3;

/// Decoded audio plus the rate it was recorded at.
#[derive(Clone, Debug, PartialEq)]
pub struct WavData {
    pub sample_rate: u32,
    pub audio: AudioBuffer,
}

impl WavData {
    pub fn new(sample_rate: u32, audio: AudioBuffer) -> Self {
        Self { sample_rate, audio }
    }

    pub fn channels(&self) -> u16 {
        self.audio.channels()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.audio.frames() as f64 / self.sample_rate as f64
    }
}

#[derive(BinRead, BinWrite, Debug)]
#[brw(little)]
struct RiffHeader {
    riff: [u8; 4],
    size: u32,
    wave: [u8; 4],
}

#[derive(BinRead, BinWrite, Debug)]
#[brw(little)]
struct ChunkHeader {
    id: [u8; 4],
    size: u32,
}

#[derive(BinRead, BinWrite, Debug, Clone, Copy)]
#[brw(little)]
struct FmtChunk {
    format: u16,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
}

// --- Reading ---

/// Decode a RIFF/WAVE file: PCM 8/16-bit or IEEE float 32-bit, mono or stereo.
pub fn load_wav(data: &[u8]) -> Result<WavData, FormatError> {
    let mut cur = Cursor::new(data);
    let riff = RiffHeader::read(&mut cur)?;
    if &riff.riff != b"RIFF" || &riff.wave != b"WAVE" {
        return Err(FormatError::InvalidHeader);
    }

    let mut fmt: Option<FmtChunk> = None;
    let mut pcm: Option<&[u8]> = None;

    while (cur.position() as usize) + 8 <= data.len() {
        let chunk = ChunkHeader::read(&mut cur)?;
        let start = cur.position() as usize;
        let size = chunk.size as usize;

        match &chunk.id {
            b"fmt " if size >= 16 => fmt = Some(FmtChunk::read(&mut cur)?),
            b"data" => {
                let end = start.saturating_add(size).min(data.len());
                pcm = Some(&data[start..end]);
            }
            _ => {}
        }

        // Chunks are word aligned
        let next = start.saturating_add(size).saturating_add(size & 1);
        cur.seek(SeekFrom::Start(next as u64))?;
    }

    let fmt = fmt.ok_or(FormatError::InvalidHeader)?;
    let pcm = pcm.ok_or(FormatError::InvalidHeader)?;
    if !(1..=2).contains(&fmt.channels) {
        return Err(FormatError::UnsupportedFormat {
            format: fmt.format,
            bits: fmt.bits_per_sample,
            channels: fmt.channels,
        });
    }

    let interleaved = decode_samples(pcm, &fmt)?;
    Ok(WavData {
        sample_rate: fmt.sample_rate,
        audio: AudioBuffer::from_interleaved(&interleaved, fmt.channels),
    })
}

fn decode_samples(raw: &[u8], fmt: &FmtChunk) -> Result<Vec<f32>, FormatError> {
    match (fmt.format, fmt.bits_per_sample) {
        // 8-bit WAV is unsigned, centred on 128
        (FORMAT_PCM, 8) => Ok(raw.iter().map(|&b| (b as f32 - 128.0) / 128.0).collect()),
        (FORMAT_PCM, 16) => Ok(raw
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]) as f32 / 32768.0)
            .collect()),
        (FORMAT_IEEE_FLOAT, 32) => Ok(raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()),
        _ => Err(FormatError::UnsupportedFormat {
            format: fmt.format,
            bits: fmt.bits_per_sample,
            channels: fmt.channels,
        }),
    }
}

// --- Writing ---

/// Encode as 16-bit PCM. Samples outside [-1, 1] are clamped.
pub fn write_wav<W: Write + Seek>(w: &mut W, wav: &WavData) -> Result<(), FormatError> {
    let channels = wav.audio.channels();
    let bits_per_sample: u16 = 16;
    let block_align = channels * (bits_per_sample / 8);
    let data_size = data_chunk_size(wav.audio.frames(), block_align)?;
    let byte_rate = wav
        .sample_rate
        .checked_mul(block_align as u32)
        .ok_or(FormatError::TooLarge)?;

    RiffHeader { riff: *b"RIFF", size: 36 + data_size, wave: *b"WAVE" }.write(w)?;
    ChunkHeader { id: *b"fmt ", size: 16 }.write(w)?;
    FmtChunk {
        format: FORMAT_PCM,
        channels,
        sample_rate: wav.sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
    }
    .write(w)?;
    ChunkHeader { id: *b"data", size: data_size }.write(w)?;

    let mut frame = vec![0.0f32; channels as usize];
    for i in 0..wav.audio.frames() {
        wav.audio.read_frame(i, &mut frame);
        for &s in &frame {
            w.write_all(&to_i16(s).to_le_bytes())?;
        }
    }
    Ok(())
}

/// Size of the `data` chunk, leaving room for the 36 header bytes the RIFF
/// size field also counts.
fn data_chunk_size(frames: usize, block_align: u16) -> Result<u32, FormatError> {
    u32::try_from(frames)
        .ok()
        .and_then(|f| f.checked_mul(block_align as u32))
        .filter(|&size| size <= u32::MAX - 36)
        .ok_or(FormatError::TooLarge)
}

/// Encode to an in-memory 16-bit PCM WAV file.
pub fn wav_to_bytes(wav: &WavData) -> Result<Vec<u8>, FormatError> {
    let mut cur = Cursor::new(Vec::new());
    write_wav(&mut cur, wav)?;
    Ok(cur.into_inner())
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}
