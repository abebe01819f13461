//! Raw PCM WAV decoding.
//!
//! Only integer PCM is understood. The `fmt ` fields are read from their fixed
//! offsets in the canonical 44-byte header, then the chunk list is walked from
//! byte 12 until a `data` chunk turns up.

use thiserror::Error;
use tracing::debug;

/// Smallest blob that can hold a canonical RIFF/WAVE header.
pub const MIN_HEADER_LEN: usize = 44;

const CHANNELS_OFFSET: usize = 22;
const SAMPLE_RATE_OFFSET: usize = 24;
const BITS_PER_SAMPLE_OFFSET: usize = 34;
const FIRST_CHUNK_OFFSET: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// Reasons a blob could not be turned into PCM.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Blob too short or header fields unusable.
    #[error("malformed wav header: {0}")]
    MalformedHeader(String),
    /// Chunk walk ran off the end without seeing `data`.
    #[error("data chunk not found")]
    DataChunkNotFound,
    /// Integer PCM other than 8/16/24/32 bits.
    #[error("unsupported bit depth: {0}-bit (supported: 8, 16, 24, 32)")]
    UnsupportedBitDepth(u16),
}

/// Format metadata read from the `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    /// Frames per second.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
    /// Bit depth of the source encoding.
    pub bits_per_sample: u16,
}

/// Decoded, normalized, channel-interleaved samples in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    format: PcmFormat,
    samples: Vec<f32>,
}

impl PcmBuffer {
    /// Wrap already-normalized samples.
    pub fn new(format: PcmFormat, samples: Vec<f32>) -> Self {
        Self { format, samples }
    }

    /// Source format.
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        match self.format.channels {
            0 => 0,
            channels => self.samples.len() / channels as usize,
        }
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.format.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.format.sample_rate as f32
    }
}

/// Decode a WAV blob into normalized PCM.
pub fn decode_wav(bytes: &[u8]) -> Result<PcmBuffer, DecodeError> {
    if bytes.len() < MIN_HEADER_LEN {
        return Err(DecodeError::MalformedHeader(format!(
            "{} bytes, need at least {MIN_HEADER_LEN}",
            bytes.len()
        )));
    }

    let format = PcmFormat {
        channels: read_u16(bytes, CHANNELS_OFFSET),
        sample_rate: read_u32(bytes, SAMPLE_RATE_OFFSET),
        bits_per_sample: read_u16(bytes, BITS_PER_SAMPLE_OFFSET),
    };
    if format.channels == 0 {
        return Err(DecodeError::MalformedHeader("zero channels".to_string()));
    }

    debug!(
        sample_rate = format.sample_rate,
        channels = format.channels,
        bits = format.bits_per_sample,
        "decoding wav"
    );

    let (start, declared_len) = find_data_chunk(bytes)?;
    let available = bytes.len() - start;
    if declared_len > available {
        debug!(declared_len, available, "data chunk truncated, decoding what is present");
    }
    let data = &bytes[start..start + declared_len.min(available)];

    let samples: Vec<f32> = match format.bits_per_sample {
        8 => data.iter().map(|&b| (b as f32 - 128.0) / 128.0).collect(),
        16 => data
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]) as f32 / 32_768.0)
            .collect(),
        24 => data
            .chunks_exact(3)
            .map(|c| {
                // Place the 3 bytes high, then shift back down to sign-extend bit 23.
                let value = i32::from_le_bytes([0, c[0], c[1], c[2]]) >> 8;
                value as f32 / 8_388_608.0
            })
            .collect(),
        32 => data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f32 / 2_147_483_648.0)
            .collect(),
        other => return Err(DecodeError::UnsupportedBitDepth(other)),
    };

    Ok(PcmBuffer::new(format, samples))
}

/// Walk the chunk list and return `(payload offset, declared payload size)` of `data`.
fn find_data_chunk(bytes: &[u8]) -> Result<(usize, usize), DecodeError> {
    let mut pos = FIRST_CHUNK_OFFSET;
    while pos
        .checked_add(CHUNK_HEADER_LEN)
        .is_some_and(|end| end <= bytes.len())
    {
        let size = read_u32(bytes, pos + 4) as usize;
        if &bytes[pos..pos + 4] == b"data" {
            return Ok((pos + CHUNK_HEADER_LEN, size));
        }
        pos = match pos.checked_add(CHUNK_HEADER_LEN + size) {
            Some(next) => next,
            None => break,
        };
    }
    Err(DecodeError::DataChunkNotFound)
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
