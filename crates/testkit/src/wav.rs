//! Synthetic WAV fixtures.
//!
//! Encoding goes through `hound` so decoder tests do not share code with the
//! decoder under test.

use anyhow::{bail, Result};
use std::io::Cursor;

/// Quantize `samples` (in `[-1, 1]`) to `bits`-bit integer PCM and wrap them in
/// a WAV container.
pub fn encode_wav(samples: &[f32], channels: u16, sample_rate: u32, bits: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            match bits {
                8 => writer.write_sample(quantize(sample, 8) as i8)?,
                16 => writer.write_sample(quantize(sample, 16) as i16)?,
                24 | 32 => writer.write_sample(quantize(sample, bits))?,
                other => bail!("cannot encode {other}-bit fixture"),
            }
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Largest decode error a `bits`-bit round trip may introduce.
pub fn quantization_step(bits: u16) -> f32 {
    1.0 / (1u64 << (bits - 1)) as f32
}

/// Interleaved sine wave, `frames` long, identical on every channel.
pub fn sine_samples(frames: usize, channels: u16, sample_rate: u32, freq: f32, amplitude: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(frames * channels as usize);
    for frame in 0..frames {
        let t = frame as f32 / sample_rate as f32;
        let value = amplitude * (t * freq * std::f32::consts::TAU).sin();
        for _ in 0..channels {
            out.push(value);
        }
    }
    out
}

fn quantize(sample: f32, bits: u16) -> i32 {
    let scale = (1i64 << (bits - 1)) as f64;
    let max = scale - 1.0;
    let value = (sample.clamp(-1.0, 1.0) as f64 * scale).round();
    value.clamp(-scale, max) as i32
}
