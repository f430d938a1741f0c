//! WAV container encoding via `hound`.

use std::io::Cursor;

use crate::error::{VoiceError, VoiceResult};

/// Bit depths the encoder accepts.
pub const SUPPORTED_BITS: [u16; 2] = [8, 16];

/// Convert a full-scale float sample to 8-bit signed PCM.
pub fn quantize_i8(sample: f32) -> i8 {
    (sample.clamp(-1.0, 1.0) * i8::MAX as f32).round() as i8
}

/// Convert a full-scale float sample to 16-bit signed PCM.
pub fn quantize_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Encode mono samples as an in-memory PCM WAV file.
///
/// Samples are clamped to `[-1.0, 1.0]`; no playback volume is applied.
pub fn encode_wav(samples: &[f32], sample_rate: u32, bits_per_sample: u16) -> VoiceResult<Vec<u8>> {
    if !SUPPORTED_BITS.contains(&bits_per_sample) {
        return Err(VoiceError::Config(format!(
            "unsupported bit depth {bits_per_sample}"
        )));
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };

    let mut buf = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut buf, spec)?;
    match bits_per_sample {
        8 => {
            for &s in samples {
                writer.write_sample(quantize_i8(s))?;
            }
        }
        _ => {
            for &s in samples {
                writer.write_sample(quantize_i16(s))?;
            }
        }
    }
    writer.finalize()?;
    Ok(buf.into_inner())
}
