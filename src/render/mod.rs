//! Waveform assembly: baked words into one continuous WAV.
//!
//! Each baked word becomes a segment (synthesized or silence), voiced
//! segments get short fades at internal joins, and the segments are
//! concatenated in order. Fades change sample values, never lengths.

pub mod fade;
pub mod wav;

pub use fade::Segment;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::bake::{BakedWord, PlaybackInstance};
use crate::config::VoiceConfig;
use crate::error::{VoiceError, VoiceResult};
use crate::synth::Synthesizer;

/// Renders baked sequences through a [`Synthesizer`].
pub struct Assembler<S: Synthesizer> {
    synth: S,
    fade_ms: f64,
    bits_per_sample: u16,
}

impl<S: Synthesizer> Assembler<S> {
    pub fn new(synth: S, fade_ms: f64, bits_per_sample: u16) -> Self {
        Self {
            synth,
            fade_ms,
            bits_per_sample,
        }
    }

    pub fn from_config(synth: S, config: &VoiceConfig) -> Self {
        Self::new(synth, config.fade_ms, config.bits_per_sample)
    }

    pub fn sample_rate(&self) -> u32 {
        self.synth.sample_rate()
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// Samples for a silence of `duration_ms`.
    pub fn wait_len(&self, duration_ms: f64) -> usize {
        (self.sample_rate() as f64 * duration_ms / 1000.0).round().max(0.0) as usize
    }

    /// Synthesize one segment per word, then fade the joins.
    ///
    /// Words holding the same `Arc` instance are synthesized once and copied.
    /// Instance ids are only unique per context, so they are not used as keys.
    pub fn render_segments(&mut self, baked: &[BakedWord]) -> VoiceResult<Vec<Segment>> {
        let mut rendered: HashMap<*const PlaybackInstance, Vec<f32>> = HashMap::new();
        let mut segments = Vec::with_capacity(baked.len());

        for word in baked {
            let segment = match word.instance.as_ref() {
                PlaybackInstance::Wait { duration_ms } => Segment::silence(self.wait_len(*duration_ms)),
                PlaybackInstance::Baked { symbol, params, .. } => {
                    let key = Arc::as_ptr(&word.instance);
                    if let Some(samples) = rendered.get(&key) {
                        Segment::voiced(samples.clone())
                    } else {
                        let samples = self.synth.synthesize(params).map_err(|e| {
                            VoiceError::SynthesisFailure {
                                symbol: *symbol,
                                reason: e.to_string(),
                            }
                        })?;
                        if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
                            return Err(VoiceError::SynthesisFailure {
                                symbol: *symbol,
                                reason: format!("non-finite sample {bad}"),
                            });
                        }
                        debug!(word = %word.word(), samples = samples.len(), "synthesized");
                        rendered.insert(key, samples.clone());
                        Segment::voiced(samples)
                    }
                }
            };
            segments.push(segment);
        }

        let fade = fade::fade_len(self.sample_rate(), self.fade_ms);
        fade::fade_segments(&mut segments, fade);
        Ok(segments)
    }

    /// The faded, concatenated buffer at full scale.
    pub fn render_samples(&mut self, baked: &[BakedWord]) -> VoiceResult<Vec<f32>> {
        let segments = self.render_segments(baked)?;
        let total: usize = segments.iter().map(Segment::len).sum();
        let mut out = Vec::with_capacity(total);
        for segment in segments {
            out.extend_from_slice(&segment.samples);
        }
        Ok(out)
    }

    /// Encode samples as a WAV at this assembler's rate and depth.
    pub fn encode(&self, samples: &[f32]) -> VoiceResult<Vec<u8>> {
        wav::encode_wav(samples, self.sample_rate(), self.bits_per_sample)
    }

    /// Render a baked sequence into WAV bytes.
    pub fn render(&mut self, baked: &[BakedWord]) -> VoiceResult<Vec<u8>> {
        let samples = self.render_samples(baked)?;
        self.encode(&samples)
    }
}
