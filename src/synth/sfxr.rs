//! sfxr-style synthesizer.
//!
//! 8× supersampled oscillator with frequency slide, vibrato, a single
//! arpeggio step, duty sweep, repeat restart, resonant low-pass, high-pass
//! and a phaser, shaped by a [`StageEnvelope`]. Noise uses a seeded
//! `ChaCha8Rng`, so a given seed reproduces its output.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::bake::{ParamKey, SynthParams};

use super::envelope::StageEnvelope;
use super::oscillator::{oscillator, WaveShape};
use super::{SynthesisError, Synthesizer, SFXR_SAMPLE_RATE};

const SUPERSAMPLE: u32 = 8;
const PHASER_LEN: usize = 1024;
const NOISE_LEN: usize = 32;

/// Pitch state. Rebuilt from the parameters on every repeat restart.
#[derive(Debug, Clone)]
struct Pitch {
    period: f64,
    max_period: f64,
    slide: f64,
    delta_slide: f64,
    duty: f64,
    duty_slide: f64,
    arp_mod: f64,
    arp_time: u32,
    arp_limit: u32,
}

impl Pitch {
    fn new(p: &SynthParams) -> Self {
        let base = p.value(ParamKey::PBaseFreq);
        let limit = p.value(ParamKey::PFreqLimit);
        let arp = p.value(ParamKey::PArpMod);
        let arp_speed = p.value(ParamKey::PArpSpeed);
        Self {
            period: 100.0 / (base * base + 0.001),
            max_period: 100.0 / (limit * limit + 0.001),
            slide: 1.0 - p.value(ParamKey::PFreqRamp).powi(3) * 0.01,
            delta_slide: -p.value(ParamKey::PFreqDramp).powi(3) * 0.000_001,
            duty: 0.5 - p.value(ParamKey::PDuty) * 0.5,
            duty_slide: -p.value(ParamKey::PDutyRamp) * 0.000_05,
            arp_mod: if arp >= 0.0 {
                1.0 - arp * arp * 0.9
            } else {
                1.0 + arp * arp * 10.0
            },
            arp_time: 0,
            arp_limit: if arp_speed >= 1.0 {
                0
            } else {
                ((1.0 - arp_speed).powi(2) * 20_000.0 + 32.0) as u32
            },
        }
    }
}

/// The bundled synthesizer.
#[derive(Debug, Clone)]
pub struct Sfxr {
    rng: ChaCha8Rng,
}

impl Sfxr {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn validate(params: &SynthParams) -> Result<WaveShape, SynthesisError> {
        for (key, value) in params.iter() {
            if !value.is_finite() {
                return Err(SynthesisError(format!("{key} is not finite ({value})")));
            }
        }
        params.wave_shape().ok_or_else(|| {
            SynthesisError(format!(
                "unknown waveform class {}",
                params.value(ParamKey::WaveType)
            ))
        })
    }

    fn refill_noise(&mut self, noise: &mut [f64; NOISE_LEN]) {
        for n in noise.iter_mut() {
            *n = self.rng.gen_range(-1.0..1.0);
        }
    }
}

impl Synthesizer for Sfxr {
    fn sample_rate(&self) -> u32 {
        SFXR_SAMPLE_RATE
    }

    fn synthesize(&mut self, params: &SynthParams) -> Result<Vec<f32>, SynthesisError> {
        let shape = Self::validate(params)?;
        let p = |key| params.value(key);

        let envelope = StageEnvelope::from_controls(
            p(ParamKey::PEnvAttack),
            p(ParamKey::PEnvSustain),
            p(ParamKey::PEnvDecay),
            p(ParamKey::PEnvPunch),
        );
        let mut pitch = Pitch::new(params);
        let freq_limit = p(ParamKey::PFreqLimit);

        // Low-pass
        let lpf_freq = p(ParamKey::PLpfFreq);
        let mut lp_pos = 0.0_f64;
        let mut lp_delta = 0.0_f64;
        let mut lp_w = lpf_freq.powi(3) * 0.1;
        let lp_w_ramp = 1.0 + p(ParamKey::PLpfRamp) * 0.0001;
        let lp_damp = (5.0 / (1.0 + p(ParamKey::PLpfResonance).powi(2) * 20.0) * (0.01 + lp_w))
            .min(0.8);

        // High-pass
        let mut hp_pos = 0.0_f64;
        let mut hp = p(ParamKey::PHpfFreq).powi(2) * 0.1;
        let hp_ramp = 1.0 + p(ParamKey::PHpfRamp) * 0.0003;

        // Vibrato
        let mut vib_phase = 0.0_f64;
        let vib_speed = p(ParamKey::PVibSpeed).powi(2) * 0.01;
        let vib_amp = p(ParamKey::PVibStrength) * 0.5;

        // Phaser
        let offset = p(ParamKey::PPhaOffset);
        let ramp = p(ParamKey::PPhaRamp);
        let mut pha_phase = offset * offset * 1020.0 * offset.signum();
        let pha_delta = ramp * ramp * ramp.signum();
        let mut phaser = [0.0_f64; PHASER_LEN];
        let mut pha_pos = 0usize;

        let mut noise = [0.0_f64; NOISE_LEN];
        self.refill_noise(&mut noise);

        let repeat = p(ParamKey::PRepeatSpeed);
        let repeat_limit = if repeat == 0.0 {
            0
        } else {
            ((1.0 - repeat).powi(2) * 20_000.0 + 32.0) as u32
        };
        let mut repeat_time = 0u32;

        let gain = p(ParamKey::SoundVol).exp() - 1.0;
        let total = envelope.total_samples();
        let mut output = Vec::with_capacity(total);
        let mut phase = 0u32;

        for i in 0..total {
            if repeat_limit != 0 {
                repeat_time += 1;
                if repeat_time >= repeat_limit {
                    repeat_time = 0;
                    pitch = Pitch::new(params);
                }
            }

            pitch.arp_time += 1;
            if pitch.arp_limit != 0 && pitch.arp_time >= pitch.arp_limit {
                pitch.arp_limit = 0;
                pitch.period *= pitch.arp_mod;
            }

            pitch.slide += pitch.delta_slide;
            pitch.period *= pitch.slide;
            if pitch.period > pitch.max_period {
                pitch.period = pitch.max_period;
                if freq_limit > 0.0 {
                    break;
                }
            }

            let mut period_f = pitch.period;
            if vib_amp > 0.0 {
                vib_phase += vib_speed;
                period_f = pitch.period * (1.0 + vib_phase.sin() * vib_amp);
            }
            let period = (period_f as u32).max(8);

            pitch.duty = (pitch.duty + pitch.duty_slide).clamp(0.0, 0.5);
            let env = envelope.level(i);

            pha_phase += pha_delta;
            let pha_offset = (pha_phase.abs() as usize).min(PHASER_LEN - 1);

            if hp_ramp != 1.0 {
                hp = (hp * hp_ramp).clamp(0.000_01, 0.1);
            }

            let mut acc = 0.0_f64;
            for _ in 0..SUPERSAMPLE {
                phase += 1;
                if phase >= period {
                    phase %= period;
                    if shape == WaveShape::Noise {
                        self.refill_noise(&mut noise);
                    }
                }

                let mut sample = match shape {
                    WaveShape::Noise => noise[(phase as usize * NOISE_LEN) / period as usize],
                    _ => oscillator(shape, phase as f64 / period as f64, pitch.duty),
                };

                let prev = lp_pos;
                lp_w = (lp_w * lp_w_ramp).clamp(0.0, 0.1);
                if lpf_freq != 1.0 {
                    lp_delta += (sample - lp_pos) * lp_w;
                    lp_delta -= lp_delta * lp_damp;
                } else {
                    lp_pos = sample;
                    lp_delta = 0.0;
                }
                lp_pos += lp_delta;

                hp_pos += lp_pos - prev;
                hp_pos -= hp_pos * hp;
                sample = hp_pos;

                phaser[pha_pos] = sample;
                sample += phaser[(pha_pos + PHASER_LEN - pha_offset) % PHASER_LEN];
                pha_pos = (pha_pos + 1) % PHASER_LEN;

                acc += sample * env;
            }

            let out = (acc / SUPERSAMPLE as f64 * gain).clamp(-1.0, 1.0);
            output.push(out as f32);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(shape: WaveShape) -> SynthParams {
        let mut p = SynthParams::new();
        p.set(ParamKey::WaveType, shape.index() as f64);
        p.set(ParamKey::PEnvAttack, 0.05);
        p.set(ParamKey::PEnvSustain, 0.2);
        p.set(ParamKey::PEnvDecay, 0.1);
        p.set(ParamKey::PBaseFreq, 0.4);
        p.set(ParamKey::SoundVol, 0.5);
        p
    }

    #[test]
    fn length_follows_envelope() {
        let mut sfxr = Sfxr::new(1);
        let p = params(WaveShape::Sine);
        let expected = StageEnvelope::from_controls(0.05, 0.2, 0.1, 0.0).total_samples();
        let out = sfxr.synthesize(&p).unwrap();
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn every_shape_produces_bounded_sound() {
        let mut sfxr = Sfxr::new(1);
        for shape in WaveShape::ALL {
            let out = sfxr.synthesize(&params(shape)).unwrap();
            assert!(out.iter().any(|s| s.abs() > 0.01), "{shape:?} is silent");
            assert!(out.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
        }
    }

    #[test]
    fn starts_silent_with_attack() {
        let mut sfxr = Sfxr::new(1);
        let out = sfxr.synthesize(&params(WaveShape::Square)).unwrap();
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn deterministic_per_seed() {
        let p = params(WaveShape::Noise);
        let a = Sfxr::new(9).synthesize(&p).unwrap();
        let b = Sfxr::new(9).synthesize(&p).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn freq_limit_cuts_downward_slide() {
        let mut p = params(WaveShape::Square);
        p.set(ParamKey::PFreqRamp, -0.6);
        p.set(ParamKey::PFreqLimit, 0.3);
        let full = StageEnvelope::from_controls(0.05, 0.2, 0.1, 0.0).total_samples();
        let out = Sfxr::new(1).synthesize(&p).unwrap();
        assert!(out.len() < full);
    }

    #[test]
    fn rejects_non_finite_params() {
        let mut p = params(WaveShape::Sine);
        p.set(ParamKey::PBaseFreq, f64::NAN);
        let err = Sfxr::new(1).synthesize(&p).unwrap_err();
        assert!(err.0.contains("p_base_freq"));
    }

    #[test]
    fn rejects_unknown_wave_class() {
        let mut p = params(WaveShape::Sine);
        p.set(ParamKey::WaveType, 7.0);
        assert!(Sfxr::new(1).synthesize(&p).is_err());
    }

    #[test]
    fn builtin_ranges_synthesize() {
        use crate::bake::ParameterBaker;
        use crate::bake::PlaybackInstance;
        use crate::context::GenerationContext;
        use crate::symbol::Symbol;

        let baker = ParameterBaker::default();
        let mut ctx = GenerationContext::seeded(4);
        let mut sfxr = Sfxr::new(4);
        for symbol in Symbol::VOICED {
            let PlaybackInstance::Baked { params, .. } = baker.bake(symbol, &mut ctx).unwrap() else {
                panic!("{symbol} baked to silence");
            };
            let out = sfxr.synthesize(&params).unwrap();
            assert!(!out.is_empty(), "{symbol} produced no samples");
            assert!(out.iter().all(|s| s.abs() <= 1.0));
        }
    }
}
