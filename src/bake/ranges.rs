//! Range definitions: per-symbol parameter ranges for baking.
//!
//! Each voiced symbol declares candidate waveform classes and, for every
//! synthesizer control, either a fixed value or a `[min, max)` range. Baking
//! samples one concrete value per control.

use std::collections::BTreeMap;
use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{VoiceError, VoiceResult};
use crate::symbol::Symbol;
use crate::synth::oscillator::WaveShape;

use super::params::ParamKey;

/// Continuous interval, inclusive of `min` and exclusive of `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Like [`ParameterRange::new`], but rejects non-finite or inverted bounds.
    pub fn checked(min: f64, max: f64) -> VoiceResult<Self> {
        let range = Self::new(min, max);
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> VoiceResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(VoiceError::Config(format!(
                "range bounds must be finite, got {}..{}",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(VoiceError::Config(format!(
                "range min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Uniform draw in `[min, max)`. A degenerate range yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.min + rng.gen::<f64>() * (self.max - self.min)
    }
}

/// A control's declared value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Fixed(f64),
    Range(ParameterRange),
}

impl ParamValue {
    /// Check the value against the control domain of `key`.
    ///
    /// `wave_type` must be a fixed, known waveform class; every other sfxr
    /// control lives in `[-1.0, 1.0]`.
    pub fn validate(&self, key: ParamKey) -> VoiceResult<()> {
        if key == ParamKey::WaveType {
            return match self {
                ParamValue::Fixed(v) if v.fract() == 0.0 && (0.0..4.0).contains(v) => Ok(()),
                _ => Err(VoiceError::Config(format!(
                    "{key} must be a fixed waveform class 0-3, got {self:?}"
                ))),
            };
        }
        let (min, max) = match *self {
            ParamValue::Fixed(v) => (v, v),
            ParamValue::Range(r) => {
                r.validate().map_err(|e| VoiceError::Config(format!("{key}: {e}")))?;
                (r.min, r.max)
            }
        };
        if !min.is_finite() || !max.is_finite() {
            return Err(VoiceError::Config(format!("{key} must be finite")));
        }
        if min < -1.0 || max > 1.0 {
            return Err(VoiceError::Config(format!(
                "{key} must lie within [-1, 1], got {min}..{max}"
            )));
        }
        Ok(())
    }

    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            ParamValue::Fixed(v) => *v,
            ParamValue::Range(r) => r.sample(rng),
        }
    }
}

/// Parameter ranges for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeDefinition {
    pub name: String,
    /// Candidate waveform classes. When non-empty, one is chosen uniformly
    /// and overrides any declared `wave_type`.
    #[serde(default)]
    pub wave_shapes: Vec<WaveShape>,
    pub params: BTreeMap<ParamKey, ParamValue>,
}

impl RangeDefinition {
    /// Check every declared control.
    pub fn validate(&self) -> VoiceResult<()> {
        for (&key, value) in &self.params {
            value
                .validate(key)
                .map_err(|e| VoiceError::Config(format!("'{}': {e}", self.name)))?;
        }
        Ok(())
    }

    fn build(name: &str, wave_shapes: &[WaveShape], ranges: &[(ParamKey, f64, f64)]) -> Self {
        let mut params = BTreeMap::new();
        params.insert(ParamKey::WaveType, ParamValue::Fixed(0.0));
        for &(key, min, max) in ranges {
            params.insert(key, ParamValue::Range(ParameterRange::new(min, max)));
        }
        Self {
            name: name.to_string(),
            wave_shapes: wave_shapes.to_vec(),
            params,
        }
    }
}

/// Symbol → range definition lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeCatalog {
    definitions: HashMap<Symbol, RangeDefinition>,
}

impl RangeCatalog {
    /// Empty catalog; every voiced symbol is unknown.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Definitions for all eight voiced symbols.
    pub fn builtin() -> Self {
        use ParamKey::*;
        use WaveShape::*;

        // Controls shared by the gentle voices (sweeps, arpeggios).
        let gentle_tail = [
            (PVibStrength, 0.0, 0.02),
            (PVibSpeed, 0.0, 0.04),
            (PDuty, 0.45, 0.55),
            (PDutyRamp, -0.01, 0.01),
            (PRepeatSpeed, 0.0, 0.0),
            (PPhaOffset, 0.0, 0.002),
            (PPhaRamp, 0.0, 0.0),
            (PLpfFreq, 0.95, 1.0),
            (PLpfRamp, 0.0, 0.0),
            (PLpfResonance, 0.0, 0.05),
            (PHpfFreq, 0.0, 0.01),
            (PHpfRamp, 0.0, 0.0),
            (SoundVol, 0.45, 0.55),
        ];

        let sweep = |name: &str, ramp: (f64, f64)| {
            let mut ranges = vec![
                (PEnvAttack, 0.05, 0.1),
                (PEnvSustain, 0.24, 0.48),
                (PEnvDecay, 0.05, 0.1),
                (PEnvPunch, 0.0, 0.0),
                (PBaseFreq, 0.2, 0.9),
                (PFreqLimit, 0.0, 0.0),
                (PFreqRamp, ramp.0, ramp.1),
                (PFreqDramp, -0.1, 0.1),
                (PArpMod, 0.0, 0.0),
                (PArpSpeed, 0.0, 0.0),
            ];
            ranges.extend_from_slice(&gentle_tail);
            RangeDefinition::build(name, &[Sawtooth, Sine], &ranges)
        };

        let arpeggio = |name: &str, base: (f64, f64), ramp: (f64, f64), arp: (f64, f64)| {
            let mut ranges = vec![
                (PEnvAttack, 0.05, 0.1),
                (PEnvSustain, 0.3, 0.5),
                (PEnvDecay, 0.1, 0.2),
                (PEnvPunch, 0.0, 0.1),
                (PBaseFreq, base.0, base.1),
                (PFreqLimit, 0.0, 0.0),
                (PFreqRamp, ramp.0, ramp.1),
                (PFreqDramp, -0.05, 0.05),
                (PArpMod, arp.0, arp.1),
                (PArpSpeed, 0.3, 0.7),
            ];
            ranges.extend_from_slice(&gentle_tail);
            RangeDefinition::build(name, &[Square, Sawtooth, Sine], &ranges)
        };

        let beep = |name: &str, base: (f64, f64), lpf: (f64, f64), res: (f64, f64), hpf: f64| {
            RangeDefinition::build(
                name,
                &[Square, Sawtooth, Sine],
                &[
                    (PEnvAttack, 0.0, 0.03),
                    (PEnvSustain, 0.15, 0.3),
                    (PEnvDecay, 0.1, 0.2),
                    (PEnvPunch, 0.1, 0.2),
                    (PBaseFreq, base.0, base.1),
                    (PFreqLimit, 0.0, 0.0),
                    (PFreqRamp, -0.02, 0.04),
                    (PFreqDramp, -0.02, 0.02),
                    (PVibStrength, 0.0, 0.03),
                    (PVibSpeed, 0.0, 0.06),
                    (PArpMod, -0.1, 0.1),
                    (PArpSpeed, 0.4, 0.6),
                    (PDuty, 0.4, 0.6),
                    (PDutyRamp, -0.02, 0.02),
                    (PRepeatSpeed, 0.0, 0.0),
                    (PPhaOffset, 0.0, 0.003),
                    (PPhaRamp, -0.001, 0.001),
                    (PLpfFreq, lpf.0, lpf.1),
                    (PLpfRamp, 0.0, 0.0),
                    (PLpfResonance, res.0, res.1),
                    (PHpfFreq, 0.0, hpf),
                    (PHpfRamp, 0.0, 0.0),
                    (SoundVol, 0.45, 0.55),
                ],
            )
        };

        let warble = RangeDefinition::build(
            "Warble",
            &[Square, Sawtooth, Sine],
            &[
                (PEnvAttack, 0.0, 0.05),
                (PEnvSustain, 0.2, 0.4),
                (PEnvDecay, 0.1, 0.2),
                (PEnvPunch, 0.05, 0.15),
                (PBaseFreq, 0.2, 0.5),
                (PFreqLimit, 0.0, 0.0),
                (PFreqRamp, -0.01, 0.01),
                (PFreqDramp, -0.01, 0.01),
                (PVibStrength, 0.15, 0.3),
                (PVibSpeed, 0.15, 0.35),
                (PArpMod, 0.0, 0.0),
                (PArpSpeed, 0.0, 0.0),
                (PDuty, 0.3, 0.5),
                (PDutyRamp, -0.03, 0.03),
                (PRepeatSpeed, 0.0, 0.0),
                (PPhaOffset, 0.002, 0.006),
                (PPhaRamp, -0.002, 0.002),
                (PLpfFreq, 0.7, 0.95),
                (PLpfRamp, 0.0, 0.0),
                (PLpfResonance, 0.05, 0.15),
                (PHpfFreq, 0.0, 0.02),
                (PHpfRamp, 0.0, 0.0),
                (SoundVol, 0.45, 0.55),
            ],
        );

        let buzz = RangeDefinition::build(
            "Buzz",
            &[Square, Sawtooth, Noise],
            &[
                (PEnvAttack, 0.0, 0.02),
                (PEnvSustain, 0.15, 0.35),
                (PEnvDecay, 0.05, 0.1),
                (PEnvPunch, 0.1, 0.2),
                (PBaseFreq, 0.1, 0.3),
                (PFreqLimit, 0.0, 0.0),
                (PFreqRamp, -0.02, 0.02),
                (PFreqDramp, -0.01, 0.01),
                (PVibStrength, 0.0, 0.02),
                (PVibSpeed, 0.0, 0.05),
                (PArpMod, 0.0, 0.0),
                (PArpSpeed, 0.0, 0.0),
                (PDuty, 0.15, 0.35),
                (PDutyRamp, -0.1, 0.1),
                (PRepeatSpeed, 0.4, 0.7),
                (PPhaOffset, 0.0, 0.003),
                (PPhaRamp, -0.001, 0.001),
                (PLpfFreq, 0.4, 0.7),
                (PLpfRamp, 0.0, 0.0),
                (PLpfResonance, 0.15, 0.3),
                (PHpfFreq, 0.02, 0.05),
                (PHpfRamp, 0.0, 0.0),
                (SoundVol, 0.45, 0.55),
            ],
        );

        let mut catalog = Self::empty();
        catalog.insert(Symbol::UpSweep, sweep("Upward Sweep", (0.06, 0.2)));
        catalog.insert(Symbol::DownSweep, sweep("Downward Sweep", (-0.2, -0.06)));
        catalog.insert(
            Symbol::UpArpeggio,
            arpeggio("Arpeggio Up", (0.25, 0.6), (0.03, 0.1), (0.2, 0.6)),
        );
        catalog.insert(
            Symbol::DownArpeggio,
            arpeggio("Arpeggio Down", (0.3, 0.7), (-0.1, -0.03), (-0.6, -0.2)),
        );
        catalog.insert(
            Symbol::HighBeep,
            beep("High Beep", (0.6, 0.85), (0.9, 1.0), (0.0, 0.1), 0.02),
        );
        catalog.insert(
            Symbol::LowBeep,
            beep("Low Beep", (0.15, 0.35), (0.7, 0.9), (0.0, 0.15), 0.01),
        );
        catalog.insert(Symbol::Warble, warble);
        catalog.insert(Symbol::Buzz, buzz);
        catalog
    }

    pub fn get(&self, symbol: Symbol) -> Option<&RangeDefinition> {
        self.definitions.get(&symbol)
    }

    pub fn insert(&mut self, symbol: Symbol, definition: RangeDefinition) {
        self.definitions.insert(symbol, definition);
    }

    /// Check every definition. Silence has no ranges: it always bakes to a wait.
    pub fn validate(&self) -> VoiceResult<()> {
        if self.definitions.contains_key(&Symbol::Silence) {
            return Err(VoiceError::Config(
                "silence cannot have a range definition".into(),
            ));
        }
        for symbol in self.symbols() {
            if let Some(def) = self.definitions.get(&symbol) {
                def.validate()
                    .map_err(|e| VoiceError::Config(format!("symbol {}: {e}", symbol.name())))?;
            }
        }
        Ok(())
    }

    /// Replace entries with those from `overrides`.
    pub fn merge(&mut self, overrides: &RangeCatalog) {
        for (&symbol, def) in &overrides.definitions {
            self.definitions.insert(symbol, def.clone());
        }
    }

    /// Symbols with a definition, in [`Symbol::ALL`] order.
    pub fn symbols(&self) -> Vec<Symbol> {
        Symbol::ALL
            .into_iter()
            .filter(|s| self.definitions.contains_key(s))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
