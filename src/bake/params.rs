//! Synthesizer parameter schema.
//!
//! Names follow the classic sfxr parameter set so baked instances can be fed
//! to any sfxr-compatible synthesizer. All controls are normalized floats;
//! `wave_type` holds a [`WaveShape`] class index.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::synth::oscillator::WaveShape;

/// One named synthesizer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKey {
    WaveType,
    PEnvAttack,
    PEnvSustain,
    PEnvPunch,
    PEnvDecay,
    PBaseFreq,
    PFreqLimit,
    PFreqRamp,
    PFreqDramp,
    PVibStrength,
    PVibSpeed,
    PArpMod,
    PArpSpeed,
    PDuty,
    PDutyRamp,
    PRepeatSpeed,
    PPhaOffset,
    PPhaRamp,
    PLpfFreq,
    PLpfRamp,
    PLpfResonance,
    PHpfFreq,
    PHpfRamp,
    SoundVol,
}

impl ParamKey {
    pub const ALL: [ParamKey; 24] = [
        ParamKey::WaveType,
        ParamKey::PEnvAttack,
        ParamKey::PEnvSustain,
        ParamKey::PEnvPunch,
        ParamKey::PEnvDecay,
        ParamKey::PBaseFreq,
        ParamKey::PFreqLimit,
        ParamKey::PFreqRamp,
        ParamKey::PFreqDramp,
        ParamKey::PVibStrength,
        ParamKey::PVibSpeed,
        ParamKey::PArpMod,
        ParamKey::PArpSpeed,
        ParamKey::PDuty,
        ParamKey::PDutyRamp,
        ParamKey::PRepeatSpeed,
        ParamKey::PPhaOffset,
        ParamKey::PPhaRamp,
        ParamKey::PLpfFreq,
        ParamKey::PLpfRamp,
        ParamKey::PLpfResonance,
        ParamKey::PHpfFreq,
        ParamKey::PHpfRamp,
        ParamKey::SoundVol,
    ];

    /// The sfxr field name.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKey::WaveType => "wave_type",
            ParamKey::PEnvAttack => "p_env_attack",
            ParamKey::PEnvSustain => "p_env_sustain",
            ParamKey::PEnvPunch => "p_env_punch",
            ParamKey::PEnvDecay => "p_env_decay",
            ParamKey::PBaseFreq => "p_base_freq",
            ParamKey::PFreqLimit => "p_freq_limit",
            ParamKey::PFreqRamp => "p_freq_ramp",
            ParamKey::PFreqDramp => "p_freq_dramp",
            ParamKey::PVibStrength => "p_vib_strength",
            ParamKey::PVibSpeed => "p_vib_speed",
            ParamKey::PArpMod => "p_arp_mod",
            ParamKey::PArpSpeed => "p_arp_speed",
            ParamKey::PDuty => "p_duty",
            ParamKey::PDutyRamp => "p_duty_ramp",
            ParamKey::PRepeatSpeed => "p_repeat_speed",
            ParamKey::PPhaOffset => "p_pha_offset",
            ParamKey::PPhaRamp => "p_pha_ramp",
            ParamKey::PLpfFreq => "p_lpf_freq",
            ParamKey::PLpfRamp => "p_lpf_ramp",
            ParamKey::PLpfResonance => "p_lpf_resonance",
            ParamKey::PHpfFreq => "p_hpf_freq",
            ParamKey::PHpfRamp => "p_hpf_ramp",
            ParamKey::SoundVol => "sound_vol",
        }
    }

    /// Value used when a parameter set leaves this control unset.
    pub fn default_value(self) -> f64 {
        match self {
            ParamKey::PEnvSustain => 0.3,
            ParamKey::PEnvDecay => 0.4,
            ParamKey::PBaseFreq => 0.3,
            ParamKey::PLpfFreq => 1.0,
            ParamKey::SoundVol => 0.5,
            _ => 0.0,
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved parameter set handed to the synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynthParams {
    values: BTreeMap<ParamKey, f64>,
}

impl SynthParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: ParamKey, value: f64) {
        self.values.insert(key, value);
    }

    /// Explicitly set value, if any.
    pub fn get(&self, key: ParamKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    /// Set value or the schema default.
    pub fn value(&self, key: ParamKey) -> f64 {
        self.get(key).unwrap_or_else(|| key.default_value())
    }

    pub fn contains(&self, key: ParamKey) -> bool {
        self.values.contains_key(&key)
    }

    /// The waveform class selector, if it names a known class.
    pub fn wave_shape(&self) -> Option<WaveShape> {
        let raw = self.value(ParamKey::WaveType);
        if raw.fract() != 0.0 || raw < 0.0 {
            return None;
        }
        WaveShape::from_index(raw as u8)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, f64)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
