//! Three-stage sfxr envelope: attack, punchy sustain, decay.

/// Envelope stage lengths in samples plus sustain punch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageEnvelope {
    pub attack: usize,
    pub sustain: usize,
    pub decay: usize,
    pub punch: f64,
}

impl StageEnvelope {
    /// Build from normalized sfxr controls; stage length is `value² · 100000`.
    ///
    /// Controls are clamped to `[-1, 1]`, so no stage exceeds 100000 samples.
    pub fn from_controls(attack: f64, sustain: f64, decay: f64, punch: f64) -> Self {
        let len = |v: f64| (v.clamp(-1.0, 1.0).powi(2) * 100_000.0) as usize;
        Self {
            attack: len(attack),
            sustain: len(sustain),
            decay: len(decay),
            punch,
        }
    }

    /// Total envelope length in samples.
    pub fn total_samples(&self) -> usize {
        self.attack.saturating_add(self.sustain).saturating_add(self.decay)
    }

    /// Amplitude at sample `i`.
    ///
    /// - `[0, attack)`: linear ramp from 0 to 1.
    /// - `[attack, attack+sustain)`: from `1 + 2·punch` down to 1.
    /// - `[.., total)`: linear ramp from 1 to 0.
    /// - After the end: 0.
    pub fn level(&self, i: usize) -> f64 {
        if i < self.attack {
            return i as f64 / self.attack as f64;
        }
        let i = i - self.attack;
        if i < self.sustain {
            let t = i as f64 / self.sustain as f64;
            return 1.0 + (1.0 - t) * 2.0 * self.punch;
        }
        let i = i - self.sustain;
        if i < self.decay {
            return 1.0 - i as f64 / self.decay as f64;
        }
        0.0
    }
}
