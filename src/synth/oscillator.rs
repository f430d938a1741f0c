//! Oscillator primitives: the four sfxr waveform classes.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Discrete waveform class, stored in the `wave_type` parameter by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveShape {
    Square,
    Sawtooth,
    Sine,
    Noise,
}

impl WaveShape {
    pub const ALL: [WaveShape; 4] = [
        WaveShape::Square,
        WaveShape::Sawtooth,
        WaveShape::Sine,
        WaveShape::Noise,
    ];

    /// Class index as used by the `wave_type` parameter.
    pub fn index(self) -> u8 {
        match self {
            WaveShape::Square => 0,
            WaveShape::Sawtooth => 1,
            WaveShape::Sine => 2,
            WaveShape::Noise => 3,
        }
    }

    pub fn from_index(i: u8) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }
}

/// One sample of a periodic waveform at `phase` in `[0.0, 1.0)`.
///
/// Square and sawtooth follow sfxr amplitudes: the square swings ±0.5
/// around `duty`, the sawtooth falls from 1.0 to -1.0. `Noise` is not
/// periodic and returns 0.0; the synthesizer reads its noise buffer instead.
pub fn oscillator(shape: WaveShape, phase: f64, duty: f64) -> f64 {
    match shape {
        WaveShape::Square => {
            if phase < duty {
                0.5
            } else {
                -0.5
            }
        }
        WaveShape::Sawtooth => 1.0 - phase * 2.0,
        WaveShape::Sine => (phase * 2.0 * PI).sin(),
        WaveShape::Noise => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for shape in WaveShape::ALL {
            assert_eq!(WaveShape::from_index(shape.index()), Some(shape));
        }
        assert_eq!(WaveShape::from_index(4), None);
    }

    #[test]
    fn sine_at_quarter() {
        let v = oscillator(WaveShape::Sine, 0.25, 0.5);
        assert!((v - 1.0).abs() < 1e-10);
    }

    #[test]
    fn saw_endpoints() {
        assert!((oscillator(WaveShape::Sawtooth, 0.0, 0.5) - 1.0).abs() < 1e-10);
        assert!(oscillator(WaveShape::Sawtooth, 0.5, 0.5).abs() < 1e-10);
    }

    #[test]
    fn square_follows_duty() {
        assert_eq!(oscillator(WaveShape::Square, 0.1, 0.25), 0.5);
        assert_eq!(oscillator(WaveShape::Square, 0.3, 0.25), -0.5);
        assert_eq!(oscillator(WaveShape::Square, 0.3, 0.5), 0.5);
    }

    #[test]
    fn noise_is_not_periodic() {
        assert_eq!(oscillator(WaveShape::Noise, 0.3, 0.5), 0.0);
    }

    #[test]
    fn all_shapes_bounded() {
        for shape in WaveShape::ALL {
            for i in 0..1000 {
                let phase = i as f64 / 1000.0;
                let v = oscillator(shape, phase, 0.5);
                assert!(
                    (-1.0..=1.0).contains(&v),
                    "{shape:?} at phase {phase}: {v} out of bounds"
                );
            }
        }
    }
}
