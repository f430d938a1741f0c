//! Synthesis capability: turns one resolved parameter set into samples.
//!
//! The assembler only depends on the [`Synthesizer`] trait. [`Sfxr`] is the
//! bundled implementation; hosts with their own DSP can plug in theirs.

pub mod envelope;
pub mod oscillator;
pub mod sfxr;

pub use oscillator::WaveShape;
pub use sfxr::Sfxr;

use thiserror::Error;

use crate::bake::SynthParams;

/// Sample rate of the bundled synthesizer.
pub const SFXR_SAMPLE_RATE: u32 = 44_100;

/// Reported when a parameter set cannot be synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SynthesisError(pub String);

/// Produces mono samples in `[-1.0, 1.0]` from a parameter set.
pub trait Synthesizer {
    /// Rate of the returned samples.
    fn sample_rate(&self) -> u32;

    /// Synthesize one sound. The result must be finite.
    fn synthesize(&mut self, params: &SynthParams) -> Result<Vec<f32>, SynthesisError>;
}
