//! Error types shared by every pipeline stage.

use thiserror::Error;

use crate::symbol::{ParseWordError, Symbol};

/// Result type for robovoice operations.
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors that can occur while generating, baking or rendering an utterance.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The weighted selector was given an empty, mismatched, negative,
    /// non-finite or all-zero weight set.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// A voiced symbol has no entry in the range catalog.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(Symbol),

    /// The synthesis capability could not produce samples.
    #[error("synthesis failed for '{symbol}': {reason}")]
    SynthesisFailure {
        /// Symbol whose parameters were rejected.
        symbol: Symbol,
        /// Reason reported by the synthesizer.
        reason: String,
    },

    /// Writing the WAV container failed.
    #[error("WAV encoding error: {0}")]
    Encode(#[from] hound::Error),

    /// Configuration could not be parsed or is inconsistent.
    #[error("invalid config: {0}")]
    Config(String),

    /// A textual word sequence could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseWordError),

    /// Filesystem error while reading or writing config or output files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for VoiceError {
    fn from(e: serde_yaml::Error) -> Self {
        VoiceError::Config(e.to_string())
    }
}
