//! Playback instances: baked, render-ready units.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::symbol::{Identity, Symbol, Word};

use super::params::SynthParams;

/// A symbol resolved into something the assembler can render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaybackInstance {
    /// Silence of a fixed duration.
    Wait { duration_ms: f64 },
    /// Concrete synthesizer input.
    Baked {
        symbol: Symbol,
        params: SynthParams,
        id: u64,
    },
}

impl PlaybackInstance {
    pub fn is_wait(&self) -> bool {
        matches!(self, PlaybackInstance::Wait { .. })
    }
}

impl fmt::Display for PlaybackInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackInstance::Wait { duration_ms } => write!(f, "wait {duration_ms:.0}ms"),
            PlaybackInstance::Baked { symbol, id, .. } => write!(f, "{} #{id}", symbol.name()),
        }
    }
}

/// The render-ready counterpart of a [`Word`].
///
/// Words sharing `(symbol, identity)` within one baking pass hold the same
/// `Arc`, so the instance is shared rather than copied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedWord {
    pub symbol: Symbol,
    pub identity: Identity,
    pub instance: Arc<PlaybackInstance>,
}

impl BakedWord {
    pub fn new(word: Word, instance: Arc<PlaybackInstance>) -> Self {
        Self {
            symbol: word.symbol,
            identity: word.identity,
            instance,
        }
    }

    pub fn word(&self) -> Word {
        Word::new(self.symbol, self.identity)
    }
}
