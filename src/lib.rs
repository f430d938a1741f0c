//! Robovoice: procedural robot speech.
//!
//! A weighted grammar emits a sequence of abstract words, each word is baked
//! into a concrete synthesis parameter set (repeats share one instance), and
//! the baked sequence is synthesized, faded and written out as a WAV.

pub mod bake;
pub mod config;
pub mod context;
pub mod error;
pub mod grammar;
pub mod render;
pub mod symbol;
pub mod synth;
pub mod voice;

pub use bake::{bake_sequence, bake_symbols, BakedWord, ParameterBaker, PlaybackInstance};
pub use config::VoiceConfig;
pub use context::GenerationContext;
pub use error::{VoiceError, VoiceResult};
pub use grammar::Grammar;
pub use render::Assembler;
pub use symbol::{format_words, parse_words, Identity, Symbol, Word};
pub use synth::{Sfxr, Synthesizer};
pub use voice::{RobotVoice, Utterance};
