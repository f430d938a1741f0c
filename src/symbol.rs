//! Symbols, identities and words: the vocabulary produced by the grammar.
//!
//! A [`Word`] is one occurrence of a [`Symbol`] tagged with an [`Identity`].
//! Two words with the same `(symbol, identity)` pair are meant to sound the
//! same once baked; the identity carries no meaning beyond that.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Abstract sound category.
///
/// The compact textual form is a single character (`S s A a B b w z _`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    UpSweep,
    DownSweep,
    UpArpeggio,
    DownArpeggio,
    HighBeep,
    LowBeep,
    Warble,
    Buzz,
    Silence,
}

impl Symbol {
    /// Every symbol, voiced ones first.
    pub const ALL: [Symbol; 9] = [
        Symbol::UpSweep,
        Symbol::DownSweep,
        Symbol::UpArpeggio,
        Symbol::DownArpeggio,
        Symbol::HighBeep,
        Symbol::LowBeep,
        Symbol::Warble,
        Symbol::Buzz,
        Symbol::Silence,
    ];

    /// Every symbol that produces sound.
    pub const VOICED: [Symbol; 8] = [
        Symbol::UpSweep,
        Symbol::DownSweep,
        Symbol::UpArpeggio,
        Symbol::DownArpeggio,
        Symbol::HighBeep,
        Symbol::LowBeep,
        Symbol::Warble,
        Symbol::Buzz,
    ];

    /// Single-character code.
    pub fn code(self) -> char {
        match self {
            Symbol::UpSweep => 'S',
            Symbol::DownSweep => 's',
            Symbol::UpArpeggio => 'A',
            Symbol::DownArpeggio => 'a',
            Symbol::HighBeep => 'B',
            Symbol::LowBeep => 'b',
            Symbol::Warble => 'w',
            Symbol::Buzz => 'z',
            Symbol::Silence => '_',
        }
    }

    /// Parse a single-character code.
    pub fn from_code(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == c)
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::UpSweep => "Upward Sweep",
            Symbol::DownSweep => "Downward Sweep",
            Symbol::UpArpeggio => "Arpeggio Up",
            Symbol::DownArpeggio => "Arpeggio Down",
            Symbol::HighBeep => "High Beep",
            Symbol::LowBeep => "Low Beep",
            Symbol::Warble => "Warble",
            Symbol::Buzz => "Buzz",
            Symbol::Silence => "Wait",
        }
    }

    pub fn is_silence(self) -> bool {
        self == Symbol::Silence
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Opaque tag distinguishing occurrences of the same symbol.
///
/// Only meaningful in combination with a symbol. Issued by
/// [`GenerationContext::mint_identity`](crate::context::GenerationContext::mint_identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub u64);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `(symbol, identity)` occurrence in a generated sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    pub symbol: Symbol,
    pub identity: Identity,
}

impl Word {
    pub fn new(symbol: Symbol, identity: Identity) -> Self {
        Self { symbol, identity }
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.symbol, self.identity)
    }
}

/// Error returned when a word's textual form cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWordError(pub String);

impl fmt::Display for ParseWordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid word '{}': expected a symbol code followed by a number", self.0)
    }
}

impl std::error::Error for ParseWordError {}

impl FromStr for Word {
    type Err = ParseWordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let symbol = chars
            .next()
            .and_then(Symbol::from_code)
            .ok_or_else(|| ParseWordError(s.to_string()))?;
        let identity = chars
            .as_str()
            .parse::<u64>()
            .map_err(|_| ParseWordError(s.to_string()))?;
        Ok(Word::new(symbol, Identity(identity)))
    }
}

/// Parse a whitespace-separated word sequence such as `"z1 z1 _2"`.
pub fn parse_words(text: &str) -> Result<Vec<Word>, ParseWordError> {
    text.split_whitespace().map(str::parse).collect()
}

/// Render a word sequence in its compact textual form.
pub fn format_words(words: &[Word]) -> String {
    words
        .iter()
        .map(Word::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
