//! Expression catalog: named pattern rules with context-sensitive weights.
//!
//! Each [`Expression`] looks at the [`GrammarState`] to report how likely it
//! is to fire next, and appends one or more words when chosen. Within one
//! generated run every distinct voiced symbol gets a single identity, so a
//! run like `b b S` plays the same low beep twice.

use rand::Rng;

use crate::context::GenerationContext;
use crate::error::VoiceResult;
use crate::symbol::{Identity, Symbol};

use super::select::{choose, randint};
use super::GrammarState;

/// A pattern-generation rule in the grammar catalog.
pub trait Expression: Send + Sync {
    /// Stable name used in logs and tests.
    fn name(&self) -> &'static str;

    /// Non-negative weight of this rule for the current state.
    fn weight(&self, state: &GrammarState) -> f64;

    /// Append at least one word to `state`.
    fn generate(&self, state: &mut GrammarState, ctx: &mut GenerationContext) -> VoiceResult<()>;
}

/// Symbols ordered from lowest to highest pitch, used by ladder runs.
pub const PITCH_LADDER: [Symbol; 4] = [
    Symbol::Buzz,
    Symbol::LowBeep,
    Symbol::Warble,
    Symbol::HighBeep,
];

/// Repeat counts for [`Repeat`]; single hits dominate.
const REPEAT_CEILINGS: [usize; 12] = [1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 3, 3];

/// Words that must already exist before a [`Hesitation`] may fire.
pub const HESITATION_ROOM: usize = 3;

/// Append `symbols` as one run, giving each distinct symbol one identity.
fn emit_run(state: &mut GrammarState, ctx: &mut GenerationContext, symbols: &[Symbol]) {
    let mut assigned: Vec<(Symbol, Identity)> = Vec::with_capacity(symbols.len());
    for &symbol in symbols {
        let identity = match assigned.iter().find(|(s, _)| *s == symbol) {
            Some(&(_, id)) => id,
            None => {
                let id = state.identity(symbol, ctx);
                assigned.push((symbol, id));
                id
            }
        };
        state.push(symbol, identity);
    }
}

/// One voiced symbol repeated one to three times.
///
/// Always has positive weight, which guarantees the generation loop can
/// make progress from any state.
#[derive(Debug, Clone)]
pub struct Repeat {
    pub weight: f64,
}

impl Expression for Repeat {
    fn name(&self) -> &'static str {
        "repeat"
    }

    fn weight(&self, _state: &GrammarState) -> f64 {
        self.weight
    }

    fn generate(&self, state: &mut GrammarState, ctx: &mut GenerationContext) -> VoiceResult<()> {
        let symbol = *choose(&Symbol::VOICED, ctx.rng())?;
        let ceiling = *choose(&REPEAT_CEILINGS, ctx.rng())?;
        let count = randint(1, ceiling, ctx.rng());
        emit_run(state, ctx, &vec![symbol; count]);
        Ok(())
    }
}

/// Two different voiced symbols, `a b` or `a b a`.
#[derive(Debug, Clone)]
pub struct Contrast {
    pub weight: f64,
}

impl Expression for Contrast {
    fn name(&self) -> &'static str {
        "contrast"
    }

    fn weight(&self, _state: &GrammarState) -> f64 {
        self.weight
    }

    fn generate(&self, state: &mut GrammarState, ctx: &mut GenerationContext) -> VoiceResult<()> {
        let a = *choose(&Symbol::VOICED, ctx.rng())?;
        let others: Vec<Symbol> = Symbol::VOICED.into_iter().filter(|&s| s != a).collect();
        let b = *choose(&others, ctx.rng())?;
        if ctx.rng().gen_bool(0.5) {
            emit_run(state, ctx, &[a, b]);
        } else {
            emit_run(state, ctx, &[a, b, a]);
        }
        Ok(())
    }
}

/// Direction of a [`LadderRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderShape {
    Ascending,
    Descending,
    /// Up to a peak and back down.
    Pyramid,
}

/// Consecutive steps along [`PITCH_LADDER`].
#[derive(Debug, Clone)]
pub struct LadderRun {
    pub shape: LadderShape,
    pub weight: f64,
}

impl LadderRun {
    /// Symbols for a run of `steps` rungs starting at `start`.
    ///
    /// `steps` is clamped to `1..=PITCH_LADDER.len()` and `start` is pulled
    /// back so the run stays on the ladder.
    pub fn steps(shape: LadderShape, start: usize, steps: usize) -> Vec<Symbol> {
        let steps = steps.clamp(1, PITCH_LADDER.len());
        let start = start.min(PITCH_LADDER.len() - steps);
        let rungs = &PITCH_LADDER[start..start + steps];
        match shape {
            LadderShape::Ascending => rungs.to_vec(),
            LadderShape::Descending => rungs.iter().rev().copied().collect(),
            LadderShape::Pyramid => rungs
                .iter()
                .copied()
                .chain(rungs[..steps - 1].iter().rev().copied())
                .collect(),
        }
    }
}

impl Expression for LadderRun {
    fn name(&self) -> &'static str {
        match self.shape {
            LadderShape::Ascending => "ascending",
            LadderShape::Descending => "descending",
            LadderShape::Pyramid => "pyramid",
        }
    }

    fn weight(&self, _state: &GrammarState) -> f64 {
        self.weight
    }

    fn generate(&self, state: &mut GrammarState, ctx: &mut GenerationContext) -> VoiceResult<()> {
        let steps = randint(2, PITCH_LADDER.len(), ctx.rng());
        let start = randint(0, PITCH_LADDER.len() - steps, ctx.rng());
        emit_run(state, ctx, &Self::steps(self.shape, start, steps));
        Ok(())
    }
}

/// Fixed rhythmic figures.
pub const MOTIFS: [(&str, &[Symbol]); 5] = [
    ("question", &[Symbol::LowBeep, Symbol::LowBeep, Symbol::UpSweep]),
    ("statement", &[Symbol::HighBeep, Symbol::DownSweep]),
    (
        "alarm",
        &[
            Symbol::HighBeep,
            Symbol::LowBeep,
            Symbol::HighBeep,
            Symbol::LowBeep,
        ],
    ),
    ("chatter", &[Symbol::Buzz, Symbol::Warble, Symbol::Buzz]),
    ("flourish", &[Symbol::UpArpeggio, Symbol::DownArpeggio]),
];

/// One of the fixed [`MOTIFS`], chosen uniformly.
#[derive(Debug, Clone)]
pub struct Motif {
    pub weight: f64,
}

impl Expression for Motif {
    fn name(&self) -> &'static str {
        "motif"
    }

    fn weight(&self, _state: &GrammarState) -> f64 {
        self.weight
    }

    fn generate(&self, state: &mut GrammarState, ctx: &mut GenerationContext) -> VoiceResult<()> {
        let (_, symbols) = *choose(&MOTIFS, ctx.rng())?;
        emit_run(state, ctx, symbols);
        Ok(())
    }
}

/// A single silence.
///
/// Zero weight at the first position, at or past the last target position,
/// and directly after another silence.
#[derive(Debug, Clone)]
pub struct Wait {
    pub weight: f64,
}

impl Expression for Wait {
    fn name(&self) -> &'static str {
        "wait"
    }

    fn weight(&self, state: &GrammarState) -> f64 {
        if state.silence_allowed() {
            self.weight
        } else {
            0.0
        }
    }

    fn generate(&self, state: &mut GrammarState, ctx: &mut GenerationContext) -> VoiceResult<()> {
        let id = state.identity(Symbol::Silence, ctx);
        state.push(Symbol::Silence, id);
        Ok(())
    }
}

/// A pause followed by a doubled voiced symbol: `_ w w`.
///
/// Needs [`HESITATION_ROOM`] words before it, on top of the silence rules.
#[derive(Debug, Clone)]
pub struct Hesitation {
    pub weight: f64,
}

impl Expression for Hesitation {
    fn name(&self) -> &'static str {
        "hesitation"
    }

    fn weight(&self, state: &GrammarState) -> f64 {
        if state.len() >= HESITATION_ROOM && state.silence_allowed() {
            self.weight
        } else {
            0.0
        }
    }

    fn generate(&self, state: &mut GrammarState, ctx: &mut GenerationContext) -> VoiceResult<()> {
        let pause = state.identity(Symbol::Silence, ctx);
        state.push(Symbol::Silence, pause);
        let symbol = *choose(&Symbol::VOICED, ctx.rng())?;
        emit_run(state, ctx, &[symbol, symbol]);
        Ok(())
    }
}

/// The built-in catalog.
pub fn default_catalog() -> Vec<Box<dyn Expression>> {
    vec![
        Box::new(Repeat { weight: 1.0 }),
        Box::new(Contrast { weight: 0.6 }),
        Box::new(LadderRun {
            shape: LadderShape::Ascending,
            weight: 0.4,
        }),
        Box::new(LadderRun {
            shape: LadderShape::Descending,
            weight: 0.4,
        }),
        Box::new(LadderRun {
            shape: LadderShape::Pyramid,
            weight: 0.25,
        }),
        Box::new(Motif { weight: 0.3 }),
        Box::new(Wait { weight: 2.5 }),
        Box::new(Hesitation { weight: 0.5 }),
    ]
}
