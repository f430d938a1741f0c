//! Grammar engine: weighted expression selection into a word sequence.
//!
//! The engine draws a target length, then repeatedly weighs every
//! [`Expression`] against the words built so far, picks one with
//! [`select::weighted_index`], and lets it append a run. The target is a
//! minimum word count: the last run may overshoot it.

pub mod expression;
pub mod identity;
pub mod select;

pub use expression::{default_catalog, Expression};
pub use identity::{IdentityRegistry, POOL_CAPACITY};

use tracing::debug;

use crate::config::VoiceConfig;
use crate::context::GenerationContext;
use crate::error::{VoiceError, VoiceResult};
use crate::symbol::{Identity, Symbol, Word};

/// Mutable state threaded through one generation.
#[derive(Debug, Clone)]
pub struct GrammarState {
    target: usize,
    words: Vec<Word>,
    identities: IdentityRegistry,
}

impl GrammarState {
    pub fn new(target: usize) -> Self {
        Self {
            target,
            words: Vec::new(),
            identities: IdentityRegistry::new(),
        }
    }

    /// Minimum number of words this generation must reach.
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn last(&self) -> Option<&Word> {
        self.words.last()
    }

    /// Whether a silence may be appended at the next position.
    ///
    /// Silence is never first, never at or past the last target position,
    /// and never follows another silence.
    pub fn silence_allowed(&self) -> bool {
        !self.words.is_empty()
            && self.words.len() + 1 < self.target
            && !self.last().is_some_and(|w| w.symbol.is_silence())
    }

    /// Identity for the next occurrence of `symbol`, drawn from its pool.
    pub fn identity(&mut self, symbol: Symbol, ctx: &mut GenerationContext) -> Identity {
        self.identities.get_or_create(symbol, ctx)
    }

    pub fn identities(&self) -> &IdentityRegistry {
        &self.identities
    }

    pub fn push(&mut self, symbol: Symbol, identity: Identity) {
        self.words.push(Word::new(symbol, identity));
    }

    pub fn into_words(self) -> Vec<Word> {
        self.words
    }
}

/// The grammar engine: an expression catalog plus a target length band.
pub struct Grammar {
    expressions: Vec<Box<dyn Expression>>,
    min_words: usize,
    max_words: usize,
}

impl Grammar {
    /// Built-in catalog with the given inclusive target band.
    pub fn new(min_words: usize, max_words: usize) -> Self {
        Self::with_expressions(default_catalog(), min_words, max_words)
    }

    /// Custom catalog. At least one expression should have a positive
    /// weight in every state, or generation fails with `InvalidWeights`.
    pub fn with_expressions(
        expressions: Vec<Box<dyn Expression>>,
        min_words: usize,
        max_words: usize,
    ) -> Self {
        Self {
            expressions,
            min_words,
            max_words,
        }
    }

    pub fn from_config(config: &VoiceConfig) -> Self {
        Self::new(config.min_words, config.max_words)
    }

    pub fn expressions(&self) -> impl Iterator<Item = &dyn Expression> {
        self.expressions.iter().map(|e| e.as_ref())
    }

    /// Generate a sequence with a target length drawn from the band.
    pub fn generate(&self, ctx: &mut GenerationContext) -> VoiceResult<Vec<Word>> {
        let target = select::randint(self.min_words, self.max_words, ctx.rng());
        self.generate_with_target(target, ctx)
    }

    /// Generate a sequence of at least `target` words.
    pub fn generate_with_target(
        &self,
        target: usize,
        ctx: &mut GenerationContext,
    ) -> VoiceResult<Vec<Word>> {
        let mut state = GrammarState::new(target);
        while state.len() < target {
            let weights: Vec<f64> = self.expressions.iter().map(|e| e.weight(&state)).collect();
            let chosen = &self.expressions[select::weighted_index(&weights, ctx.rng())?];

            let before = state.len();
            chosen.generate(&mut state, ctx)?;
            if state.len() == before {
                return Err(VoiceError::Config(format!(
                    "expression '{}' appended no words",
                    chosen.name()
                )));
            }
            debug!(
                expression = chosen.name(),
                added = state.len() - before,
                len = state.len(),
                target,
                "grammar step"
            );
        }
        Ok(state.into_words())
    }
}

impl Default for Grammar {
    fn default() -> Self {
        let config = VoiceConfig::default();
        Self::from_config(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    use expression::{Repeat, Wait};

    #[test]
    fn reaches_target() {
        let grammar = Grammar::new(5, 11);
        for seed in 0..50 {
            let mut ctx = GenerationContext::seeded(seed);
            let words = grammar.generate_with_target(8, &mut ctx).unwrap();
            assert!(words.len() >= 8);
        }
    }

    #[test]
    fn target_drawn_from_band() {
        let grammar = Grammar::new(4, 6);
        for seed in 0..50 {
            let mut ctx = GenerationContext::seeded(seed);
            let words = grammar.generate(&mut ctx).unwrap();
            assert!(words.len() >= 4);
        }
    }

    #[test]
    fn silence_placement() {
        let grammar = Grammar::default();
        for seed in 0..200 {
            let mut ctx = GenerationContext::seeded(seed);
            let target = 1 + (seed as usize % 15);
            let words = grammar.generate_with_target(target, &mut ctx).unwrap();
            assert!(!words[0].symbol.is_silence(), "seed {seed}: leading silence");
            assert!(
                !words[target - 1].symbol.is_silence(),
                "seed {seed}: silence at final target position"
            );
            assert!(!words.last().unwrap().symbol.is_silence());
            for pair in words.windows(2) {
                assert!(
                    !(pair[0].symbol.is_silence() && pair[1].symbol.is_silence()),
                    "seed {seed}: doubled silence"
                );
            }
        }
    }

    #[test]
    fn identity_pool_bounded_per_symbol() {
        let grammar = Grammar::new(40, 60);
        for seed in 0..20 {
            let mut ctx = GenerationContext::seeded(seed);
            let words = grammar.generate(&mut ctx).unwrap();
            let mut distinct: HashMap<Symbol, HashSet<Identity>> = HashMap::new();
            for w in &words {
                distinct.entry(w.symbol).or_default().insert(w.identity);
            }
            for (symbol, ids) in distinct {
                assert!(ids.len() <= POOL_CAPACITY, "{symbol}: {} identities", ids.len());
            }
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let grammar = Grammar::default();
        let a = grammar.generate(&mut GenerationContext::seeded(9)).unwrap();
        let b = grammar.generate(&mut GenerationContext::seeded(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn runs_sharing_a_context_never_share_identities() {
        let grammar = Grammar::default();
        let mut ctx = GenerationContext::seeded(5);
        let first: HashSet<Identity> = grammar
            .generate(&mut ctx)
            .unwrap()
            .iter()
            .map(|w| w.identity)
            .collect();
        let second: HashSet<Identity> = grammar
            .generate(&mut ctx)
            .unwrap()
            .iter()
            .map(|w| w.identity)
            .collect();
        assert!(first.is_disjoint(&second));
    }

    #[test]
    fn catalog_without_base_pattern_fails() {
        let grammar = Grammar::with_expressions(vec![Box::new(Wait { weight: 1.0 })], 3, 3);
        let err = grammar.generate(&mut GenerationContext::seeded(1)).unwrap_err();
        assert!(matches!(err, VoiceError::InvalidWeights(_)));
    }

    #[test]
    fn single_expression_catalog() {
        let grammar = Grammar::with_expressions(vec![Box::new(Repeat { weight: 1.0 })], 6, 6);
        let words = grammar.generate(&mut GenerationContext::seeded(1)).unwrap();
        assert!(words.len() >= 6);
        assert!(words.iter().all(|w| !w.symbol.is_silence()));
    }

    #[test]
    fn zero_target_is_empty() {
        let grammar = Grammar::default();
        let words = grammar
            .generate_with_target(0, &mut GenerationContext::seeded(1))
            .unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn silence_allowed_rules() {
        let mut ctx = GenerationContext::seeded(1);
        let mut state = GrammarState::new(4);
        assert!(!state.silence_allowed());
        let id = state.identity(Symbol::Buzz, &mut ctx);
        state.push(Symbol::Buzz, id);
        assert!(state.silence_allowed());
        let id = state.identity(Symbol::Silence, &mut ctx);
        state.push(Symbol::Silence, id);
        assert!(!state.silence_allowed());
        let id = state.identity(Symbol::Buzz, &mut ctx);
        state.push(Symbol::Buzz, id);
        assert!(!state.silence_allowed(), "position 3 is the final target slot");
    }
}
