//! Baking: resolving words into concrete, shareable playback instances.
//!
//! [`ParameterBaker`] turns one symbol into a randomized [`PlaybackInstance`].
//! [`bake_sequence`] applies it across a word sequence with a per-call cache
//! keyed by `(symbol, identity)`, so repeated words share one instance and
//! the same voice recurs. Nothing is cached across calls.

pub mod baker;
pub mod instance;
pub mod params;
pub mod ranges;

pub use baker::ParameterBaker;
pub use instance::{BakedWord, PlaybackInstance};
pub use params::{ParamKey, SynthParams};
pub use ranges::{ParamValue, ParameterRange, RangeCatalog, RangeDefinition};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::context::GenerationContext;
use crate::error::VoiceResult;
use crate::symbol::{Identity, Symbol, Word};

/// Bake a word sequence. All-or-nothing: the first failure aborts the pass.
pub fn bake_sequence(
    words: &[Word],
    baker: &ParameterBaker,
    ctx: &mut GenerationContext,
) -> VoiceResult<Vec<BakedWord>> {
    let mut cache: HashMap<(Symbol, Identity), Arc<PlaybackInstance>> = HashMap::new();
    let mut baked = Vec::with_capacity(words.len());

    for &word in words {
        let key = (word.symbol, word.identity);
        let instance = match cache.get(&key) {
            Some(instance) => Arc::clone(instance),
            None => {
                let instance = Arc::new(baker.bake(word.symbol, ctx)?);
                debug!(word = %word, instance = %instance, "baked");
                cache.insert(key, Arc::clone(&instance));
                instance
            }
        };
        baked.push(BakedWord::new(word, instance));
    }

    Ok(baked)
}

/// Bake each symbol independently, without any sharing.
pub fn bake_symbols(
    symbols: &[Symbol],
    baker: &ParameterBaker,
    ctx: &mut GenerationContext,
) -> VoiceResult<Vec<PlaybackInstance>> {
    symbols.iter().map(|&s| baker.bake(s, ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VoiceError;
    use crate::symbol::parse_words;

    #[test]
    fn repeated_words_share_one_instance() {
        let words = parse_words("z1 b2 z1 _3 z1 _3").unwrap();
        let baked = bake_sequence(&words, &ParameterBaker::default(), &mut GenerationContext::seeded(1)).unwrap();
        assert_eq!(baked.len(), words.len());
        assert!(Arc::ptr_eq(&baked[0].instance, &baked[2].instance));
        assert!(Arc::ptr_eq(&baked[0].instance, &baked[4].instance));
        assert!(Arc::ptr_eq(&baked[3].instance, &baked[5].instance));
        assert!(!Arc::ptr_eq(&baked[0].instance, &baked[1].instance));
    }

    #[test]
    fn distinct_identities_bake_independently() {
        let words = parse_words("w1 w2").unwrap();
        let baked = bake_sequence(&words, &ParameterBaker::default(), &mut GenerationContext::seeded(1)).unwrap();
        assert!(!Arc::ptr_eq(&baked[0].instance, &baked[1].instance));
        assert_ne!(*baked[0].instance, *baked[1].instance);
    }

    #[test]
    fn same_identity_different_symbol_is_a_different_key() {
        let words = parse_words("w1 B1").unwrap();
        let baked = bake_sequence(&words, &ParameterBaker::default(), &mut GenerationContext::seeded(1)).unwrap();
        assert!(!Arc::ptr_eq(&baked[0].instance, &baked[1].instance));
    }

    #[test]
    fn no_cache_across_calls() {
        let words = parse_words("S1 S1").unwrap();
        let baker = ParameterBaker::default();
        let mut ctx = GenerationContext::seeded(1);
        let first = bake_sequence(&words, &baker, &mut ctx).unwrap();
        let second = bake_sequence(&words, &baker, &mut ctx).unwrap();
        assert_ne!(*first[0].instance, *second[0].instance);
        assert!(Arc::ptr_eq(&second[0].instance, &second[1].instance));
    }

    #[test]
    fn failure_aborts_whole_pass() {
        let words = parse_words("_1 z2").unwrap();
        let baker = ParameterBaker::new(RangeCatalog::empty(), ParameterRange::new(50.0, 300.0));
        let err = bake_sequence(&words, &baker, &mut GenerationContext::seeded(1)).unwrap_err();
        assert!(matches!(err, VoiceError::UnknownSymbol(Symbol::Buzz)));
    }

    #[test]
    fn bake_symbols_never_shares() {
        let symbols = [Symbol::Buzz, Symbol::Buzz];
        let baked = bake_symbols(&symbols, &ParameterBaker::default(), &mut GenerationContext::seeded(1)).unwrap();
        assert_eq!(baked.len(), 2);
        assert_ne!(baked[0], baked[1]);
    }
}
