//! Property tests for generated word sequences.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use robovoice::bake::{bake_sequence, ParameterBaker};
use robovoice::grammar::select;
use robovoice::{GenerationContext, Grammar, Symbol};

proptest! {
    /// Silence is never first, never doubled, and never at or past the
    /// last target position.
    #[test]
    fn silence_placement(seed in any::<u64>(), target in 1usize..24) {
        let mut ctx = GenerationContext::seeded(seed);
        let words = Grammar::default().generate_with_target(target, &mut ctx).unwrap();

        prop_assert!(!words[0].symbol.is_silence());
        for (i, w) in words.iter().enumerate() {
            if w.symbol.is_silence() {
                prop_assert!(i + 1 < target, "silence at {} with target {}", i, target);
                prop_assert!(!words[i - 1].symbol.is_silence());
            }
        }
    }

    /// Generation always reaches its target length.
    #[test]
    fn target_is_reached(seed in any::<u64>(), target in 1usize..40) {
        let mut ctx = GenerationContext::seeded(seed);
        let words = Grammar::default().generate_with_target(target, &mut ctx).unwrap();
        prop_assert!(words.len() >= target);
    }

    /// No symbol ever gets more than three distinct identities.
    #[test]
    fn identity_pool_is_bounded(seed in any::<u64>(), target in 10usize..60) {
        let mut ctx = GenerationContext::seeded(seed);
        let words = Grammar::default().generate_with_target(target, &mut ctx).unwrap();

        let mut ids: HashMap<Symbol, HashSet<u64>> = HashMap::new();
        for w in &words {
            ids.entry(w.symbol).or_default().insert(w.identity.0);
        }
        for (symbol, set) in ids {
            prop_assert!(set.len() <= 3, "{} has {} identities", symbol, set.len());
        }
    }

    /// Equal words bake to the same instance, and distinct words never do.
    #[test]
    fn baked_instances_follow_words(seed in any::<u64>()) {
        let mut ctx = GenerationContext::seeded(seed);
        let words = Grammar::default().generate(&mut ctx).unwrap();
        let baked = bake_sequence(&words, &ParameterBaker::default(), &mut ctx).unwrap();

        for a in &baked {
            for b in &baked {
                let same_word = a.word() == b.word();
                prop_assert_eq!(same_word, Arc::ptr_eq(&a.instance, &b.instance));
            }
        }
    }

    /// The selector never returns a zero-weight item.
    #[test]
    fn selector_skips_zero_weights(
        seed in any::<u64>(),
        weights in prop::collection::vec(prop_oneof![Just(0.0), 0.01f64..10.0], 1..12),
    ) {
        prop_assume!(weights.iter().any(|&w| w > 0.0));
        let mut ctx = GenerationContext::seeded(seed);
        let i = select::weighted_index(&weights, ctx.rng()).unwrap();
        prop_assert!(weights[i] > 0.0);
    }
}

#[test]
fn identities_never_reused_across_runs() {
    let mut ctx = GenerationContext::seeded(3);
    let grammar = Grammar::default();
    let first: HashSet<_> = grammar.generate(&mut ctx).unwrap().iter().map(|w| w.identity).collect();
    let second: HashSet<_> = grammar.generate(&mut ctx).unwrap().iter().map(|w| w.identity).collect();
    assert!(first.is_disjoint(&second));
}

#[test]
fn selector_rejects_degenerate_weights() {
    let mut ctx = GenerationContext::seeded(1);
    assert!(select::weighted_index(&[], ctx.rng()).is_err());
    assert!(select::weighted_index(&[0.0, 0.0], ctx.rng()).is_err());
    assert!(select::weighted_index(&[1.0, -1.0], ctx.rng()).is_err());
    assert!(select::weighted_index(&[f64::NAN], ctx.rng()).is_err());
}
