//! Weighted and uniform random selection.

use rand::Rng;

use crate::error::{VoiceError, VoiceResult};

/// Check a weight vector and return its total.
fn validate(len: usize, weights: &[f64]) -> VoiceResult<f64> {
    if len != weights.len() {
        return Err(VoiceError::InvalidWeights(format!(
            "{len} items but {} weights",
            weights.len()
        )));
    }
    if weights.is_empty() {
        return Err(VoiceError::InvalidWeights("no items to choose from".into()));
    }
    let mut total = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        if !w.is_finite() || w < 0.0 {
            return Err(VoiceError::InvalidWeights(format!(
                "weight {i} is {w}; weights must be finite and non-negative"
            )));
        }
        total += w;
    }
    if total <= 0.0 {
        return Err(VoiceError::InvalidWeights(
            "at least one weight must be positive".into(),
        ));
    }
    Ok(total)
}

/// Find the first index whose cumulative weight exceeds `r`.
///
/// Zero-weight entries are never returned. If rounding exhausts the scan,
/// the last positive-weight index is returned.
fn locate(weights: &[f64], mut r: f64) -> usize {
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w == 0.0 {
            continue;
        }
        if r < w {
            return i;
        }
        r -= w;
        last_positive = i;
    }
    last_positive
}

/// Draw an index with probability proportional to its weight.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> VoiceResult<usize> {
    let total = validate(weights.len(), weights)?;
    let r = rng.gen::<f64>() * total;
    Ok(locate(weights, r))
}

/// Draw an item with probability proportional to its weight.
pub fn select<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> VoiceResult<&'a T> {
    validate(items.len(), weights)?;
    let i = weighted_index(weights, rng)?;
    Ok(&items[i])
}

/// Draw an item uniformly.
pub fn choose<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> VoiceResult<&'a T> {
    let weights = vec![1.0; items.len()];
    select(items, &weights, rng)
}

/// Uniform integer in `[min, max]` (inclusive). Returns `min` if the range is inverted.
pub fn randint<R: Rng + ?Sized>(min: usize, max: usize, rng: &mut R) -> usize {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn rejects_empty() {
        let items: [u8; 0] = [];
        let err = select(&items, &[], &mut rng()).unwrap_err();
        assert!(matches!(err, VoiceError::InvalidWeights(_)));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = select(&['a', 'b'], &[1.0], &mut rng()).unwrap_err();
        assert!(matches!(err, VoiceError::InvalidWeights(_)));
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(weighted_index(&[1.0, -0.5], &mut rng()).is_err());
        assert!(weighted_index(&[1.0, f64::NAN], &mut rng()).is_err());
        assert!(weighted_index(&[f64::INFINITY], &mut rng()).is_err());
    }

    #[test]
    fn rejects_all_zero() {
        assert!(weighted_index(&[0.0, 0.0, 0.0], &mut rng()).is_err());
    }

    #[test]
    fn never_picks_zero_weight() {
        let mut rng = rng();
        for _ in 0..1000 {
            let i = weighted_index(&[0.0, 3.0, 0.0, 1.0, 0.0], &mut rng).unwrap();
            assert!(i == 1 || i == 3, "picked zero-weight index {i}");
        }
    }

    #[test]
    fn single_positive_weight_always_wins() {
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(*select(&["a", "b", "c"], &[0.0, 0.0, 2.5], &mut rng).unwrap(), "c");
        }
    }

    #[test]
    fn distribution_follows_weights() {
        let mut rng = rng();
        let mut counts = [0usize; 2];
        for _ in 0..10_000 {
            counts[weighted_index(&[1.0, 3.0], &mut rng).unwrap()] += 1;
        }
        let ratio = counts[1] as f64 / counts[0] as f64;
        assert!(ratio > 2.5 && ratio < 3.5, "ratio {ratio}");
    }

    #[test]
    fn locate_scans_cumulatively() {
        let w = [1.0, 0.0, 2.0, 1.0];
        assert_eq!(locate(&w, 0.0), 0);
        assert_eq!(locate(&w, 0.99), 0);
        assert_eq!(locate(&w, 1.0), 2);
        assert_eq!(locate(&w, 2.99), 2);
        assert_eq!(locate(&w, 3.5), 3);
    }

    #[test]
    fn locate_falls_back_on_rounding() {
        let w = [1.0, 1.0, 0.0];
        assert_eq!(locate(&w, 2.0), 1);
        assert_eq!(locate(&w, 2.0 + 1e-12), 1);
    }

    #[test]
    fn choose_is_uniform_enough() {
        let mut rng = rng();
        let items = [0usize, 1, 2];
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            counts[*choose(&items, &mut rng).unwrap()] += 1;
        }
        for c in counts {
            assert!(c > 800 && c < 1200, "count {c}");
        }
    }

    #[test]
    fn randint_inclusive_bounds() {
        let mut rng = rng();
        let mut seen = [false; 3];
        for _ in 0..200 {
            let v = randint(1, 3, &mut rng);
            assert!((1..=3).contains(&v));
            seen[v - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(randint(4, 4, &mut rng), 4);
        assert_eq!(randint(5, 2, &mut rng), 5);
    }
}
