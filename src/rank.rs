//! Rank weight estimation
//!
//! The WARP sampling trick: instead of sorting the negatives to find the
//! true rank of a positive score, draw negatives in random order until one
//! violates the margin and infer the rank from how many draws that took.
use crate::constants::MARGIN;
use rand::seq::SliceRandom;
use rand::Rng;

/// Partial sum of the harmonic series, `sum_{i=1..n} 1/i`.
///
/// Monotonically increasing and concave in `n`; `harmonic(0)` is 0.
pub fn harmonic(n: usize) -> f64 {
    (1..=n).map(|i| 1.0 / i as f64).sum()
}

/// Estimate the rank-dependent importance weight for one positive score.
///
/// * `score_pos` - The positive class score being ranked.
/// * `scores_neg` - Scores of the example's negative classes.
/// * `no_classes` - Total number of classes in the example.
/// * `rng` - Randomness for the permutation step. Injected so callers can
///   pin the draw sequence.
///
/// Scans a uniformly shuffled copy of `scores_neg` until the first margin
/// violator. The trial count is incremented once after the scan whether or
/// not a violator was found; with no negatives at all the count degenerates
/// to 1 and the estimate becomes `harmonic(round(no_classes - 1))`.
pub fn rank_weight<R: Rng>(score_pos: f64, scores_neg: &[f64], no_classes: usize, rng: &mut R) -> f64 {
    let mut permuted = scores_neg.to_vec();
    permuted.shuffle(rng);

    let mut no_trials = permuted.len();
    for (ind, &score_neg) in permuted.iter().enumerate() {
        if MARGIN - score_pos + score_neg > 0.0 {
            no_trials = ind;
            break;
        }
    }
    no_trials += 1;

    let rank_pos = ((no_classes as f64 - 1.0) / no_trials as f64).round() as usize;
    harmonic(rank_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_harmonic_values() {
        assert_eq!(harmonic(0), 0.0);
        assert_eq!(harmonic(1), 1.0);
        assert!((harmonic(3) - (1.0 + 0.5 + 1.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_harmonic_is_monotone() {
        for n in 1..50 {
            assert!(harmonic(n) > harmonic(n - 1));
        }
    }

    #[test]
    fn test_rank_weight_no_negatives() {
        // Degenerate case: the scan never runs, one trial is still counted.
        let mut rng = StdRng::seed_from_u64(3);
        let weight = rank_weight(0.5, &[], 5, &mut rng);
        assert!(weight.is_finite());
        assert!(weight >= 0.0);
        assert_eq!(weight, harmonic(4));
    }

    #[test]
    fn test_rank_weight_immediate_violation() {
        // Every negative violates the margin, so the first draw stops the
        // scan regardless of permutation order.
        let mut rng = StdRng::seed_from_u64(11);
        let weight = rank_weight(0.0, &[1.0, 1.0, 1.0], 4, &mut rng);
        assert_eq!(weight, harmonic(3));
    }

    #[test]
    fn test_rank_weight_exhausted_scan() {
        // No negative violates: trials becomes len + 1.
        let mut rng = StdRng::seed_from_u64(17);
        let weight = rank_weight(5.0, &[0.0, 0.0], 10, &mut rng);
        // round(9 / 3) = 3
        assert_eq!(weight, harmonic(3));
    }

    #[test]
    fn test_rank_weight_deterministic_under_fixed_seed() {
        let scores_neg = vec![0.3, -0.7, 0.9, 0.0, -0.1];
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = rank_weight(0.6, &scores_neg, 6, &mut rng_a);
        let b = rank_weight(0.6, &scores_neg, 6, &mut rng_b);
        assert_eq!(a, b);
    }
}
