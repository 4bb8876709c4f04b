//! Parent selection.
//!
//! Selection is tournament-only and reads tour length directly: the
//! normalized fitness a population keeps for reporting plays no part here.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

/// Default tournament size.
pub const DEFAULT_TOURNAMENT_SIZE: usize = 3;

/// Tournament selection: draw `k` candidates uniformly with replacement and
/// return the index of the one with the lowest `cost`.
///
/// The first drawn candidate wins ties. `k` of zero is treated as one.
///
/// Higher `k` = stronger selection pressure.
/// - k=2: light pressure (good for diversity)
/// - k=3-5: moderate pressure (typical default)
/// - k>5: strong pressure (risk of premature convergence)
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `items` is empty.
pub fn tournament<T, R, F>(items: &[T], k: usize, rng: &mut R, cost: F) -> usize
where
    R: Rng,
    F: Fn(&T) -> f64,
{
    assert!(!items.is_empty(), "cannot select from empty population");

    let k = k.max(1);
    let n = items.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if cost(&items[idx]) < cost(&items[best_idx]) {
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn pick(costs: &[f64], k: usize, draws: usize, seed: u64) -> Vec<u32> {
        let mut rng = create_rng(seed);
        let mut counts = vec![0u32; costs.len()];
        for _ in 0..draws {
            let idx = tournament(costs, k, &mut rng, |c| *c);
            counts[idx] += 1;
        }
        counts
    }

    #[test]
    fn test_tournament_favors_shortest() {
        let counts = pick(&[10.0, 5.0, 1.0, 8.0], 4, 10_000, 42);
        // With tournament size = population size, best should be selected
        // most often (though not always due to with-replacement sampling)
        assert!(
            counts[2] > 6000,
            "expected best to be selected >60% of the time, got {counts:?}"
        );
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let counts = pick(&[10.0, 5.0, 1.0, 8.0], 1, 10_000, 42);
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_tournament_size_0_behaves_like_1() {
        let counts = pick(&[10.0, 5.0, 1.0, 8.0], 0, 10_000, 7);
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_worst_rarely_wins_k3() {
        // The worst of four wins only when all three draws hit it: 1/64.
        let counts = pick(&[10.0, 5.0, 1.0, 8.0], 3, 10_000, 11);
        assert!(counts[0] < 400, "worst selected too often: {counts:?}");
    }

    #[test]
    fn test_single_candidate() {
        let mut rng = create_rng(42);
        assert_eq!(tournament(&[5.0], 3, &mut rng, |c| *c), 0);
    }

    #[test]
    fn test_equal_costs_roughly_uniform() {
        let counts = pick(&[5.0, 5.0, 5.0, 5.0], 2, 10_000, 42);
        for &c in &counts {
            assert!(
                c > 1500,
                "expected roughly uniform with equal cost, got {counts:?}"
            );
        }
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let empty: Vec<f64> = vec![];
        let mut rng = create_rng(42);
        tournament(&empty, 3, &mut rng, |c| *c);
    }
}
