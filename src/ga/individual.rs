//! Candidate tours.

use super::operators::{
    crossover_cut, directed_order_crossover, distinct_pair, reverse_segment, two_opt_pair,
};
use crate::error::{Error, Result};
use crate::geometry::{DistanceOracle, Point};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::rc::Rc;

/// Mutation moves tried by [`Individual::mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationOp {
    ReverseSegment,
    TwoOpt,
}

/// One candidate closed tour.
///
/// The chromosome is always a permutation of the run's point set, and
/// `distance` always reflects the current chromosome. Cloning copies the
/// chromosome; the distance cache is shared.
#[derive(Debug, Clone)]
pub struct Individual {
    chromosome: Vec<Point>,
    distance: f64,
    mutation_rate: f64,
    oracle: Rc<DistanceOracle>,
}

impl Individual {
    /// Builds a tour from an ordering of the point set and evaluates it.
    pub(crate) fn new(
        chromosome: Vec<Point>,
        mutation_rate: f64,
        oracle: Rc<DistanceOracle>,
    ) -> Self {
        let mut individual = Self {
            chromosome,
            distance: 0.0,
            mutation_rate,
            oracle,
        };
        individual.evaluate();
        individual
    }

    /// The tour, in visiting order. The last point connects back to the
    /// first.
    pub fn chromosome(&self) -> &[Point] {
        &self.chromosome
    }

    /// Total closed-tour length.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Probability that [`mutate`](Self::mutate) changes this tour.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Number of points in the tour.
    pub fn len(&self) -> usize {
        self.chromosome.len()
    }

    /// Whether the tour has no points.
    pub fn is_empty(&self) -> bool {
        self.chromosome.is_empty()
    }

    /// Recomputes and stores the closed-tour length.
    pub(crate) fn evaluate(&mut self) -> f64 {
        let oracle = &self.oracle;
        let open: f64 = self
            .chromosome
            .windows(2)
            .map(|pair| oracle.distance(pair[0], pair[1]))
            .sum();
        let closing = match (self.chromosome.first(), self.chromosome.last()) {
            (Some(&first), Some(&last)) => oracle.distance(last, first),
            _ => 0.0,
        };
        self.distance = open + closing;
        self.distance
    }

    /// Applies at most one mutation, with probability `mutation_rate`.
    ///
    /// When triggered, reverse-segment and two-opt are tried in random
    /// order until one changes the tour. Returns whether the tour changed.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) -> bool {
        if rng.random::<f64>() >= self.mutation_rate {
            return false;
        }

        let mut ops = [MutationOp::ReverseSegment, MutationOp::TwoOpt];
        ops.shuffle(rng);

        for op in ops {
            let changed = match op {
                MutationOp::ReverseSegment => self.reverse_segment_mutation(rng),
                MutationOp::TwoOpt => self.two_opt_mutation(rng),
            };
            if changed {
                self.evaluate();
                return true;
            }
        }
        false
    }

    /// Reverses a random closed sub-range. Declines below two points.
    ///
    /// Does not refresh `distance`; [`mutate`](Self::mutate) does.
    fn reverse_segment_mutation<R: Rng>(&mut self, rng: &mut R) -> bool {
        let n = self.chromosome.len();
        if n < 2 {
            return false;
        }
        let (lo, hi) = distinct_pair(n, rng);
        reverse_segment(&mut self.chromosome, lo, hi);
        true
    }

    /// Greedy two-opt: reverses a random segment only if that shortens the
    /// two edges at its ends. Declines below four points.
    ///
    /// Does not refresh `distance`; [`mutate`](Self::mutate) does.
    fn two_opt_mutation<R: Rng>(&mut self, rng: &mut R) -> bool {
        let n = self.chromosome.len();
        if n < 4 {
            return false;
        }
        let (lo, hi) = two_opt_pair(n, rng);
        let c = &self.chromosome;
        let before = c[(lo + n - 1) % n];
        let after = c[(hi + 1) % n];

        let current =
            self.oracle.distance(before, c[lo]) + self.oracle.distance(c[hi], after);
        let swapped =
            self.oracle.distance(before, c[hi]) + self.oracle.distance(c[lo], after);

        if swapped < current {
            reverse_segment(&mut self.chromosome, lo, hi);
            true
        } else {
            false
        }
    }

    /// Produces two offspring with `other`.
    ///
    /// With probability `crossover_rate` each child is a directed order
    /// crossover: the first takes its slice from `self` and the rest from
    /// `other`, the second the other way round. Otherwise the children are
    /// fresh copies of `self` and `other`. Every child is mutated before it
    /// is returned.
    ///
    /// Fails with [`Error::InvariantViolation`] when the parents are not
    /// tours over the same point set.
    pub fn mate<R: Rng>(
        &self,
        other: &Individual,
        crossover_rate: f64,
        rng: &mut R,
    ) -> Result<(Individual, Individual)> {
        self.check_compatible(other)?;

        let (mut first, mut second) = if rng.random::<f64>() < crossover_rate {
            (self.recombine(other, rng)?, other.recombine(self, rng)?)
        } else {
            (self.clone(), other.clone())
        };

        first.mutate(rng);
        second.mutate(rng);
        Ok((first, second))
    }

    /// One directed crossover with `self` as donor and `filler` supplying
    /// the remaining order.
    fn recombine<R: Rng>(&self, filler: &Individual, rng: &mut R) -> Result<Individual> {
        let n = self.chromosome.len();
        if n < 2 {
            return Ok(Individual::new(
                self.chromosome.clone(),
                self.mutation_rate,
                Rc::clone(&self.oracle),
            ));
        }

        let (start, end) = crossover_cut(n, rng);
        let chromosome =
            directed_order_crossover(&self.chromosome, &filler.chromosome, start, end)
                .ok_or_else(|| {
                    Error::InvariantViolation("crossover left a slot unfilled".to_string())
                })?;

        Ok(Individual::new(chromosome, self.mutation_rate, Rc::clone(&self.oracle)))
    }

    /// Checks that both tours are permutations of the same point set.
    fn check_compatible(&self, other: &Individual) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::InvariantViolation(format!(
                "cannot mate tours of {} and {} points",
                self.len(),
                other.len()
            )));
        }
        // Tours sharing an oracle come from the same population.
        if Rc::ptr_eq(&self.oracle, &other.oracle) {
            return Ok(());
        }
        let ours: HashSet<Point> = self.chromosome.iter().copied().collect();
        let theirs: HashSet<Point> = other.chromosome.iter().copied().collect();
        if ours.len() == self.len() && ours == theirs {
            Ok(())
        } else {
            Err(Error::InvariantViolation(
                "cannot mate tours over different point sets".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::random_points;
    use crate::random::{create_rng, shuffle};
    use proptest::prelude::*;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    fn tour(points: Vec<Point>, rate: f64) -> Individual {
        let oracle = Rc::new(DistanceOracle::with_point_count(points.len()));
        Individual::new(points, rate, oracle)
    }

    fn sibling(of: &Individual, chromosome: Vec<Point>) -> Individual {
        Individual::new(chromosome, of.mutation_rate, Rc::clone(&of.oracle))
    }

    fn is_permutation_of(chromosome: &[Point], points: &[Point]) -> bool {
        let set: HashSet<Point> = chromosome.iter().copied().collect();
        chromosome.len() == points.len()
            && set.len() == points.len()
            && points.iter().all(|p| set.contains(p))
    }

    // ---- Evaluation ----

    #[test]
    fn test_evaluate_square_perimeter() {
        let ind = tour(unit_square(), 0.0);
        assert!((ind.distance() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_crossed_square() {
        let sq = unit_square();
        let ind = tour(vec![sq[0], sq[2], sq[1], sq[3]], 0.0);
        let expected = 2.0 + 2.0 * 2f64.sqrt();
        assert!((ind.distance() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_single_point_is_zero() {
        let ind = tour(vec![Point::new(3.0, 4.0)], 1.0);
        assert_eq!(ind.distance(), 0.0);
    }

    #[test]
    fn test_evaluate_two_points_counts_closing_edge() {
        let ind = tour(vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)], 0.0);
        assert!((ind.distance() - 10.0).abs() < 1e-12);
    }

    // ---- Mutation ----

    #[test]
    fn test_mutate_rate_zero_is_noop() {
        let mut rng = create_rng(42);
        let points = random_points(10, 100.0, 100.0, &mut rng);
        let mut ind = tour(points.clone(), 0.0);
        for _ in 0..100 {
            assert!(!ind.mutate(&mut rng));
        }
        assert_eq!(ind.chromosome(), points.as_slice());
    }

    #[test]
    fn test_mutate_rate_one_always_changes_when_possible() {
        let mut rng = create_rng(42);
        let points = random_points(8, 100.0, 100.0, &mut rng);
        let mut ind = tour(points.clone(), 1.0);
        for _ in 0..100 {
            // Reverse-segment always succeeds, so some operator applies.
            assert!(ind.mutate(&mut rng));
            assert!(is_permutation_of(ind.chromosome(), &points));
        }
    }

    #[test]
    fn test_mutate_refreshes_distance() {
        let mut rng = create_rng(9);
        let points = random_points(12, 100.0, 100.0, &mut rng);
        let mut ind = tour(points, 1.0);
        for _ in 0..50 {
            ind.mutate(&mut rng);
            let cached = ind.distance();
            let fresh = ind.clone().evaluate();
            assert_eq!(cached, fresh);
        }
    }

    #[test]
    fn test_single_point_never_mutates() {
        let mut rng = create_rng(1);
        let mut ind = tour(vec![Point::new(1.0, 1.0)], 1.0);
        for _ in 0..20 {
            assert!(!ind.mutate(&mut rng));
        }
        assert_eq!(ind.distance(), 0.0);
    }

    #[test]
    fn test_reverse_segment_declines_below_two() {
        let mut rng = create_rng(1);
        let mut ind = tour(vec![Point::new(1.0, 1.0)], 1.0);
        assert!(!ind.reverse_segment_mutation(&mut rng));
    }

    #[test]
    fn test_reverse_segment_two_points_swaps() {
        let mut rng = create_rng(1);
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let mut ind = tour(vec![a, b], 1.0);
        assert!(ind.reverse_segment_mutation(&mut rng));
        assert_eq!(ind.chromosome(), &[b, a]);
    }

    #[test]
    fn test_two_opt_declines_below_four() {
        let mut rng = create_rng(1);
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let mut ind = tour(pts.clone(), 1.0);
        for _ in 0..20 {
            assert!(!ind.two_opt_mutation(&mut rng));
        }
        assert_eq!(ind.chromosome(), pts.as_slice());
    }

    #[test]
    fn test_two_opt_is_neutral_on_four_points() {
        // On four points every allowed reversal only flips the tour's
        // direction, so the local edge sums always tie.
        let sq = unit_square();
        let mut rng = create_rng(3);
        let mut ind = tour(vec![sq[0], sq[2], sq[1], sq[3]], 1.0);
        for _ in 0..20 {
            assert!(!ind.two_opt_mutation(&mut rng));
        }
    }

    #[test]
    fn test_two_opt_eventually_uncrosses() {
        // 2x1 grid visited with one crossing edge pair.
        let tour_points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let mut rng = create_rng(3);
        let mut ind = tour(tour_points, 1.0);
        let initial = ind.distance();

        let mut applied = false;
        for _ in 0..500 {
            if ind.two_opt_mutation(&mut rng) {
                applied = true;
                ind.evaluate();
            }
        }
        assert!(applied, "two-opt never found the improving reversal");
        assert!(ind.distance() < initial);
        assert!(ind.distance() >= 6.0 - 1e-9, "shorter than the optimum: {}", ind.distance());
    }

    #[test]
    fn test_two_opt_leaves_optimal_square() {
        let mut rng = create_rng(3);
        let mut ind = tour(unit_square(), 1.0);
        for _ in 0..20 {
            assert!(!ind.two_opt_mutation(&mut rng));
        }
        assert_eq!(ind.chromosome(), unit_square().as_slice());
    }

    // ---- Crossover ----

    #[test]
    fn test_mate_crossover_zero_returns_clones() {
        let mut rng = create_rng(42);
        let points = random_points(9, 100.0, 100.0, &mut rng);
        let p1 = tour(points.clone(), 0.0);
        let mut shuffled = points.clone();
        shuffle(&mut shuffled, &mut rng);
        let p2 = sibling(&p1, shuffled);

        for _ in 0..20 {
            let (c1, c2) = p1.mate(&p2, 0.0, &mut rng).unwrap();
            assert_eq!(c1.chromosome(), p1.chromosome());
            assert_eq!(c2.chromosome(), p2.chromosome());
            assert_eq!(c1.distance(), p1.distance());
        }
    }

    #[test]
    fn test_mate_crossover_zero_with_mutation_keeps_point_set() {
        let mut rng = create_rng(4);
        let points = random_points(9, 100.0, 100.0, &mut rng);
        let p1 = tour(points.clone(), 1.0);
        let mut shuffled = points.clone();
        shuffle(&mut shuffled, &mut rng);
        let p2 = sibling(&p1, shuffled);

        for _ in 0..50 {
            let (c1, c2) = p1.mate(&p2, 0.0, &mut rng).unwrap();
            assert!(is_permutation_of(c1.chromosome(), &points));
            assert!(is_permutation_of(c2.chromosome(), &points));
        }
        // Parents are never touched by mating.
        assert_eq!(p1.chromosome(), points.as_slice());
    }

    #[test]
    fn test_mate_crossover_one_produces_permutations() {
        let mut rng = create_rng(42);
        let points = random_points(15, 100.0, 100.0, &mut rng);
        let p1 = tour(points.clone(), 0.0);
        let mut shuffled = points.clone();
        shuffle(&mut shuffled, &mut rng);
        let p2 = sibling(&p1, shuffled);

        for _ in 0..200 {
            let (c1, c2) = p1.mate(&p2, 1.0, &mut rng).unwrap();
            assert!(is_permutation_of(c1.chromosome(), &points));
            assert!(is_permutation_of(c2.chromosome(), &points));
        }
    }

    #[test]
    fn test_mate_single_point() {
        let mut rng = create_rng(42);
        let p = tour(vec![Point::new(2.0, 2.0)], 1.0);
        let (c1, c2) = p.mate(&p, 1.0, &mut rng).unwrap();
        assert_eq!(c1.chromosome(), p.chromosome());
        assert_eq!(c2.chromosome(), p.chromosome());
        assert_eq!(c1.distance(), 0.0);
    }

    #[test]
    fn test_mate_length_mismatch_fails() {
        let mut rng = create_rng(42);
        let a = tour(unit_square(), 0.0);
        let b = tour(unit_square()[..3].to_vec(), 0.0);
        let err = a.mate(&b, 1.0, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_mate_different_point_sets_fails() {
        let mut rng = create_rng(42);
        let a = tour(unit_square(), 0.0);
        let mut other = unit_square();
        other[3] = Point::new(5.0, 5.0);
        let b = tour(other, 0.0);
        let err = a.mate(&b, 0.0, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }

    #[test]
    fn test_mate_same_points_different_oracles_ok() {
        let mut rng = create_rng(42);
        let a = tour(unit_square(), 0.0);
        let mut reversed = unit_square();
        reversed.reverse();
        let b = tour(reversed, 0.0);
        assert!(a.mate(&b, 1.0, &mut rng).is_ok());
    }

    // ---- Properties ----

    proptest! {
        #[test]
        fn prop_operators_preserve_permutation(seed in 0u64..u64::MAX, n in 1usize..30) {
            let mut rng = create_rng(seed);
            let points = random_points(n, 1000.0, 1000.0, &mut rng);
            let p1 = tour(points.clone(), 0.5);
            let mut shuffled = points.clone();
            shuffle(&mut shuffled, &mut rng);
            let mut p2 = sibling(&p1, shuffled);

            for _ in 0..10 {
                p2.mutate(&mut rng);
                prop_assert!(is_permutation_of(p2.chromosome(), &points));

                let (c1, c2) = p1.mate(&p2, 0.7, &mut rng).unwrap();
                prop_assert!(is_permutation_of(c1.chromosome(), &points));
                prop_assert!(is_permutation_of(c2.chromosome(), &points));
            }
        }

        #[test]
        fn prop_two_opt_success_strictly_shortens(seed in 0u64..u64::MAX, n in 4usize..25) {
            let mut rng = create_rng(seed);
            let points = random_points(n, 1000.0, 1000.0, &mut rng);
            let mut ind = tour(points, 1.0);

            for _ in 0..20 {
                let before = ind.distance();
                let applied = ind.two_opt_mutation(&mut rng);
                let after = ind.evaluate();
                if applied {
                    prop_assert!(after < before, "two-opt did not shorten: {} -> {}", before, after);
                } else {
                    prop_assert_eq!(after, before);
                }
            }
        }
    }
}
