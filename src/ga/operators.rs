//! Permutation operators on tour chromosomes.
//!
//! These work on plain slices and are independent of the tour type: any
//! `Copy + Eq + Hash` gene can be recombined or reversed. [`Individual`]
//! wires them to the distance cache.
//!
//! # Crossover
//!
//! - [`directed_order_crossover`]: copy a donor slice in place, fill the
//!   remaining slots with the filler's genes in wrap-around order (an OX
//!   variant anchored at the end of the slice)
//! - [`crossover_cut`]: draw the slice bounds
//!
//! # Mutation helpers
//!
//! - [`reverse_segment`]: in-place reversal of a closed range
//! - [`distinct_pair`]: two different ordered positions
//! - [`two_opt_pair`]: two positions whose edges do not touch on the cycle
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"
//!
//! [`Individual`]: super::Individual

use rand::Rng;
use std::collections::HashSet;
use std::hash::Hash;

// ============================================================================
// Crossover
// ============================================================================

/// Picks crossover bounds `(start, end)` for a chromosome of length `n`.
///
/// `start` is uniform in `[0, n − 2]` and `end` is uniform in
/// `[start + 1, n]`, so the copied slice `start..end` is never empty and may
/// run to the end of the chromosome.
///
/// # Panics
/// Panics if `n < 2`.
pub fn crossover_cut<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    assert!(n >= 2, "crossover needs at least two genes");
    let start = rng.random_range(0..n - 1);
    let end = start + rng.random_range(1..=n - start);
    (start, end)
}

/// Builds one child from `donor` and `filler`.
///
/// 1. `donor[start..end]` is copied to the same positions.
/// 2. `filler` is walked from `end % n`, wrapping around; every gene not yet
///    in the child goes into the next free slot, also starting at `end % n`
///    and wrapping.
///
/// Returns `None` when the parents are not permutations of the same genes
/// (a slot stays empty or the filler runs past the free slots).
///
/// # Complexity
/// O(n) time, O(n) space
pub fn directed_order_crossover<T>(
    donor: &[T],
    filler: &[T],
    start: usize,
    end: usize,
) -> Option<Vec<T>>
where
    T: Copy + Eq + Hash,
{
    let n = donor.len();
    if n != filler.len() || start >= end || end > n {
        return None;
    }

    let genes: HashSet<T> = donor.iter().copied().collect();
    if genes.len() != n {
        return None;
    }

    let mut child: Vec<Option<T>> = vec![None; n];
    let mut placed: HashSet<T> = HashSet::with_capacity(n);

    for i in start..end {
        child[i] = Some(donor[i]);
        placed.insert(donor[i]);
    }

    let mut slot = end;
    for offset in 0..n {
        let gene = filler[(end + offset) % n];
        if !genes.contains(&gene) {
            return None;
        }
        if placed.insert(gene) {
            let pos = slot % n;
            if child[pos].is_some() {
                return None;
            }
            child[pos] = Some(gene);
            slot += 1;
        }
    }

    child.into_iter().collect()
}

// ============================================================================
// Mutation helpers
// ============================================================================

/// Reverses `genes[lo..=hi]` in place.
///
/// # Panics
/// Panics if `lo > hi` or `hi` is out of bounds.
pub fn reverse_segment<T>(genes: &mut [T], lo: usize, hi: usize) {
    genes[lo..=hi].reverse();
}

/// Two distinct uniform positions in `0..n`, returned as `(lo, hi)` with
/// `lo < hi`.
///
/// # Panics
/// Panics if `n < 2`.
pub fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    assert!(n >= 2, "need at least two positions");
    let a = rng.random_range(0..n);
    // Draw from the n - 1 other positions and skip over `a`.
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Two positions `(lo, hi)` on a cycle of length `n` that are neither
/// adjacent nor wrap-adjacent: `hi − lo ≥ 2` and `hi − lo ≠ n − 1`.
///
/// The first position is uniform; the second is uniform among the positions
/// that are valid partners of the first.
///
/// # Panics
/// Panics if `n < 4`.
pub fn two_opt_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    assert!(n >= 4, "two-opt needs at least four positions");
    let a = rng.random_range(0..n);
    let valid = |b: &usize| {
        let gap = a.abs_diff(*b);
        gap >= 2 && gap != n - 1
    };

    let choices = (0..n).filter(valid).count();
    let pick = rng.random_range(0..choices);
    let b = (0..n).filter(valid).nth(pick).unwrap_or(a);

    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Tests
// ============================================================================
