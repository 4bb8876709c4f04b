//! Memoized pairwise distances.

use super::point::Point;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

/// Lazily filled cache of Euclidean distances between points of one run.
///
/// Entries are keyed on the unordered pair, so `distance(a, b)` and
/// `distance(b, a)` share one slot. The point set of a run never changes,
/// which keeps every entry valid for the oracle's whole lifetime: at most
/// `n·(n−1)/2` distances are ever stored. Pairs with a non-finite
/// coordinate are computed on every call and never cached.
///
/// The cache uses interior mutability and is meant to be shared through
/// an `Rc` by every tour of a single population.
pub struct DistanceOracle {
    cache: RefCell<HashMap<(Point, Point), f64>>,
    lookups: Cell<u64>,
}

impl DistanceOracle {
    /// Creates an empty oracle.
    pub fn new() -> Self {
        Self::with_point_count(0)
    }

    /// Creates an oracle pre-sized for `n` points.
    pub fn with_point_count(n: usize) -> Self {
        let pairs = n.saturating_mul(n.saturating_sub(1)) / 2;
        Self {
            cache: RefCell::new(HashMap::with_capacity(pairs)),
            lookups: Cell::new(0),
        }
    }

    /// Distance between `a` and `b`.
    ///
    /// Symmetric and deterministic; the first request for a pair computes
    /// it, later requests return the cached value bit-for-bit.
    pub fn distance(&self, a: Point, b: Point) -> f64 {
        self.lookups.set(self.lookups.get() + 1);
        if a == b {
            return 0.0;
        }

        let key = if (a.x, a.y) <= (b.x, b.y) { (a, b) } else { (b, a) };
        if let Some(&d) = self.cache.borrow().get(&key) {
            return d;
        }

        let d = key.0.distance_to(&key.1);
        if a.is_finite() && b.is_finite() {
            self.cache.borrow_mut().insert(key, d);
        }
        d
    }

    /// Number of distinct pairs computed so far.
    pub fn cached_pairs(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Total number of `distance` calls served.
    pub fn lookups(&self) -> u64 {
        self.lookups.get()
    }
}

impl Default for DistanceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DistanceOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceOracle")
            .field("cached_pairs", &self.cached_pairs())
            .field("lookups", &self.lookups())
            .finish()
    }
}
