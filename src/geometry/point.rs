//! Plane points used as tour genes.

use rand::Rng;
use std::hash::{Hash, Hasher};

/// An immutable 2-D coordinate.
///
/// Points are compared and hashed by value, so two tours can be recombined
/// without caring where each copy of a point lives in memory.
///
/// `Eq` and `Hash` assume finite coordinates; `-0.0` and `0.0` are treated
/// as the same coordinate. Non-finite points are rejected before a
/// population is built.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn canonical_bits(v: f64) -> u64 {
        // Collapse -0.0 onto 0.0 so Hash agrees with PartialEq.
        if v == 0.0 {
            0
        } else {
            v.to_bits()
        }
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Self::canonical_bits(self.x).hash(state);
        Self::canonical_bits(self.y).hash(state);
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Scatters `n` points uniformly over a `width × height` canvas.
///
/// Coordinates fall in `[0, width) × [0, height)`; degenerate extents
/// collapse to zero on that axis.
pub fn random_points<R: Rng>(n: usize, width: f64, height: f64, rng: &mut R) -> Vec<Point> {
    (0..n)
        .map(|_| Point {
            x: rng.random::<f64>() * width.max(0.0),
            y: rng.random::<f64>() * height.max(0.0),
        })
        .collect()
}
