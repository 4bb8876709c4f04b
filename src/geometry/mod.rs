//! Plane geometry for tours: points and the shared distance cache.

mod distance;
mod point;

pub use distance::DistanceOracle;
pub use point::{random_points, Point};
