//! Genetic-algorithm solver for the Euclidean traveling salesman problem.
//!
//! Given a fixed set of plane points, a population of closed tours is
//! evolved toward shorter total length:
//!
//! - **Geometry**: value-typed [`Point`](geometry::Point)s and a memoized,
//!   symmetric [`DistanceOracle`](geometry::DistanceOracle) shared by every
//!   tour of a run.
//! - **Genetic Algorithm**: tours with reverse-segment and greedy two-opt
//!   mutation, directed order crossover, tournament selection, elitism and
//!   best-ever tracking.
//! - **Runner**: bounded runs with stagnation, time and cancellation limits.
//! - **Wasm** (feature `wasm`): bindings for a browser driver that animates
//!   the search.
//!
//! # Architecture
//!
//! The engine is single-threaded and synchronous. Every stochastic
//! operation takes an explicit random-number generator so that runs are
//! reproducible from a seed; rendering and timing belong to the caller.

pub mod error;
pub mod ga;
pub mod geometry;
pub mod random;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
