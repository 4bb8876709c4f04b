//! Steady-state genetic algorithm over closed tours.
//!
//! A [`Population`] holds one generation of [`Individual`] tours over a
//! fixed point set and replaces it wholesale on every
//! [`advance`](Population::advance): elites carry over by reference, the
//! rest is filled by mating tournament-selected parents.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Run parameters (population size, rates, termination)
//! - [`Individual`]: A tour with its cached length and mutation operators
//! - [`Population`]: Generation, fitness bookkeeping, selection, elitism
//! - [`GaRunner`]: Executes a bounded run and returns a [`GaResult`]
//!
//! # Submodules
//!
//! - [`operators`]: Slice-level crossover and reversal primitives
//! - [`selection`]: Tournament selection
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Larrañaga et al. (1999), "Genetic Algorithms for the Travelling Salesman
//!   Problem: A Review of Representations and Operators"

mod config;
mod individual;
pub mod operators;
mod population;
mod runner;
pub mod selection;

pub use config::GaConfig;
pub use individual::Individual;
pub use population::{FitnessScore, GenerationStats, Population};
pub use runner::{GaResult, GaRunner};
