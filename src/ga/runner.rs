//! Bounded evolutionary runs.
//!
//! [`GaRunner`] owns the loop a driver would otherwise write by hand:
//! build a population → advance → observe → repeat, until a generation
//! budget, a stagnation limit, a time limit or a cancellation flag stops it.

use super::config::GaConfig;
use super::population::Population;
use crate::error::Result;
use crate::geometry::Point;
use crate::random::rng_from_seed;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Upper bound on history entries reserved up front; unbounded runs grow it
/// on demand.
const HISTORY_PREALLOC: usize = 4096;

/// Result of a GA run.
///
/// Contains the best tour found, along with statistics about the
/// evolutionary process.
#[derive(Debug, Clone, PartialEq)]
pub struct GaResult {
    /// The shortest tour found during the entire run.
    pub best_tour: Vec<Point>,

    /// Length of `best_tour`.
    pub best_distance: f64,

    /// Shortest tour length of the initial population.
    pub initial_distance: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Whether the run hit its wall-clock limit.
    pub timed_out: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best-ever distance after generation 0 and after each generation.
    pub distance_history: Vec<f64>,
}

/// Executes a GA run over a point set.
///
/// # Usage
///
/// ```
/// use u_tspga::ga::{GaConfig, GaRunner};
/// use u_tspga::geometry::Point;
///
/// let square = vec![
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ];
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(100)
///     .with_seed(42);
///
/// let result = GaRunner::run(square, &config).unwrap();
/// assert!((result.best_distance - 4.0).abs() < 1e-9);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA.
    ///
    /// Fails with an invalid-configuration error before any work is done
    /// if `config` or `points` are unusable.
    pub fn run(points: Vec<Point>, config: &GaConfig) -> Result<GaResult> {
        Self::run_with_observer(points, config, None, |_| {})
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA will
    /// stop before the next generation and return the best tour found so
    /// far.
    pub fn run_with_cancel(
        points: Vec<Point>,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        Self::run_with_observer(points, config, cancel, |_| {})
    }

    /// Runs the GA, calling `observer` with the population after the
    /// initial generation and after every advance.
    ///
    /// This is where a driver reads the current and best-ever tours to
    /// render them.
    #[instrument(
        level = "debug",
        skip(points, config, cancel, observer),
        fields(points = points.len(), max_generations = config.max_generations)
    )]
    pub fn run_with_observer<F>(
        points: Vec<Point>,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: F,
    ) -> Result<GaResult>
    where
        F: FnMut(&Population),
    {
        config.validate()?;

        let mut rng = rng_from_seed(config.seed);
        let started = Instant::now();

        let mut population = Population::new(config, points, &mut rng)?;
        observer(&population);

        let mut history = Vec::with_capacity(config.max_generations.min(HISTORY_PREALLOC) + 1);
        history.push(population.best_ever().distance());

        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut timed_out = false;
        let mut cancelled = false;

        while population.generation_number() < config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    timed_out = true;
                    break;
                }
            }

            let previous_best = population.best_ever().distance();
            population.advance(&mut rng)?;
            observer(&population);

            let best = population.best_ever().distance();
            history.push(best);

            if best < previous_best {
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        let best = population.best_ever();
        tracing::debug!(
            generations = population.generation_number(),
            best_distance = best.distance(),
            stagnated,
            timed_out,
            cancelled,
            "run finished"
        );

        Ok(GaResult {
            best_tour: best.chromosome().to_vec(),
            best_distance: best.distance(),
            initial_distance: population.initial_distance(),
            generations: population.generation_number(),
            stagnated,
            timed_out,
            cancelled,
            distance_history: history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
