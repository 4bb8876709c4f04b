//! GA configuration.
//!
//! [`GaConfig`] holds the run-wide parameters of a population and the
//! termination settings used by [`GaRunner`](super::GaRunner).

use super::selection::DEFAULT_TOURNAMENT_SIZE;
use crate::error::{Error, Result};

/// Configuration for the tour-evolving GA.
///
/// # Defaults
///
/// ```
/// use u_tspga::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.tournament_size, 3);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_tspga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_elitism_fraction(0.1)
///     .with_mutation_rate(0.2)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
///
/// Builders store values as given; [`validate`](Self::validate) rejects
/// anything out of range.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of tours per generation.
    ///
    /// Constant for the whole run. Must be at least 1.
    pub population_size: usize,

    /// Probability that a mated pair is recombined (0.0–1.0).
    ///
    /// When crossover is not applied, both parents are cloned instead.
    pub crossover_rate: f64,

    /// Probability that a freshly produced tour is mutated (0.0–1.0).
    pub mutation_rate: f64,

    /// Fraction of the population carried over unchanged (0.0–1.0).
    ///
    /// `floor(elitism_fraction × population_size)` of the shortest tours
    /// survive each generation.
    pub elitism_fraction: f64,

    /// Number of candidates drawn per tournament.
    pub tournament_size: usize,

    /// Maximum number of generations a [`GaRunner`](super::GaRunner) run
    /// executes.
    pub max_generations: usize,

    /// Generations without a new best tour before a runner stops.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock limit for a runner, in milliseconds.
    ///
    /// Checked at the start of each generation, so a run may exceed it by
    /// one generation's worth of work.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            elitism_fraction: 0.1,
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
            max_generations: 500,
            stagnation_limit: 50,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the elitism fraction.
    pub fn with_elitism_fraction(mut self, fraction: f64) -> Self {
        self.elitism_fraction = fraction;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Number of elites kept per generation.
    pub fn elite_count(&self) -> usize {
        let count = (self.elitism_fraction * self.population_size as f64).floor() as usize;
        count.min(self.population_size)
    }

    /// Validates the configuration.
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first invalid
    /// parameter.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 1 {
            return Err(invalid("population_size must be at least 1"));
        }
        check_unit("crossover_rate", self.crossover_rate)?;
        check_unit("mutation_rate", self.mutation_rate)?;
        check_unit("elitism_fraction", self.elitism_fraction)?;
        if self.tournament_size < 1 {
            return Err(invalid("tournament_size must be at least 1"));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        if self.time_limit_ms == Some(0) {
            return Err(invalid("time_limit_ms must be positive or None"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> Error {
    Error::InvalidConfiguration(msg.to_string())
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
