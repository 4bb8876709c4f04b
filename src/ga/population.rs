//! A generation of tours and the generational step.

use super::config::GaConfig;
use super::individual::Individual;
use super::selection::tournament;
use crate::error::{Error, Result};
use crate::geometry::{DistanceOracle, Point};
use crate::random::shuffle;
use rand::Rng;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::instrument;

/// Reporting fitness of one tour.
///
/// `raw` is `1 / distance`; `normalized` is `raw` divided by the
/// generation's total raw fitness. Neither value takes part in selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessScore {
    /// Inverse tour length.
    pub raw: f64,
    /// Share of the generation's total raw fitness.
    pub normalized: f64,
}

/// Summary of the current generation, for display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation counter (0 for the initial population).
    pub generation: usize,
    /// Shortest tour in the current generation.
    pub fittest_distance: f64,
    /// Mean tour length of the current generation.
    pub mean_distance: f64,
    /// Longest tour in the current generation.
    pub worst_distance: f64,
    /// Shortest tour seen so far.
    pub best_ever_distance: f64,
    /// Shortest tour of the initial population.
    pub initial_distance: f64,
    /// Tours produced since the run started.
    pub individuals_screened: u64,
}

/// One generation of tours over a fixed point set.
///
/// Tours are shared as `Rc<Individual>` and never change once they are part
/// of a generation, so elites move into the next generation by reference.
///
/// # Usage
///
/// ```
/// use u_tspga::ga::{GaConfig, Population};
/// use u_tspga::geometry::random_points;
/// use u_tspga::random::create_rng;
///
/// let mut rng = create_rng(42);
/// let points = random_points(12, 400.0, 300.0, &mut rng);
/// let config = GaConfig::default().with_population_size(30);
///
/// let mut population = Population::new(&config, points, &mut rng).unwrap();
/// let start = population.best_ever().distance();
/// for _ in 0..50 {
///     population.advance(&mut rng).unwrap();
/// }
/// assert_eq!(population.generation_number(), 50);
/// assert!(population.best_ever().distance() <= start);
/// ```
#[derive(Debug)]
pub struct Population {
    config: GaConfig,
    points: Vec<Point>,
    oracle: Rc<DistanceOracle>,
    generation: Vec<Rc<Individual>>,
    fitness: Vec<FitnessScore>,
    total_fitness: f64,
    generation_number: usize,
    best_ever: Rc<Individual>,
    initial_distance: f64,
}

impl Population {
    /// Builds generation 0 from independent uniform shuffles of `points`.
    ///
    /// Fails with [`Error::InvalidConfiguration`] when `config` does not
    /// validate or `points` is empty, holds a non-finite coordinate or
    /// repeats a point.
    #[instrument(
        level = "debug",
        skip(config, points, rng),
        fields(points = points.len(), population_size = config.population_size)
    )]
    pub fn new<R: Rng>(config: &GaConfig, points: Vec<Point>, rng: &mut R) -> Result<Self> {
        config.validate()?;
        validate_points(&points)?;

        let oracle = Rc::new(DistanceOracle::with_point_count(points.len()));
        let generation: Vec<Rc<Individual>> = (0..config.population_size)
            .map(|_| {
                let mut chromosome = points.clone();
                shuffle(&mut chromosome, rng);
                Rc::new(Individual::new(
                    chromosome,
                    config.mutation_rate,
                    Rc::clone(&oracle),
                ))
            })
            .collect();

        let best_ever = Rc::clone(&generation[fittest_index(&generation)]);
        let initial_distance = best_ever.distance();
        tracing::debug!(initial_distance, "initial population created");

        let mut population = Self {
            config: config.clone(),
            points,
            oracle,
            generation,
            fitness: Vec::new(),
            total_fitness: 0.0,
            generation_number: 0,
            best_ever,
            initial_distance,
        };
        population.assign_fitness();
        Ok(population)
    }

    /// Replaces the generation with the next one.
    ///
    /// Elites are carried over first, then tournament-selected pairs are
    /// mated until the generation is full (the last pair may overshoot by
    /// one and is truncated). The best-ever tour is replaced only by a
    /// strictly shorter one.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        let size = self.config.population_size;
        let k = self.config.tournament_size;

        let mut next: Vec<Rc<Individual>> = Vec::with_capacity(size + 1);
        if self.config.elitism_fraction > 0.0 {
            next.extend(self.take_elites());
        }

        while next.len() < size {
            let first = Rc::clone(self.select_parent(k, rng));
            let second = Rc::clone(self.select_parent(k, rng));
            let (a, b) = first.mate(&second, self.config.crossover_rate, rng)?;
            next.push(Rc::new(a));
            next.push(Rc::new(b));
        }
        next.truncate(size);

        self.generation = next;
        self.generation_number += 1;
        self.assign_fitness();

        let fittest = Rc::clone(self.fittest());
        if fittest.distance() < self.best_ever.distance() {
            tracing::debug!(
                generation = self.generation_number,
                previous = self.best_ever.distance(),
                distance = fittest.distance(),
                "new best tour"
            );
            self.best_ever = fittest;
        }
        tracing::trace!(
            generation = self.generation_number,
            fittest = self.fittest().distance(),
            "generation advanced"
        );
        Ok(())
    }

    /// Tournament selection over the current generation.
    ///
    /// Draws `k` tours uniformly with replacement and returns the shortest.
    pub fn select_parent<R: Rng>(&self, k: usize, rng: &mut R) -> &Rc<Individual> {
        let idx = tournament(&self.generation, k, rng, |ind| ind.distance());
        &self.generation[idx]
    }

    /// The `floor(elitism_fraction × size)` shortest tours, shortest first.
    ///
    /// Equal lengths keep their generation order. The returned handles
    /// point at the same tours as the current generation.
    pub fn take_elites(&self) -> Vec<Rc<Individual>> {
        let mut sorted: Vec<&Rc<Individual>> = self.generation.iter().collect();
        sorted.sort_by(|a, b| a.distance().total_cmp(&b.distance()));
        sorted
            .into_iter()
            .take(self.config.elite_count())
            .map(Rc::clone)
            .collect()
    }

    /// Recomputes raw and normalized fitness for the current generation.
    ///
    /// Zero-length tours (single-point runs) have infinite raw fitness; the
    /// normalized share is then split evenly among them.
    fn assign_fitness(&mut self) {
        let raw: Vec<f64> = self
            .generation
            .iter()
            .map(|ind| 1.0 / ind.distance())
            .collect();
        let total: f64 = raw.iter().sum();
        let unbounded = raw.iter().filter(|r| r.is_infinite()).count();

        self.total_fitness = total;
        self.fitness = raw
            .into_iter()
            .map(|raw| {
                let normalized = if unbounded > 0 {
                    if raw.is_infinite() {
                        1.0 / unbounded as f64
                    } else {
                        0.0
                    }
                } else {
                    raw / total
                };
                FitnessScore { raw, normalized }
            })
            .collect();
    }

    /// The shortest tour of the current generation (earliest on ties).
    pub fn fittest(&self) -> &Rc<Individual> {
        &self.generation[fittest_index(&self.generation)]
    }

    /// The shortest tour seen across all generations.
    pub fn best_ever(&self) -> &Rc<Individual> {
        &self.best_ever
    }

    /// Number of completed [`advance`](Self::advance) calls.
    pub fn generation_number(&self) -> usize {
        self.generation_number
    }

    /// Tours per generation.
    pub fn size(&self) -> usize {
        self.config.population_size
    }

    /// The current generation.
    pub fn generation(&self) -> &[Rc<Individual>] {
        &self.generation
    }

    /// The fixed point set, in the order it was supplied.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Parameters this population was built with.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Reporting fitness, parallel to [`generation`](Self::generation).
    pub fn fitness(&self) -> &[FitnessScore] {
        &self.fitness
    }

    /// Sum of raw fitness over the current generation.
    pub fn total_fitness(&self) -> f64 {
        self.total_fitness
    }

    /// Shortest tour length of generation 0.
    pub fn initial_distance(&self) -> f64 {
        self.initial_distance
    }

    /// Tours produced so far: `generation_number × size`.
    pub fn individuals_screened(&self) -> u64 {
        self.generation_number as u64 * self.config.population_size as u64
    }

    /// Number of point orderings, `n!`, as a float (infinite past 170).
    pub fn possible_routes(&self) -> f64 {
        (1..=self.points.len()).fold(1.0, |acc, k| acc * k as f64)
    }

    /// The distance cache shared by every tour of this population.
    pub fn oracle(&self) -> &DistanceOracle {
        &self.oracle
    }

    /// Snapshot of the current generation for display.
    pub fn stats(&self) -> GenerationStats {
        let distances = self.generation.iter().map(|ind| ind.distance());
        let worst = distances.clone().fold(f64::NEG_INFINITY, f64::max);
        let mean = distances.sum::<f64>() / self.generation.len() as f64;

        GenerationStats {
            generation: self.generation_number,
            fittest_distance: self.fittest().distance(),
            mean_distance: mean,
            worst_distance: worst,
            best_ever_distance: self.best_ever.distance(),
            initial_distance: self.initial_distance,
            individuals_screened: self.individuals_screened(),
        }
    }
}

/// Index of the shortest tour; the first one wins ties.
fn fittest_index(generation: &[Rc<Individual>]) -> usize {
    let mut best = 0;
    for (i, ind) in generation.iter().enumerate().skip(1) {
        if ind.distance() < generation[best].distance() {
            best = i;
        }
    }
    best
}

fn validate_points(points: &[Point]) -> Result<()> {
    if points.is_empty() {
        return Err(Error::InvalidConfiguration(
            "at least one point is required".to_string(),
        ));
    }
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(Error::InvalidConfiguration(format!(
            "point coordinates must be finite, got ({}, {})",
            p.x, p.y
        )));
    }
    let mut seen = HashSet::with_capacity(points.len());
    if let Some(p) = points.iter().find(|p| !seen.insert(**p)) {
        return Err(Error::InvalidConfiguration(format!(
            "duplicate point ({}, {})",
            p.x, p.y
        )));
    }
    Ok(())
}
