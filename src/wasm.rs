//! WebAssembly bindings for a browser driver.
//!
//! The driver owns the canvas and the animation timer; each tick it calls
//! [`WasmTspPopulation::advance`] and reads tours back as flat
//! `[x0, y0, x1, y1, ...]` arrays.

use crate::error::{Error, Result};
use crate::ga::{GaConfig, Population};
use crate::geometry::Point;
use crate::random::create_rng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

/// A population plus the generator that drives it.
#[wasm_bindgen]
pub struct WasmTspPopulation {
    inner: Population,
    rng: StdRng,
}

#[wasm_bindgen]
impl WasmTspPopulation {
    /// Builds generation 0 over the points in `coords`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        coords: Vec<f64>,
        population_size: usize,
        crossover_rate: f64,
        mutation_rate: f64,
        elitism_fraction: f64,
        seed: u64,
    ) -> std::result::Result<WasmTspPopulation, JsValue> {
        let points = points_from_flat(&coords).map_err(to_js)?;
        let config = GaConfig::default()
            .with_population_size(population_size)
            .with_crossover_rate(crossover_rate)
            .with_mutation_rate(mutation_rate)
            .with_elitism_fraction(elitism_fraction)
            .with_seed(seed);

        let mut rng = create_rng(seed);
        let inner = Population::new(&config, points, &mut rng).map_err(to_js)?;
        Ok(Self { inner, rng })
    }

    /// Runs one generation.
    pub fn advance(&mut self) -> std::result::Result<(), JsValue> {
        self.inner.advance(&mut self.rng).map_err(to_js)
    }

    /// Runs `steps` generations.
    pub fn advance_by(&mut self, steps: u32) -> std::result::Result<(), JsValue> {
        for _ in 0..steps {
            self.advance()?;
        }
        Ok(())
    }

    /// Generations advanced so far.
    pub fn generation_number(&self) -> usize {
        self.inner.generation_number()
    }

    /// Number of tours per generation.
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    /// Length of the shortest tour seen so far.
    pub fn best_distance(&self) -> f64 {
        self.inner.best_ever().distance()
    }

    /// Length of the shortest tour in the current generation.
    pub fn fittest_distance(&self) -> f64 {
        self.inner.fittest().distance()
    }

    /// Length of the shortest tour in generation 0.
    pub fn initial_distance(&self) -> f64 {
        self.inner.initial_distance()
    }

    /// Tours produced so far, as a JS number.
    pub fn individuals_screened(&self) -> f64 {
        self.inner.individuals_screened() as f64
    }

    /// Shortest tour of the current generation, flattened.
    pub fn fittest_tour(&self) -> Vec<f64> {
        flatten(self.inner.fittest().chromosome())
    }

    /// Shortest tour seen so far, flattened.
    pub fn best_ever_tour(&self) -> Vec<f64> {
        flatten(self.inner.best_ever().chromosome())
    }

    /// [`GenerationStats`](crate::ga::GenerationStats) as a JS object.
    pub fn stats(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.stats()).map_err(JsValue::from)
    }
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Pairs up a flat coordinate array.
fn points_from_flat(coords: &[f64]) -> Result<Vec<Point>> {
    if coords.len() % 2 != 0 {
        return Err(Error::InvalidConfiguration(format!(
            "coordinate array must hold x/y pairs, got {} values",
            coords.len()
        )));
    }
    Ok(coords
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect())
}

fn flatten(tour: &[Point]) -> Vec<f64> {
    tour.iter().flat_map(|p| [p.x, p.y]).collect()
}
