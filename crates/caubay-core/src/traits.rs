//! Trait interfaces between the engine and its consumers.
//!
//! - [`ConcentrationModel`] — position → water-quality sample
//!   (caubay-quality implements; charts, tables and the CLI consume)

use crate::constants::RIVER_LENGTH;
use crate::types::{Conditions, WaterQualitySample};

/// Pure, infallible mapping from a river position to a water-quality sample.
///
/// Implementations must be deterministic: equal arguments give bit-identical
/// samples. Positions outside `[0, RIVER_LENGTH]` are clamped, never rejected.
pub trait ConcentrationModel: Send + Sync {
    /// Sample the five indicators at `position` metres under `conditions`.
    fn sample(&self, position: f64, conditions: &Conditions) -> WaterQualitySample;

    /// Sample a batch of positions under the same conditions.
    ///
    /// Default implementation calls [`sample`](Self::sample) in order.
    fn sample_many(&self, positions: &[f64], conditions: &Conditions) -> Vec<WaterQualitySample> {
        positions.iter().map(|&z| self.sample(z, conditions)).collect()
    }

    /// Sample `count` evenly spaced positions from the origin to the river end
    /// inclusive, as a chart renderer would. `count < 2` yields the origin only.
    fn sample_uniform(&self, count: usize, conditions: &Conditions) -> Vec<(f64, WaterQualitySample)> {
        if count < 2 {
            return vec![(0.0, self.sample(0.0, conditions))];
        }
        let last = (count - 1) as f64;
        (0..count)
            .map(|i| {
                let z = RIVER_LENGTH * i as f64 / last;
                (z, self.sample(z, conditions))
            })
            .collect()
    }
}
