//! Longitudinal profiles for charts and tables.
//!
//! A profile samples the critical positions merged with a uniform grid, so
//! that every confluence step shows up no matter how coarse the grid is.

use caubay_core::constants::{critical_positions, CRITICAL_POSITIONS, RIVER_LENGTH};
use caubay_core::traits::ConcentrationModel;
use caubay_core::types::{Conditions, WaterQualitySample};
use serde::Serialize;

/// Finest grid spacing accepted, in metres.
pub const MIN_PROFILE_STEP: f64 = 1.0;

/// One row of a profile.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ProfilePoint {
    pub position: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub sample: WaterQualitySample,
}

/// Label of the critical position exactly at `position`, if any.
pub fn position_label(position: f64) -> Option<String> {
    critical_positions().into_iter().find(|c| c.position == position).map(|c| c.label)
}

/// Critical positions plus every multiple of `step` up to the river end,
/// sorted and without duplicates.
///
/// A non-finite or non-positive `step` yields the critical positions only;
/// smaller steps are raised to [`MIN_PROFILE_STEP`].
pub fn profile_positions(step: f64) -> Vec<f64> {
    let mut positions = CRITICAL_POSITIONS.to_vec();
    if step.is_finite() && step > 0.0 {
        let step = step.max(MIN_PROFILE_STEP);
        let cells = (RIVER_LENGTH / step).floor() as usize;
        positions.extend((0..=cells).map(|k| k as f64 * step));
    }
    positions.sort_by(f64::total_cmp);
    positions.dedup();
    positions
}

/// Sample `model` at each position, labelling the critical ones.
pub fn build_profile(
    model: &dyn ConcentrationModel,
    conditions: &Conditions,
    positions: &[f64],
) -> Vec<ProfilePoint> {
    let samples = model.sample_many(positions, conditions);
    positions
        .iter()
        .zip(samples)
        .map(|(&position, sample)| ProfilePoint { position, label: position_label(position), sample })
        .collect()
}
