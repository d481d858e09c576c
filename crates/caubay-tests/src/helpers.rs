//! Shared helpers for the integration tests.

use caubay_core::constants::{CONFLUENCES, RIVER_LENGTH};
use caubay_core::types::{Constraint, Indicator, WaterQualitySample};

/// Closed spans `[start, end]` covered by each open reach together with its
/// bounding waypoints: origin or exit upstream, approach or river end below.
pub fn reach_spans() -> Vec<(f64, f64)> {
    let mut starts = vec![0.0];
    starts.extend(CONFLUENCES.iter().map(|c| c.exit()));
    let mut ends: Vec<f64> = CONFLUENCES.iter().map(|c| c.approach()).collect();
    ends.push(RIVER_LENGTH);
    starts.into_iter().zip(ends).collect()
}

/// Position at fraction `f` of the span.
pub fn lerp((start, end): (f64, f64), f: f64) -> f64 {
    start + f * (end - start)
}

/// Largest per-indicator absolute difference between two samples.
pub fn max_abs_diff(a: &WaterQualitySample, b: &WaterQualitySample) -> f64 {
    Indicator::ALL.iter().map(|&i| (a.get(i) - b.get(i)).abs()).fold(0.0, f64::max)
}

/// Indicators whose value moves against their allowed direction from
/// `upstream` to `downstream`.
pub fn direction_violations(
    upstream: &WaterQualitySample,
    downstream: &WaterQualitySample,
) -> Vec<Indicator> {
    Indicator::ALL
        .into_iter()
        .filter(|&i| match i.constraint() {
            Constraint::Decreasing => downstream.get(i) > upstream.get(i),
            Constraint::Increasing => downstream.get(i) < upstream.get(i),
            Constraint::None => false,
        })
        .collect()
}

/// Every field finite and non-negative.
pub fn is_physical(sample: &WaterQualitySample) -> bool {
    Indicator::ALL.iter().all(|&i| {
        let v = sample.get(i);
        v.is_finite() && v >= 0.0
    })
}
