//! Open reaches and the segment interpolator.
//!
//! A reach carries a starting state (the origin or the previous confluence's
//! exit) downstream at a constant mainstream flow. Travel time is measured
//! from the reach datum: the head of the river for the first reach, the
//! upstream structure midpoint for the others.
//!
//! The fitted curves turn over inside long reaches (for example `D_NH41`
//! peaks after 575 minutes), which would make a raw decay reverse direction
//! part-way down. The interpolator therefore holds the most adverse
//! transformation reached so far: for each indicator it records the local
//! maxima of the signed transformation over the reach once, and a query at
//! travel time `t` uses the largest of 0, the value at `t`, and any recorded
//! maximum before `t`.

use caubay_core::constants::INDICATOR_COUNT;
use caubay_core::types::{Concentrations, Constraint, Indicator};

use crate::constraint::enforce_downstream;
use crate::flow::travel_time;
use crate::kinetics::{transformation, transformation_slope};

/// Grid cells scanned for sign changes of the transformation slope.
const SCAN_STEPS: usize = 64;

/// Bisection rounds per turning point; brackets shrink below f64 resolution.
const BISECTION_ROUNDS: usize = 64;

/// `+1` when the indicator falls downstream, `-1` when it rises.
fn orientation(indicator: Indicator) -> f64 {
    match indicator.constraint() {
        Constraint::Increasing => -1.0,
        _ => 1.0,
    }
}

/// A local maximum of the signed transformation at travel time `minutes`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Peak {
    minutes: f64,
    held: f64,
}

/// One open reach of the river, ready to interpolate.
#[derive(Debug, Clone)]
pub struct Reach {
    /// Zero-based downstream order.
    pub index: usize,
    /// Position of the starting waypoint.
    pub start_position: f64,
    /// Position from which travel time is measured.
    pub datum: f64,
    /// Downstream end: the next approach offset, or the river end.
    pub end_position: f64,
    /// Mainstream flow through the reach.
    pub flow: f64,
    /// Water temperature, °C.
    pub temperature: f64,
    /// State at `start_position`; every interpolated value is constrained
    /// against it.
    pub start: Concentrations,
    peaks: [Vec<Peak>; INDICATOR_COUNT],
}

impl Reach {
    pub fn new(
        index: usize,
        start_position: f64,
        datum: f64,
        end_position: f64,
        flow: f64,
        temperature: f64,
        start: Concentrations,
    ) -> Self {
        let horizon = travel_time(end_position - datum, flow);
        let peaks = Indicator::ALL.map(|indicator| find_peaks(indicator, horizon, temperature));
        Self { index, start_position, datum, end_position, flow, temperature, start, peaks }
    }

    /// Minutes of travel from the datum to `position`.
    pub fn travel_time(&self, position: f64) -> f64 {
        travel_time(position - self.datum, self.flow)
    }

    /// Signed transformation for `indicator` held at its most adverse value
    /// over `[0, minutes]`; never negative.
    fn held_transformation(&self, indicator: Indicator, minutes: f64) -> f64 {
        let sign = orientation(indicator);
        let current = sign * transformation(indicator, minutes, self.temperature);
        self.peaks[indicator as usize]
            .iter()
            .take_while(|p| p.minutes <= minutes)
            .fold(current.max(0.0), |acc, p| acc.max(p.held))
    }

    /// Concentrations at `position`, decayed from the reach start and
    /// constrained against it.
    pub fn concentrations_at(&self, position: f64) -> Concentrations {
        let minutes = self.travel_time(position);
        let candidate = Concentrations::from_fn(|indicator| {
            let held = self.held_transformation(indicator, minutes);
            self.start.get(indicator) - orientation(indicator) * held
        });
        enforce_downstream(&candidate, &self.start)
    }
}

/// Local maxima of the signed transformation on `(0, horizon]`, in order.
fn find_peaks(indicator: Indicator, horizon: f64, temperature: f64) -> Vec<Peak> {
    let mut peaks = Vec::new();
    if !(horizon.is_finite() && horizon > 0.0) {
        return peaks;
    }
    let sign = orientation(indicator);
    let slope = |t: f64| sign * transformation_slope(indicator, t, temperature);
    let step = horizon / SCAN_STEPS as f64;

    let mut lo = step / 1024.0;
    let mut lo_slope = slope(lo);
    for k in 1..=SCAN_STEPS {
        let hi = step * k as f64;
        let hi_slope = slope(hi);
        if lo_slope > 0.0 && hi_slope <= 0.0 {
            let minutes = bisect_descent(&slope, lo, hi);
            let held = sign * transformation(indicator, minutes, temperature);
            if held.is_finite() {
                peaks.push(Peak { minutes, held });
            }
        }
        lo = hi;
        lo_slope = hi_slope;
    }
    peaks
}

/// Locate where `slope` changes from positive to non-positive in `[lo, hi]`.
fn bisect_descent(slope: &impl Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> f64 {
    for _ in 0..BISECTION_ROUNDS {
        let mid = 0.5 * (lo + hi);
        if slope(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
