//! The waypoint ladder: the 13 dependent states for one set of conditions.
//!
//! Built strictly downstream. Each approach depends on the previous exit (or
//! the origin), and each exit mixes its approach with the local discharge,
//! so the ladder is an explicit array filled in dependency order.

use caubay_core::constants::{CONFLUENCES, CONFLUENCE_COUNT, REACH_COUNT, RIVER_LENGTH, WAYPOINT_COUNT};
use caubay_core::types::{Concentrations, Conditions, WaterQualitySample};
use tracing::debug;

use crate::classifier::{classify, clamp_position, Regime};
use crate::constraint::enforce_mixed;
use crate::flow::{mix, FlowTable, CONFLUENCE_SOURCES, ORIGIN_SOURCE};
use crate::reach::Reach;

/// A computed state at one fixed waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Position in the ladder, 0..13.
    pub index: usize,
    pub position: f64,
    pub regime: Regime,
    pub state: Concentrations,
}

/// Waypoint states and open reaches for one (rainfall, temperature) pair.
#[derive(Debug, Clone)]
pub struct Ladder {
    pub conditions: Conditions,
    pub flows: FlowTable,
    waypoints: Vec<Waypoint>,
    reaches: Vec<Reach>,
}

impl Ladder {
    /// Evaluate all 13 waypoints. Rainfall is normalized first.
    pub fn build(conditions: &Conditions) -> Self {
        let conditions = conditions.normalized();
        let Conditions { rainfall, temperature } = conditions;
        let flows = FlowTable::at(rainfall);

        let mut waypoints = Vec::with_capacity(WAYPOINT_COUNT);
        let mut reaches = Vec::with_capacity(REACH_COUNT);

        let origin = ORIGIN_SOURCE.fresh(rainfall);
        waypoints.push(Waypoint { index: 0, position: 0.0, regime: Regime::Origin, state: origin });

        let mut start_position = 0.0;
        let mut datum = 0.0;
        let mut upstream = origin;

        for c in &CONFLUENCES {
            let i = c.index;
            let reach = Reach::new(
                i,
                start_position,
                datum,
                c.approach(),
                flows.mainstream[i],
                temperature,
                upstream,
            );
            let approach = reach.concentrations_at(c.approach());
            reaches.push(reach);

            let structure = CONFLUENCE_SOURCES[i].fresh(rainfall);
            let mixed = Concentrations::from_fn(|ind| {
                mix(approach.get(ind), flows.mainstream[i], structure.get(ind), flows.discharge[i])
            });
            let exit = enforce_mixed(&mixed, &approach);

            for (regime, state) in [
                (Regime::Approach(i), approach),
                (Regime::Structure(i), structure),
                (Regime::Exit(i), exit),
            ] {
                let index = waypoints.len();
                let position = regime.position().unwrap_or_default();
                waypoints.push(Waypoint { index, position, regime, state });
            }

            start_position = c.exit();
            datum = c.midpoint;
            upstream = exit;
        }

        reaches.push(Reach::new(
            CONFLUENCE_COUNT,
            start_position,
            datum,
            RIVER_LENGTH,
            flows.mainstream[CONFLUENCE_COUNT],
            temperature,
            upstream,
        ));

        debug!(rainfall, temperature, "waypoint ladder built");
        Self { conditions, flows, waypoints, reaches }
    }

    /// The 13 waypoints in downstream order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// The 5 open reaches in downstream order.
    pub fn reaches(&self) -> &[Reach] {
        &self.reaches
    }

    /// State stored for a waypoint regime; `None` for open reaches.
    pub fn waypoint(&self, regime: Regime) -> Option<&Waypoint> {
        regime.waypoint_index().and_then(|k| self.waypoints.get(k))
    }

    /// Full-precision state at `position` (clamped).
    pub fn concentrations_at(&self, position: f64) -> Concentrations {
        let z = clamp_position(position);
        match classify(z) {
            Regime::Reach(j) => self.reaches[j].concentrations_at(z),
            regime => self.waypoint(regime).map(|w| w.state).unwrap_or_default(),
        }
    }

    /// Floored sample at `position` (clamped).
    pub fn sample(&self, position: f64) -> WaterQualitySample {
        WaterQualitySample::from(&self.concentrations_at(position))
    }
}
