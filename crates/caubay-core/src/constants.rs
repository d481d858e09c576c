//! Fixed river topology. All positions are metres from the Sài Đồng outfall.
//!
//! The waterway never changes at runtime: four confluences, each a 4 m wide
//! sluice structure, split it into five open reaches.

use crate::types::{Confluence, CriticalPosition, Station};

/// Total modelled length of the waterway, Sài Đồng to Xuân Thụy.
pub const RIVER_LENGTH: f64 = 8013.0;

/// Distance from a structure midpoint to its approach and exit samples.
pub const STRUCTURE_OFFSET: f64 = 2.0;

pub const CONFLUENCE_COUNT: usize = 4;

/// Reported pollutant indicators.
pub const INDICATOR_COUNT: usize = 5;

/// Origin plus approach, structure and exit for every confluence.
pub const WAYPOINT_COUNT: usize = 1 + 3 * CONFLUENCE_COUNT;

/// Open decay intervals: one before each confluence plus the tail reach.
pub const REACH_COUNT: usize = CONFLUENCE_COUNT + 1;

/// Confluences in downstream order.
///
/// # Examples
///
/// ```
/// use caubay_core::constants::CONFLUENCES;
/// assert_eq!(CONFLUENCES[0].name, "Đài Tư");
/// assert_eq!(CONFLUENCES[0].approach(), 1110.0);
/// assert_eq!(CONFLUENCES[0].exit(), 1114.0);
/// ```
pub const CONFLUENCES: [Confluence; CONFLUENCE_COUNT] = [
    Confluence { index: 0, name: "Đài Tư", midpoint: 1112.0 },
    Confluence { index: 1, name: "An Lạc", midpoint: 3170.0 },
    Confluence { index: 2, name: "Trâu Quỳ", midpoint: 4590.0 },
    Confluence { index: 3, name: "Đa Tốn", midpoint: 7070.0 },
];

/// Named stations shown to users. Not used in any computation.
pub const STATIONS: [Station; 6] = [
    Station { name: "Sài Đồng", position: 0.0 },
    Station { name: "Đài Tư", position: 1112.0 },
    Station { name: "An Lạc", position: 3170.0 },
    Station { name: "Trâu Quỳ", position: 4590.0 },
    Station { name: "Đa Tốn", position: 7070.0 },
    Station { name: "Xuân Thụy", position: RIVER_LENGTH },
];

/// Positions every chart or table must include: the origin, the three
/// samples around each confluence, and the river end.
pub const CRITICAL_POSITIONS: [f64; WAYPOINT_COUNT + 1] = [
    0.0, 1110.0, 1112.0, 1114.0, 3168.0, 3170.0, 3172.0, 4588.0, 4590.0, 4592.0, 7068.0, 7070.0,
    7072.0, RIVER_LENGTH,
];

/// Look up the station sitting exactly at `position`, if any.
pub fn station_at(position: f64) -> Option<&'static Station> {
    STATIONS.iter().find(|s| s.position == position)
}

/// [`CRITICAL_POSITIONS`] with human-readable labels.
///
/// Stations keep their own names; the samples around a structure are
/// labelled relative to it.
pub fn critical_positions() -> Vec<CriticalPosition> {
    let mut out = Vec::with_capacity(CRITICAL_POSITIONS.len());
    out.push(CriticalPosition { position: 0.0, label: STATIONS[0].name.to_string() });
    for c in &CONFLUENCES {
        out.push(CriticalPosition { position: c.approach(), label: format!("before {}", c.name) });
        out.push(CriticalPosition { position: c.midpoint, label: c.name.to_string() });
        out.push(CriticalPosition { position: c.exit(), label: format!("after {}", c.name) });
    }
    out.push(CriticalPosition {
        position: RIVER_LENGTH,
        label: STATIONS[STATIONS.len() - 1].name.to_string(),
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confluences_strictly_ordered() {
        for pair in CONFLUENCES.windows(2) {
            assert!(
                pair[0].exit() < pair[1].approach(),
                "{} overlaps {}",
                pair[0].name,
                pair[1].name
            );
        }
        assert!(CONFLUENCES[0].approach() > 0.0);
        assert!(CONFLUENCES[CONFLUENCE_COUNT - 1].exit() < RIVER_LENGTH);
    }

    #[test]
    fn confluence_index_matches_slot() {
        for (i, c) in CONFLUENCES.iter().enumerate() {
            assert_eq!(c.index, i);
        }
    }

    #[test]
    fn critical_positions_cover_every_waypoint() {
        let mut expected = vec![0.0];
        for c in &CONFLUENCES {
            expected.extend([c.approach(), c.midpoint, c.exit()]);
        }
        expected.push(RIVER_LENGTH);
        assert_eq!(CRITICAL_POSITIONS.to_vec(), expected);
    }

    #[test]
    fn critical_positions_strictly_increasing() {
        for pair in CRITICAL_POSITIONS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn stations_sit_on_origin_midpoints_and_end() {
        assert_eq!(STATIONS[0].position, 0.0);
        for (station, confluence) in STATIONS[1..5].iter().zip(CONFLUENCES.iter()) {
            assert_eq!(station.position, confluence.midpoint);
            assert_eq!(station.name, confluence.name);
        }
        assert_eq!(STATIONS[5].position, RIVER_LENGTH);
    }

    #[test]
    fn labelled_critical_positions() {
        let labelled = critical_positions();
        let positions: Vec<f64> = labelled.iter().map(|c| c.position).collect();
        assert_eq!(positions, CRITICAL_POSITIONS.to_vec());
        assert_eq!(labelled[0].label, "Sài Đồng");
        assert_eq!(labelled[1].label, "before Đài Tư");
        assert_eq!(labelled[2].label, "Đài Tư");
        assert_eq!(labelled[3].label, "after Đài Tư");
        assert_eq!(labelled[13].label, "Xuân Thụy");
    }

    #[test]
    fn station_lookup() {
        assert_eq!(station_at(3170.0).map(|s| s.name), Some("An Lạc"));
        assert!(station_at(3171.0).is_none());
    }
}
