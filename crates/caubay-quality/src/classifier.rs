//! Position classification against the fixed river topology.
//!
//! Every clamped position falls in exactly one of 18 regimes: the origin,
//! three waypoints per confluence, or one of five open reaches.

use std::fmt;

use caubay_core::constants::{CONFLUENCES, CONFLUENCE_COUNT, REACH_COUNT, RIVER_LENGTH};

/// Where a query position sits relative to the 13 waypoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Regime {
    /// The head of the river, `Z == 0`.
    Origin,
    /// 2 m upstream of confluence `i`.
    Approach(usize),
    /// Midpoint of confluence `i`'s structure.
    Structure(usize),
    /// 2 m downstream of confluence `i`, after mixing.
    Exit(usize),
    /// Open interval `j`: before confluence `j`, or the tail for `j == 4`.
    Reach(usize),
}

impl Regime {
    pub const COUNT: usize = 1 + 3 * CONFLUENCE_COUNT + REACH_COUNT;

    /// All regimes in downstream order.
    pub fn all() -> impl Iterator<Item = Regime> {
        let confluences = (0..CONFLUENCE_COUNT).flat_map(|i| {
            [Regime::Reach(i), Regime::Approach(i), Regime::Structure(i), Regime::Exit(i)]
        });
        std::iter::once(Regime::Origin)
            .chain(confluences)
            .chain(std::iter::once(Regime::Reach(CONFLUENCE_COUNT)))
    }

    /// Index into the waypoint ladder, or `None` for open reaches.
    pub fn waypoint_index(self) -> Option<usize> {
        match self {
            Self::Origin => Some(0),
            Self::Approach(i) => Some(1 + 3 * i),
            Self::Structure(i) => Some(2 + 3 * i),
            Self::Exit(i) => Some(3 + 3 * i),
            Self::Reach(_) => None,
        }
    }

    /// Exact position of a waypoint regime.
    pub fn position(self) -> Option<f64> {
        match self {
            Self::Origin => Some(0.0),
            Self::Approach(i) => Some(CONFLUENCES[i].approach()),
            Self::Structure(i) => Some(CONFLUENCES[i].midpoint),
            Self::Exit(i) => Some(CONFLUENCES[i].exit()),
            Self::Reach(_) => None,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin => f.write_str("origin"),
            Self::Approach(i) => write!(f, "approach to {}", CONFLUENCES[*i].name),
            Self::Structure(i) => write!(f, "{} structure", CONFLUENCES[*i].name),
            Self::Exit(i) => write!(f, "exit from {}", CONFLUENCES[*i].name),
            Self::Reach(j) => write!(f, "reach {j}"),
        }
    }
}

/// Clamp a position into `[0, RIVER_LENGTH]`; NaN maps to the origin.
pub fn clamp_position(position: f64) -> f64 {
    if position.is_nan() {
        return 0.0;
    }
    position.clamp(0.0, RIVER_LENGTH)
}

/// Classify `position` (clamped first).
///
/// Waypoints match by exact equality. A position strictly inside a structure
/// zone snaps to the nearest of that confluence's three waypoints, with ties
/// going to the midpoint.
///
/// # Examples
///
/// ```
/// use caubay_quality::classifier::{classify, Regime};
/// assert_eq!(classify(0.0), Regime::Origin);
/// assert_eq!(classify(500.0), Regime::Reach(0));
/// assert_eq!(classify(1110.0), Regime::Approach(0));
/// assert_eq!(classify(1112.0), Regime::Structure(0));
/// assert_eq!(classify(1114.0), Regime::Exit(0));
/// assert_eq!(classify(8013.0), Regime::Reach(4));
/// ```
pub fn classify(position: f64) -> Regime {
    let z = clamp_position(position);
    if z == 0.0 {
        return Regime::Origin;
    }
    for c in &CONFLUENCES {
        if z < c.approach() {
            return Regime::Reach(c.index);
        }
        if z <= c.exit() {
            let to_mid = (z - c.midpoint).abs();
            return if z < c.midpoint && z - c.approach() < to_mid {
                Regime::Approach(c.index)
            } else if z > c.midpoint && c.exit() - z < to_mid {
                Regime::Exit(c.index)
            } else {
                Regime::Structure(c.index)
            };
        }
    }
    Regime::Reach(CONFLUENCE_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caubay_core::constants::{CRITICAL_POSITIONS, WAYPOINT_COUNT};
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn eighteen_distinct_regimes() {
        let all: Vec<Regime> = Regime::all().collect();
        assert_eq!(all.len(), Regime::COUNT);
        assert_eq!(Regime::COUNT, 18);
        let unique: HashSet<Regime> = all.iter().copied().collect();
        assert_eq!(unique.len(), 18);
    }

    #[test]
    fn waypoints_classify_to_themselves() {
        let waypoints: Vec<Regime> = Regime::all().filter(|r| r.waypoint_index().is_some()).collect();
        assert_eq!(waypoints.len(), WAYPOINT_COUNT);
        for (k, regime) in waypoints.iter().enumerate() {
            assert_eq!(regime.waypoint_index(), Some(k));
            let z = regime.position().unwrap();
            assert_eq!(classify(z), *regime, "z = {z}");
        }
    }

    #[test]
    fn every_regime_is_reachable() {
        let probes = [
            0.0, 600.0, 1110.0, 1112.0, 1114.0, 2000.0, 3168.0, 3170.0, 3172.0, 4000.0, 4588.0,
            4590.0, 4592.0, 6000.0, 7068.0, 7070.0, 7072.0, 7500.0,
        ];
        let hit: Vec<Regime> = probes.iter().map(|&z| classify(z)).collect();
        let expected: Vec<Regime> = Regime::all().collect();
        assert_eq!(hit, expected);
    }

    #[test]
    fn reach_boundaries_are_open() {
        assert_eq!(classify(1e-9), Regime::Reach(0));
        assert_eq!(classify(1109.999), Regime::Reach(0));
        assert_eq!(classify(1114.001), Regime::Reach(1));
        assert_eq!(classify(3167.5), Regime::Reach(1));
        assert_eq!(classify(7072.5), Regime::Reach(4));
    }

    #[test]
    fn structure_zone_snaps_to_nearest_waypoint() {
        assert_eq!(classify(1110.4), Regime::Approach(0));
        assert_eq!(classify(1111.0), Regime::Structure(0));
        assert_eq!(classify(1111.6), Regime::Structure(0));
        assert_eq!(classify(1112.9), Regime::Structure(0));
        assert_eq!(classify(1113.0), Regime::Structure(0));
        assert_eq!(classify(1113.2), Regime::Exit(0));
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(classify(-50.0), Regime::Origin);
        assert_eq!(classify(f64::NEG_INFINITY), Regime::Origin);
        assert_eq!(classify(f64::NAN), Regime::Origin);
        assert_eq!(classify(9013.0), Regime::Reach(4));
        assert_eq!(classify(f64::INFINITY), Regime::Reach(4));
    }

    #[test]
    fn critical_positions_hit_waypoints_or_end() {
        for &z in &CRITICAL_POSITIONS[..WAYPOINT_COUNT] {
            assert!(classify(z).waypoint_index().is_some(), "z = {z}");
        }
        assert_eq!(classify(RIVER_LENGTH), Regime::Reach(CONFLUENCE_COUNT));
    }

    #[test]
    fn display_names_confluences() {
        assert_eq!(Regime::Structure(1).to_string(), "An Lạc structure");
        assert_eq!(Regime::Reach(2).to_string(), "reach 2");
    }

    proptest! {
        #[test]
        fn reach_regimes_are_ordered(a in 0.0f64..8013.0, b in 0.0f64..8013.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let key = |r: Regime| Regime::all().position(|x| x == r).unwrap();
            prop_assert!(key(classify(lo)) <= key(classify(hi)));
        }
    }
}
