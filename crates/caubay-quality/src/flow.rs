//! Flow accounting: rainfall-driven flows and pollutant loads.
//!
//! Every flow and load is an affine function of rainfall intensity,
//! calibrated against the Cầu Bây catchment. Flows are in the calibration's
//! own units; only their ratios and the travel-time factor matter.

use caubay_core::constants::{CONFLUENCE_COUNT, REACH_COUNT};
use caubay_core::types::Concentrations;

/// Minutes of travel per metre for unit mainstream flow.
pub const TRAVEL_TIME_FACTOR: f64 = 480.0;

/// `intercept + slope * rainfall`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub intercept: f64,
    pub slope: f64,
}

impl Affine {
    pub const fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }

    pub fn at(&self, rainfall: f64) -> f64 {
        self.intercept + self.slope * rainfall
    }
}

/// A point where water and pollutant mass enter the river.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSource {
    pub flow: Affine,
    pub bod5_load: Affine,
    pub nh4_load: Affine,
    pub no3_load: Affine,
}

impl PointSource {
    /// Concentrations of the undiluted input: load divided by flow.
    pub fn fresh(&self, rainfall: f64) -> Concentrations {
        let q = self.flow.at(rainfall);
        Concentrations::fresh(
            self.bod5_load.at(rainfall) / q,
            self.nh4_load.at(rainfall) / q,
            self.no3_load.at(rainfall) / q,
        )
    }
}

/// Sài Đồng outfall at the head of the river.
///
/// Rain-driven loads are the runoff flow slope times event-mean
/// concentrations of 9 (BOD5), 0.56 (NH4+) and 0.14 (NO3-).
pub const ORIGIN_SOURCE: PointSource = PointSource {
    flow: Affine::new(1250.0, 13550.0),
    bod5_load: Affine::new(47625.0, 9.0 * 13550.0),
    nh4_load: Affine::new(19125.0, 0.56 * 13550.0),
    no3_load: Affine::new(313.0, 0.14 * 13550.0),
};

/// Local discharges, in the order of `caubay_core::constants::CONFLUENCES`.
pub const CONFLUENCE_SOURCES: [PointSource; CONFLUENCE_COUNT] = [
    // Đài Tư
    PointSource {
        flow: Affine::new(230.0, 3820.0),
        bod5_load: Affine::new(8736.0, 34380.0),
        nh4_load: Affine::new(3519.0, 2139.0),
        no3_load: Affine::new(58.0, 535.0),
    },
    // An Lạc
    PointSource {
        flow: Affine::new(1042.0, 18330.0),
        bod5_load: Affine::new(39688.0, 164970.0),
        nh4_load: Affine::new(15938.0, 10265.0),
        no3_load: Affine::new(260.0, 2566.0),
    },
    // Trâu Quỳ
    PointSource {
        flow: Affine::new(2317.0, 11020.0),
        bod5_load: Affine::new(88278.0, 99180.0),
        nh4_load: Affine::new(35450.0, 6171.0),
        no3_load: Affine::new(579.0, 1543.0),
    },
    // Đa Tốn
    PointSource {
        flow: Affine::new(1235.0, 6890.0),
        bod5_load: Affine::new(47054.0, 62010.0),
        nh4_load: Affine::new(18896.0, 3858.0),
        no3_load: Affine::new(309.0, 965.0),
    },
];

/// Flows for one rainfall value.
///
/// `mainstream[j]` is the flow through reach `j`: the origin flow for `j = 0`
/// and `mainstream[j - 1] + discharge[j - 1]` after each confluence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowTable {
    pub mainstream: [f64; REACH_COUNT],
    pub discharge: [f64; CONFLUENCE_COUNT],
}

impl FlowTable {
    pub fn at(rainfall: f64) -> Self {
        let discharge = CONFLUENCE_SOURCES.map(|s| s.flow.at(rainfall));
        let mut mainstream = [0.0; REACH_COUNT];
        mainstream[0] = ORIGIN_SOURCE.flow.at(rainfall);
        for (j, q) in discharge.iter().enumerate() {
            mainstream[j + 1] = mainstream[j] + q;
        }
        Self { mainstream, discharge }
    }
}

/// Minutes to travel `distance` metres at mainstream flow `flow`.
pub fn travel_time(distance: f64, flow: f64) -> f64 {
    TRAVEL_TIME_FACTOR * distance / flow
}

/// Flow-weighted average of two concentrations.
pub fn mix(upstream: f64, upstream_flow: f64, local: f64, local_flow: f64) -> f64 {
    (upstream * upstream_flow + local * local_flow) / (upstream_flow + local_flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn origin_fresh_at_zero_rain() {
        let c = ORIGIN_SOURCE.fresh(0.0);
        assert_eq!(c.bod5_m0, 47625.0 / 1250.0);
        assert_eq!(c.nh4_m1, 19125.0 / 1250.0);
        assert_eq!(c.no3, 313.0 / 1250.0);
    }

    #[test]
    fn cumulative_flows_match_closed_forms() {
        // Q2 = 1480 + 17370X, Q3 = 2522 + 35700X, Q4 = 4839 + 46720X, Q5 = 6074 + 53610X
        let x = 2.0;
        let f = FlowTable::at(x);
        assert_eq!(f.mainstream[0], 1250.0 + 13550.0 * x);
        assert_eq!(f.mainstream[1], 1480.0 + 17370.0 * x);
        assert_eq!(f.mainstream[2], 2522.0 + 35700.0 * x);
        assert_eq!(f.mainstream[3], 4839.0 + 46720.0 * x);
        assert_eq!(f.mainstream[4], 6074.0 + 53610.0 * x);
    }

    #[test]
    fn travel_time_first_approach() {
        // 480 * 1110 / 1250
        assert!((travel_time(1110.0, 1250.0) - 532800.0 / 1250.0).abs() < 1e-12);
    }

    #[test]
    fn mix_weights_by_flow() {
        assert_eq!(mix(10.0, 3.0, 20.0, 1.0), 12.5);
        assert_eq!(mix(5.0, 1.0, 5.0, 9.0), 5.0);
    }

    proptest! {
        #[test]
        fn flows_positive_for_non_negative_rain(x in 0.0f64..500.0) {
            let f = FlowTable::at(x);
            for q in f.mainstream.iter().chain(f.discharge.iter()) {
                prop_assert!(*q > 0.0);
            }
            for pair in f.mainstream.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
        }

        #[test]
        fn fresh_inputs_finite_and_positive(x in 0.0f64..500.0, which in 0usize..5) {
            let source = if which == 0 { ORIGIN_SOURCE } else { CONFLUENCE_SOURCES[which - 1] };
            let c = source.fresh(x);
            prop_assert!(c.is_finite());
            prop_assert!(c.bod5_m0 > 0.0 && c.nh4_m0 > 0.0 && c.no3 > 0.0);
        }

        #[test]
        fn mix_lies_between_inputs(
            a in 0.0f64..100.0, b in 0.0f64..100.0,
            qa in 1.0f64..1.0e6, qb in 1.0f64..1.0e6,
        ) {
            let m = mix(a, qa, b, qb);
            prop_assert!(m >= a.min(b) - 1e-9 && m <= a.max(b) + 1e-9);
        }
    }
}
