//! Downstream direction and sanity constraints.
//!
//! Rules, applied against the directly preceding state:
//! 1. BOD5 and NH4+ never rise downstream: a larger candidate is replaced by
//!    the reference.
//! 2. NO3- never falls downstream: a smaller candidate is replaced by the
//!    reference.
//! 3. A non-finite candidate falls back to the reference, or to 0 when the
//!    reference is not finite either.
//! 4. Concentrations are never negative.

use caubay_core::types::{Concentrations, Constraint, Indicator};
use tracing::trace;

/// Apply `constraint` to one value.
pub fn enforce(candidate: f64, reference: f64, constraint: Constraint) -> f64 {
    let value = if !candidate.is_finite() {
        if reference.is_finite() { reference } else { 0.0 }
    } else if !reference.is_finite() {
        candidate
    } else {
        match constraint {
            Constraint::Decreasing if candidate > reference => reference,
            Constraint::Increasing if candidate < reference => reference,
            _ => candidate,
        }
    };
    value.max(0.0)
}

/// Constrain a state moving along a reach: each indicator in its own direction.
pub fn enforce_downstream(candidate: &Concentrations, reference: &Concentrations) -> Concentrations {
    enforce_with(candidate, reference, Indicator::constraint)
}

/// Constrain a freshly mixed state: finiteness and sign only, since mixing
/// with a dirtier discharge legitimately raises concentrations.
pub fn enforce_mixed(candidate: &Concentrations, reference: &Concentrations) -> Concentrations {
    enforce_with(candidate, reference, |_| Constraint::None)
}

fn enforce_with(
    candidate: &Concentrations,
    reference: &Concentrations,
    constraint_for: impl Fn(Indicator) -> Constraint,
) -> Concentrations {
    Concentrations::from_fn(|indicator| {
        let c = candidate.get(indicator);
        let r = reference.get(indicator);
        let out = enforce(c, r, constraint_for(indicator));
        if out != c {
            trace!(%indicator, candidate = c, reference = r, out, "constraint applied");
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decreasing_clamps_rises() {
        assert_eq!(enforce(12.0, 10.0, Constraint::Decreasing), 10.0);
        assert_eq!(enforce(8.0, 10.0, Constraint::Decreasing), 8.0);
        assert_eq!(enforce(10.0, 10.0, Constraint::Decreasing), 10.0);
    }

    #[test]
    fn increasing_clamps_falls() {
        assert_eq!(enforce(0.2, 0.4, Constraint::Increasing), 0.4);
        assert_eq!(enforce(0.6, 0.4, Constraint::Increasing), 0.6);
    }

    #[test]
    fn none_passes_through() {
        assert_eq!(enforce(12.0, 10.0, Constraint::None), 12.0);
        assert_eq!(enforce(8.0, 10.0, Constraint::None), 8.0);
    }

    #[test]
    fn non_finite_candidate_uses_reference() {
        assert_eq!(enforce(f64::NAN, 3.5, Constraint::Decreasing), 3.5);
        assert_eq!(enforce(f64::INFINITY, 3.5, Constraint::Increasing), 3.5);
        assert_eq!(enforce(f64::NEG_INFINITY, 3.5, Constraint::None), 3.5);
    }

    #[test]
    fn both_non_finite_yields_zero() {
        assert_eq!(enforce(f64::NAN, f64::NAN, Constraint::Decreasing), 0.0);
        assert_eq!(enforce(f64::INFINITY, f64::NAN, Constraint::Increasing), 0.0);
    }

    #[test]
    fn non_finite_reference_passes_candidate() {
        assert_eq!(enforce(4.0, f64::NAN, Constraint::Decreasing), 4.0);
    }

    #[test]
    fn never_negative() {
        assert_eq!(enforce(-1.0, 10.0, Constraint::Decreasing), 0.0);
        assert_eq!(enforce(-1.0, -2.0, Constraint::Increasing), 0.0);
    }

    #[test]
    fn downstream_uses_each_indicator_direction() {
        let reference = Concentrations::fresh(10.0, 5.0, 1.0);
        let candidate = Concentrations::fresh(11.0, 4.0, 0.5);
        let out = enforce_downstream(&candidate, &reference);
        assert_eq!(out.bod5_m0, 10.0);
        assert_eq!(out.bod5_m1, 10.0);
        assert_eq!(out.nh4_m0, 4.0);
        assert_eq!(out.nh4_m1, 4.0);
        assert_eq!(out.no3, 1.0);
    }

    #[test]
    fn mixed_keeps_rises() {
        let reference = Concentrations::fresh(10.0, 5.0, 1.0);
        let candidate = Concentrations::fresh(11.0, 6.0, 0.5);
        assert_eq!(enforce_mixed(&candidate, &reference), candidate);
    }

    proptest! {
        #[test]
        fn decreasing_never_exceeds_reference(c in -1.0e6f64..1.0e6, r in 0.0f64..1.0e6) {
            let v = enforce(c, r, Constraint::Decreasing);
            prop_assert!(v <= r);
            prop_assert!(v >= 0.0);
        }

        #[test]
        fn increasing_never_below_reference(c in -1.0e6f64..1.0e6, r in 0.0f64..1.0e6) {
            prop_assert!(enforce(c, r, Constraint::Increasing) >= r);
        }
    }
}
