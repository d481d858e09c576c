//! Core data types: environmental drivers, indicators, concentration states
//! and the floored sample handed to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{INDICATOR_COUNT, STRUCTURE_OFFSET};
use crate::error::ConditionsError;

/// Environmental drivers for one evaluation.
///
/// Supplied by the weather collaborator and passed explicitly at every call;
/// the engine never reads them from shared state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Conditions {
    /// Rainfall intensity in mm/hr.
    pub rainfall: f64,
    /// Water temperature in °C.
    pub temperature: f64,
}

impl Conditions {
    /// Build conditions without validation.
    pub fn new(rainfall: f64, temperature: f64) -> Self {
        Self { rainfall, temperature }
    }

    /// Build conditions from user input, rejecting values the flow model
    /// cannot represent.
    ///
    /// # Examples
    ///
    /// ```
    /// use caubay_core::types::Conditions;
    /// assert!(Conditions::try_new(12.5, 28.0).is_ok());
    /// assert!(Conditions::try_new(-1.0, 28.0).is_err());
    /// assert!(Conditions::try_new(0.0, f64::NAN).is_err());
    /// ```
    pub fn try_new(rainfall: f64, temperature: f64) -> Result<Self, ConditionsError> {
        if !rainfall.is_finite() {
            return Err(ConditionsError::NonFiniteRainfall(rainfall));
        }
        if rainfall < 0.0 {
            return Err(ConditionsError::NegativeRainfall(rainfall));
        }
        if !temperature.is_finite() {
            return Err(ConditionsError::NonFiniteTemperature(temperature));
        }
        Ok(Self { rainfall, temperature })
    }

    /// Rainfall forced into the domain where every flow stays positive.
    ///
    /// Negative and non-finite rainfall become 0. `-0.0` also becomes `0.0`
    /// so that both spellings share one cache key.
    pub fn normalized(&self) -> Self {
        let rainfall = if self.rainfall.is_finite() && self.rainfall > 0.0 {
            self.rainfall
        } else {
            0.0
        };
        Self { rainfall, temperature: self.temperature }
    }
}

/// Required direction of change for an indicator moving downstream.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Value may only stay level or fall (BOD5, NH4+).
    Decreasing,
    /// Value may only stay level or rise (NO3-).
    Increasing,
    /// No direction; only finiteness and sign are enforced (confluence mixing).
    None,
}

/// The five reported pollutant indicators.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    /// BOD5, estimation method 0.
    Bod5M0,
    /// BOD5, estimation method 1.
    Bod5M1,
    /// NH4+, estimation method 0.
    Nh4M0,
    /// NH4+, estimation method 1.
    Nh4M1,
    /// NO3-.
    No3,
}

impl Indicator {
    pub const ALL: [Indicator; INDICATOR_COUNT] = [
        Indicator::Bod5M0,
        Indicator::Bod5M1,
        Indicator::Nh4M0,
        Indicator::Nh4M1,
        Indicator::No3,
    ];

    /// Direction this indicator is allowed to move along a reach.
    pub fn constraint(self) -> Constraint {
        match self {
            Self::No3 => Constraint::Increasing,
            _ => Constraint::Decreasing,
        }
    }

    /// Whether the indicator is a carbonaceous (BOD) measure.
    pub fn is_bod(self) -> bool {
        matches!(self, Self::Bod5M0 | Self::Bod5M1)
    }

    /// Column heading used in tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bod5M0 => "BOD5 m0",
            Self::Bod5M1 => "BOD5 m1",
            Self::Nh4M0 => "NH4+ m0",
            Self::Nh4M1 => "NH4+ m1",
            Self::No3 => "NO3-",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full-precision concentration state (mg/L) at one point of the river.
///
/// This is what the waypoint ladder stores; callers only ever see the
/// floored [`WaterQualitySample`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Concentrations {
    pub bod5_m0: f64,
    pub bod5_m1: f64,
    pub nh4_m0: f64,
    pub nh4_m1: f64,
    pub no3: f64,
}

impl Concentrations {
    /// Build a state by evaluating `f` once per indicator.
    pub fn from_fn(mut f: impl FnMut(Indicator) -> f64) -> Self {
        Self {
            bod5_m0: f(Indicator::Bod5M0),
            bod5_m1: f(Indicator::Bod5M1),
            nh4_m0: f(Indicator::Nh4M0),
            nh4_m1: f(Indicator::Nh4M1),
            no3: f(Indicator::No3),
        }
    }

    /// A fresh point-source input: both estimation methods share one value.
    pub fn fresh(bod5: f64, nh4: f64, no3: f64) -> Self {
        Self { bod5_m0: bod5, bod5_m1: bod5, nh4_m0: nh4, nh4_m1: nh4, no3 }
    }

    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Bod5M0 => self.bod5_m0,
            Indicator::Bod5M1 => self.bod5_m1,
            Indicator::Nh4M0 => self.nh4_m0,
            Indicator::Nh4M1 => self.nh4_m1,
            Indicator::No3 => self.no3,
        }
    }

    /// Whether every field is a finite number.
    pub fn is_finite(&self) -> bool {
        Indicator::ALL.iter().all(|&i| self.get(i).is_finite())
    }
}

/// Floor `value` to two decimals; non-finite input yields 0.
///
/// A 1e-9 guard absorbs binary representation error so that, for example,
/// 0.29 floors to 0.29 rather than 0.28.
///
/// # Examples
///
/// ```
/// use caubay_core::types::floor_two_decimals;
/// assert_eq!(floor_two_decimals(0.2504), 0.25);
/// assert_eq!(floor_two_decimals(38.1), 38.1);
/// assert_eq!(floor_two_decimals(1.999), 1.99);
/// assert_eq!(floor_two_decimals(f64::NAN), 0.0);
/// ```
pub fn floor_two_decimals(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0 + 1e-9).floor() / 100.0
}

/// The five-indicator result returned to callers.
///
/// Every field is finite, non-negative and floored to two decimals.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct WaterQualitySample {
    #[serde(rename = "BOD5_m0")]
    pub bod5_m0: f64,
    #[serde(rename = "BOD5_m1")]
    pub bod5_m1: f64,
    #[serde(rename = "NH4_m0")]
    pub nh4_m0: f64,
    #[serde(rename = "NH4_m1")]
    pub nh4_m1: f64,
    #[serde(rename = "NO3")]
    pub no3: f64,
}

impl WaterQualitySample {
    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Bod5M0 => self.bod5_m0,
            Indicator::Bod5M1 => self.bod5_m1,
            Indicator::Nh4M0 => self.nh4_m0,
            Indicator::Nh4M1 => self.nh4_m1,
            Indicator::No3 => self.no3,
        }
    }
}

impl From<&Concentrations> for WaterQualitySample {
    fn from(c: &Concentrations) -> Self {
        let out = |v: f64| floor_two_decimals(v).max(0.0);
        Self {
            bod5_m0: out(c.bod5_m0),
            bod5_m1: out(c.bod5_m1),
            nh4_m0: out(c.nh4_m0),
            nh4_m1: out(c.nh4_m1),
            no3: out(c.no3),
        }
    }
}

/// A named location along the river, for presentation only.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Station {
    pub name: &'static str,
    pub position: f64,
}

/// A point-source discharge where a local flow joins the mainstream.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Confluence {
    /// Zero-based downstream order.
    pub index: usize,
    pub name: &'static str,
    /// Structure midpoint in metres.
    pub midpoint: f64,
}

impl Confluence {
    /// Sample point just upstream of the structure.
    pub fn approach(&self) -> f64 {
        self.midpoint - STRUCTURE_OFFSET
    }

    /// Sample point just downstream of the structure, after mixing.
    pub fn exit(&self) -> f64 {
        self.midpoint + STRUCTURE_OFFSET
    }
}

/// A position every chart or table must include, with its display label.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CriticalPosition {
    pub position: f64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn indicator_constraints() {
        assert_eq!(Indicator::No3.constraint(), Constraint::Increasing);
        for i in [Indicator::Bod5M0, Indicator::Bod5M1, Indicator::Nh4M0, Indicator::Nh4M1] {
            assert_eq!(i.constraint(), Constraint::Decreasing, "{i}");
        }
    }

    #[test]
    fn from_fn_and_get_agree() {
        let c = Concentrations::from_fn(|i| i as u8 as f64 + 0.5);
        for i in Indicator::ALL {
            assert_eq!(c.get(i), i as u8 as f64 + 0.5);
        }
    }

    #[test]
    fn fresh_duplicates_methods() {
        let c = Concentrations::fresh(38.1, 15.3, 0.25);
        assert_eq!(c.bod5_m0, c.bod5_m1);
        assert_eq!(c.nh4_m0, c.nh4_m1);
        assert_eq!(c.no3, 0.25);
    }

    #[test]
    fn sample_floors_and_clamps() {
        let c = Concentrations {
            bod5_m0: 12.3456,
            bod5_m1: -3.2,
            nh4_m0: f64::NAN,
            nh4_m1: f64::INFINITY,
            no3: 0.999,
        };
        let s = WaterQualitySample::from(&c);
        assert_eq!(s.bod5_m0, 12.34);
        assert_eq!(s.bod5_m1, 0.0);
        assert_eq!(s.nh4_m0, 0.0);
        assert_eq!(s.nh4_m1, 0.0);
        assert_eq!(s.no3, 0.99);
    }

    #[test]
    fn floor_guard_handles_representation_error() {
        assert_eq!(floor_two_decimals(0.29), 0.29);
        assert_eq!(floor_two_decimals(0.57), 0.57);
        assert_eq!(floor_two_decimals(15.3), 15.3);
    }

    #[test]
    fn try_new_rejects_bad_input() {
        assert_eq!(
            Conditions::try_new(-0.5, 20.0),
            Err(ConditionsError::NegativeRainfall(-0.5))
        );
        assert!(matches!(
            Conditions::try_new(f64::INFINITY, 20.0),
            Err(ConditionsError::NonFiniteRainfall(_))
        ));
        assert!(matches!(
            Conditions::try_new(1.0, f64::NAN),
            Err(ConditionsError::NonFiniteTemperature(_))
        ));
    }

    #[test]
    fn normalized_rainfall() {
        assert_eq!(Conditions::new(-4.0, 30.0).normalized().rainfall, 0.0);
        assert_eq!(Conditions::new(f64::NAN, 30.0).normalized().rainfall, 0.0);
        assert!(Conditions::new(-0.0, 30.0).normalized().rainfall.is_sign_positive());
        assert_eq!(Conditions::new(7.5, 30.0).normalized(), Conditions::new(7.5, 30.0));
    }

    #[test]
    fn sample_serializes_with_indicator_names() {
        let s = WaterQualitySample { bod5_m0: 1.0, ..Default::default() };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"BOD5_m0\":1.0"), "{json}");
        assert!(json.contains("\"NO3\""), "{json}");
    }

    proptest! {
        #[test]
        fn floor_never_exceeds_input(v in 0.0f64..1.0e6) {
            let f = floor_two_decimals(v);
            prop_assert!(f <= v + 1e-9);
            prop_assert!(v - f < 0.01 + 1e-9);
        }

        #[test]
        fn floor_is_monotonic(a in 0.0f64..1.0e4, b in 0.0f64..1.0e4) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(floor_two_decimals(lo) <= floor_two_decimals(hi));
        }
    }
}
