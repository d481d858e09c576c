//! Temperature-corrected kinetics and the empirical degradation curves.
//!
//! Travel time is carried in minutes throughout; the first-order rate
//! constants are per day, so exponents use `t / MINUTES_PER_DAY`.
//!
//! A decayed concentration is `start - R(t, T) * D(t)` where `R` is
//! [`tbod`] for BOD fields and [`tn`] for nitrogen fields, and `D` is the
//! indicator's degradation curve. The product `R * D` is called the
//! *transformation* below.

use caubay_core::types::Indicator;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Deoxygenation rate at 20 °C, per day.
pub const RATE_AT_20C: f64 = 0.165;

/// Arrhenius temperature coefficient.
pub const THETA: f64 = 1.091;

pub const RATE_REFERENCE_TEMP: f64 = 20.0;

/// Rate the degradation curves were fitted at, per day.
pub const REFERENCE_RATE: f64 = 0.279;

/// Temperature-adjusted first-order rate, per day.
pub fn rate(temperature: f64) -> f64 {
    RATE_AT_20C * THETA.powf(temperature - RATE_REFERENCE_TEMP)
}

/// BOD temperature ratio: `(1 - e^(-k t)) / (1 - e^(-k_ref t))`.
///
/// Returns 0 when the reference denominator is exactly zero (`t == 0`).
pub fn tbod(minutes: f64, temperature: f64) -> f64 {
    let days = minutes / MINUTES_PER_DAY;
    let numerator = 1.0 - (-days * rate(temperature)).exp();
    let denominator = 1.0 - (-days * REFERENCE_RATE).exp();
    if denominator != 0.0 { numerator / denominator } else { 0.0 }
}

/// Nitrogen temperature ratio: `e^(-k t) / e^(-k_ref t)`.
///
/// Returns 0 if the reference exponential underflows to zero.
pub fn tn(minutes: f64, temperature: f64) -> f64 {
    let days = minutes / MINUTES_PER_DAY;
    let numerator = (-days * rate(temperature)).exp();
    let denominator = (-days * REFERENCE_RATE).exp();
    if denominator != 0.0 { numerator / denominator } else { 0.0 }
}

/// d[`tbod`]/dt, per minute.
fn tbod_slope(minutes: f64, temperature: f64) -> f64 {
    let a = rate(temperature) / MINUTES_PER_DAY;
    let b = REFERENCE_RATE / MINUTES_PER_DAY;
    let ea = (-a * minutes).exp();
    let eb = (-b * minutes).exp();
    let n = 1.0 - ea;
    let m = 1.0 - eb;
    if m == 0.0 {
        return 0.0;
    }
    (a * ea * m - b * eb * n) / (m * m)
}

/// d[`tn`]/dt, per minute.
fn tn_slope(minutes: f64, temperature: f64) -> f64 {
    let a = rate(temperature) / MINUTES_PER_DAY;
    let b = REFERENCE_RATE / MINUTES_PER_DAY;
    (b - a) * tn(minutes, temperature)
}

/// Quadratic in travel time (minutes): `a t^2 + b t + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Quadratic {
    pub fn at(&self, t: f64) -> f64 {
        (self.a * t + self.b) * t + self.c
    }

    pub fn slope(&self, t: f64) -> f64 {
        2.0 * self.a * t + self.b
    }
}

/// Fitted degradation magnitude for BOD5 method 1.
pub const D_BOD1: Quadratic = Quadratic { a: -1e-5, b: 0.0311, c: -0.438 };
/// Fitted degradation magnitude for BOD5 method 0.
pub const D_BOD0: Quadratic = Quadratic { a: -2e-8, b: 0.0012, c: -0.0002 };
/// Fitted degradation magnitude for NH4+ method 1.
pub const D_NH41: Quadratic = Quadratic { a: -2e-6, b: 0.0023, c: -0.0199 };
/// Fitted degradation magnitude for NH4+ method 0.
pub const D_NH40: Quadratic = Quadratic { a: -3e-7, b: 0.0003, c: -0.0012 };
/// Fitted degradation magnitude for NO3-; negative over most of its domain.
pub const D_NO31: Quadratic = Quadratic { a: 9e-7, b: -0.0009, c: 0.0293 };

pub fn degradation_curve(indicator: Indicator) -> Quadratic {
    match indicator {
        Indicator::Bod5M0 => D_BOD0,
        Indicator::Bod5M1 => D_BOD1,
        Indicator::Nh4M0 => D_NH40,
        Indicator::Nh4M1 => D_NH41,
        Indicator::No3 => D_NO31,
    }
}

/// Temperature ratio that scales `indicator`'s curve.
pub fn temperature_ratio(indicator: Indicator, minutes: f64, temperature: f64) -> f64 {
    if indicator.is_bod() { tbod(minutes, temperature) } else { tn(minutes, temperature) }
}

/// Amount subtracted from the starting concentration after `minutes` of travel.
pub fn transformation(indicator: Indicator, minutes: f64, temperature: f64) -> f64 {
    temperature_ratio(indicator, minutes, temperature) * degradation_curve(indicator).at(minutes)
}

/// d[`transformation`]/dt, per minute.
pub fn transformation_slope(indicator: Indicator, minutes: f64, temperature: f64) -> f64 {
    let curve = degradation_curve(indicator);
    let (ratio, ratio_slope) = if indicator.is_bod() {
        (tbod(minutes, temperature), tbod_slope(minutes, temperature))
    } else {
        (tn(minutes, temperature), tn_slope(minutes, temperature))
    };
    ratio_slope * curve.at(minutes) + ratio * curve.slope(minutes)
}

/// Raw decayed value with no hold and no constraint applied.
pub fn decay(start: f64, indicator: Indicator, minutes: f64, temperature: f64) -> f64 {
    start - transformation(indicator, minutes, temperature)
}
