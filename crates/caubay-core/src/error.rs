//! Error types for the Cầu Bây engine.
//!
//! `evaluate` itself never fails; these cover validation of user-supplied
//! drivers and of environment configuration at the edges.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionsError {
    #[error("rainfall must be finite, got {0}")] NonFiniteRainfall(f64),
    #[error("rainfall must be non-negative, got {0} mm/hr")] NegativeRainfall(f64),
    #[error("temperature must be finite, got {0}")] NonFiniteTemperature(f64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")] InvalidValue { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum CaubayError {
    #[error(transparent)] Conditions(#[from] ConditionsError),
    #[error(transparent)] Config(#[from] ConfigError),
}
