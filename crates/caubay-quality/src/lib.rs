//! # caubay-quality — Water-quality propagation engine.
//!
//! Computes BOD5 (two estimation methods), NH4+ (two methods) and NO3- at
//! any position along the 8013 m Cầu Bây waterway:
//! - **Flow accounting**: rainfall-driven affine flows and pollutant loads,
//!   accumulated past each confluence.
//! - **Kinetics**: temperature-corrected first-order ratios applied to
//!   empirical degradation curves over travel time.
//! - **Waypoint ladder**: 13 dependent states (origin, then approach,
//!   structure and exit per confluence), built once per set of conditions.
//! - **Interpolation**: monotone decay from the nearest upstream waypoint.
//!
//! Every evaluation is pure; the engine caches ladders but never lets the
//! cache change an answer.

pub mod classifier;
pub mod config;
pub mod constraint;
pub mod engine;
pub mod flow;
pub mod kinetics;
pub mod ladder;
pub mod profile;
pub mod reach;

pub use classifier::{classify, Regime};
pub use config::EngineConfig;
pub use engine::WaterQualityEngine;
pub use ladder::{Ladder, Waypoint};
pub use profile::{build_profile, profile_positions, ProfilePoint};
