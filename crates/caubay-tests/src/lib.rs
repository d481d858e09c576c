//! Integration test suite for the Cầu Bây water-quality engine.
//!
//! Exercises the engine only through its public surface: fixed scenarios,
//! physical invariants under randomized drivers, and concurrent use.

pub mod helpers;
