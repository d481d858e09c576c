//! # caubay-core
//! Topology, data types and traits shared by the Cầu Bây water-quality engine
//! and its front ends.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
