//! Automated players and whole-game playouts.
//!
//! Useful for simulation, benchmarks and filling empty seats.

pub mod playout;
pub mod policy;

pub use playout::{play_out, random_playout, PlayoutConfig, PlayoutStats};
pub use policy::{GreedyPolicy, RandomPolicy, TokenPolicy};
