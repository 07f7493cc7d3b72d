//! # Slit Physics
//!
//! Two-beam interference math for the double-slit experiment: the visible
//! spectral line table, scene constants and the closed-form intensity laws.
//! Everything here is pure arithmetic over bounded inputs.

pub mod constants;
pub mod interference;
pub mod spectrum;

pub use constants::*;
pub use interference::*;
pub use spectrum::*;
