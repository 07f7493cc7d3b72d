//! # Slit Simulation Engine
//!
//! Fixed-timestep double-slit simulation: an analytic interference pattern
//! recomputed on parameter changes, plus a stream of wave particles that
//! shimmer incremental contributions onto the same intensity buffer.

pub mod intensity;
pub mod params;
pub mod simulation;
pub mod wave;

pub use intensity::*;
pub use params::*;
pub use simulation::*;
pub use wave::*;
