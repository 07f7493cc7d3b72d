//! # Slit Renderer
//!
//! Draws the double-slit scene: source, barrier, screen pattern and wave
//! particles as instanced 2D shapes.

pub mod renderer;
pub mod scene;
pub mod view;

pub use renderer::*;
pub use scene::*;
pub use view::*;
