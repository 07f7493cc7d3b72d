//! Scene and animation constants
//!
//! All distances are in scene pixels. Wavelengths are scaled from nanometers
//! into the same unit so that fringes are visible at screen scale while the
//! relative spacing between colors stays physical.

/// Scene width in pixels
pub const SCENE_WIDTH: u32 = 1200;

/// Scene height in pixels (one intensity row per pixel row)
pub const SCENE_HEIGHT: u32 = 700;

/// Conversion from nanometers to scene pixels
pub const SCALE_FACTOR: f32 = 0.15;

/// Slit separation at startup
pub const INITIAL_SLIT_SEPARATION: u32 = 100;
pub const MIN_SLIT_SEPARATION: u32 = 50;
pub const MAX_SLIT_SEPARATION: u32 = 300;
pub const SLIT_SEPARATION_STEP: u32 = 5;

/// Horizontal position of the light source
pub const SOURCE_X: f32 = 100.0;

/// Horizontal position of the barrier holding the slits
pub const SLIT_X: f32 = 400.0;

/// Horizontal position of the detection screen
pub const SCREEN_X: f32 = 900.0;

/// Drawn height of each slit opening
pub const SLIT_HEIGHT: f32 = 100.0;

/// Drawn thickness of the detection screen
pub const SCREEN_THICKNESS: f32 = 20.0;

/// 1 pixel = 0.001 mm
pub const PIXEL_TO_MM: f32 = 0.001;

/// Distance a wave particle travels per tick
pub const WAVE_SPEED: f32 = 2.0;

/// Drawn radius of a wave particle
pub const WAVE_PARTICLE_SIZE: f32 = 3.0;

/// Maximum particle age in ticks.
/// Must exceed `(SCREEN_X - SLIT_X) / WAVE_SPEED` or nothing ever arrives.
pub const WAVE_PARTICLE_LIFETIME: u32 = 300;

/// Hard cap on live particles (emission stops at the cap)
pub const MAX_WAVE_PARTICLES: usize = 500;

/// Emit a particle pair every N ticks
pub const EMISSION_INTERVAL: u64 = 5;

/// Fraction of an arrival's intensity added to the screen
pub const ARRIVAL_WEIGHT: f32 = 0.05;

/// Fixed simulation rate
pub const TICK_RATE: f32 = 60.0;
