//! Wave particles travelling from the slits to the screen

use slit_physics::{
    exact_path_difference, line, phase_from_path, two_beam_fraction, SpectralLine,
};

/// Ages at which a particle draws a Huygens wavefront ring
const WAVEFRONT_PERIOD: u32 = 10;
const WAVEFRONT_MAX_RADIUS: f32 = 200.0;

/// Slit a particle was emitted from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slit {
    One,
    Two,
}

/// Color identity, frozen at emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    /// White; stands in for the full active spectrum
    Neutral,
    /// A single spectral line by selector index
    Line(usize),
}

impl Tint {
    pub fn line(&self) -> Option<&'static SpectralLine> {
        match self {
            Tint::Neutral => None,
            Tint::Line(index) => line(*index),
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.line().map_or([255; 3], |line| line.rgb)
    }
}

/// Outcome of one advancement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    InFlight,
    /// Reached the screen plane; contributes once, then is dropped
    Arrived,
    /// Outlived its lifetime without arriving; dropped silently
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParticle {
    pub slit: Slit,
    /// Screen row the particle travels along
    pub row: f32,
    /// Distance from the slit plane
    pub traveled: f32,
    /// Ticks since emission
    pub age: u32,
    pub tint: Tint,
}

impl WaveParticle {
    pub fn emit(slit: Slit, row: f32, tint: Tint) -> Self {
        Self {
            slit,
            row,
            traveled: 0.0,
            age: 0,
            tint,
        }
    }

    /// One particle per slit, both with the same tint
    pub fn emit_pair(slit_rows: (f32, f32), tint: Tint) -> [Self; 2] {
        [
            Self::emit(Slit::One, slit_rows.0, tint),
            Self::emit(Slit::Two, slit_rows.1, tint),
        ]
    }

    /// Move one tick toward a screen `distance` away
    pub fn advance(&mut self, speed: f32, distance: f32, lifetime: u32) -> Fate {
        self.traveled += speed;
        self.age += 1;

        if self.traveled >= distance {
            Fate::Arrived
        } else if self.age >= lifetime {
            Fate::Expired
        } else {
            Fate::InFlight
        }
    }

    /// Opacity in [0, 1], fading out over the lifetime
    pub fn fade(&self, lifetime: u32) -> f32 {
        if lifetime == 0 {
            return 0.0;
        }
        (1.0 - self.age as f32 / lifetime as f32).clamp(0.0, 1.0)
    }

    /// Radius of the Huygens wavefront ring to draw this frame, if any
    pub fn wavefront_radius(&self) -> Option<f32> {
        if self.age % WAVEFRONT_PERIOD != 0 {
            return None;
        }
        let radius = self.traveled * 0.5;
        (radius > 0.0 && radius < WAVEFRONT_MAX_RADIUS).then_some(radius)
    }

    /// Two-beam fraction `(2 + 2cos φ) / 4` at this particle's row, using exact
    /// path lengths from both slits
    pub fn arrival_fraction(&self, slit_rows: (f32, f32), distance: f32, wavelength: f32) -> f32 {
        let path_difference = exact_path_difference(self.row, slit_rows, distance);
        two_beam_fraction(phase_from_path(path_difference, wavelength))
    }
}
