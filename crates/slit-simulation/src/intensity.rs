//! Per-row RGB intensity on the detection screen

use crate::SimulationParams;
use slit_physics::{small_angle_phase, two_beam_intensity};

/// One `[r, g, b]` accumulator per screen row.
///
/// After [`IntensityBuffer::recompute`] the largest entry is exactly 1.0 (or
/// everything is zero). Arrivals added afterwards may push entries above 1.0;
/// readers clamp instead of renormalizing.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityBuffer {
    rows: Vec<[f32; 3]>,
}

impl IntensityBuffer {
    pub fn new(rows: u32) -> Self {
        Self {
            rows: vec![[0.0; 3]; rows as usize],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[[f32; 3]] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<[f32; 3]> {
        self.rows.get(index).copied()
    }

    pub fn clear(&mut self) {
        self.rows.fill([0.0; 3]);
    }

    /// Largest channel value across all rows
    pub fn max(&self) -> f32 {
        self.rows
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f32::max)
    }

    /// Rebuild the steady-state pattern for every active line, then normalize.
    ///
    /// Cost is rows × active lines cosine evaluations, so callers only run this
    /// when the parameters change.
    pub fn recompute(&mut self, params: &SimulationParams, distance: f32) {
        self.clear();

        let center = self.rows.len() as f32 / 2.0;
        let separation = params.separation() as f32;

        for (_, line) in params.active_lines() {
            let wavelength = line.wavelength_px();
            let channels = line.channels();

            for (y, row) in self.rows.iter_mut().enumerate() {
                let phase = small_angle_phase(y as f32 - center, separation, distance, wavelength);
                let intensity = two_beam_intensity(phase);
                for (value, channel) in row.iter_mut().zip(channels) {
                    *value += intensity * channel;
                }
            }
        }

        let max = self.max();
        if max > 0.0 {
            for value in self.rows.iter_mut().flatten() {
                *value /= max;
            }
        }

        log::trace!(
            "Recomputed pattern: {} rows, separation {}, peak before normalization {:.3}",
            self.rows.len(),
            params.separation(),
            max
        );
    }

    /// Add `amount · channel` to the row containing `y`.
    /// Returns false if `y` falls outside the screen.
    pub fn accrete(&mut self, y: f32, amount: f32, channels: [f32; 3]) -> bool {
        if y < 0.0 {
            return false;
        }
        match self.rows.get_mut(y as usize) {
            Some(row) => {
                for (value, channel) in row.iter_mut().zip(channels) {
                    *value += amount * channel;
                }
                true
            }
            None => false,
        }
    }

    /// Display color of a row, clamped to 0..=255
    pub fn display_rgb(&self, index: usize) -> Option<[u8; 3]> {
        self.row(index)
            .map(|row| row.map(|value| (value * 255.0).clamp(0.0, 255.0) as u8))
    }
}
