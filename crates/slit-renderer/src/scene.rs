//! Scene assembly: simulation state → instanced shapes
//!
//! Shapes are drawn in list order with alpha blending, so later entries
//! paint over earlier ones.

use bytemuck::{Pod, Zeroable};
use catppuccin::PALETTE;
use slit_physics::{
    SCREEN_THICKNESS, SCREEN_X, SLIT_HEIGHT, SLIT_X, SOURCE_X, SPECTRAL_LINES,
    WAVE_PARTICLE_SIZE,
};
use slit_simulation::Simulation;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Width of the colored pattern strip right of the screen
const PATTERN_WIDTH: f32 = 50.0;
const BEAM_HEIGHT: f32 = 80.0;
const BARRIER_WIDTH: f32 = 10.0;

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rect = 0,
    Disc = 1,
    /// One scene pixel wide outline of a circle
    Ring = 2,
}

/// GPU-compatible shape instance (matches WGSL `Shape`)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    pub center: [f32; 2],
    pub half_size: [f32; 2],
    /// Straight sRGB color with alpha
    pub color: [f32; 4],
    pub kind: u32,
    pub _padding: [u32; 3],
}

impl ShapeInstance {
    /// Axis-aligned rectangle from its top-left corner
    pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Self {
        Self::new(
            [x + width * 0.5, y + height * 0.5],
            [width * 0.5, height * 0.5],
            color,
            ShapeKind::Rect,
        )
    }

    pub fn disc(center: [f32; 2], radius: f32, color: [f32; 4]) -> Self {
        Self::new(center, [radius, radius], color, ShapeKind::Disc)
    }

    pub fn ring(center: [f32; 2], radius: f32, color: [f32; 4]) -> Self {
        Self::new(center, [radius, radius], color, ShapeKind::Ring)
    }

    fn new(center: [f32; 2], half_size: [f32; 2], color: [f32; 4], kind: ShapeKind) -> Self {
        Self {
            center,
            half_size,
            color,
            kind: kind as u32,
            _padding: [0; 3],
        }
    }
}

/// Catppuccin Mocha color as straight sRGB
pub fn palette(color: &catppuccin::Color, alpha: f32) -> [f32; 4] {
    [
        color.rgb.r as f32 / 255.0,
        color.rgb.g as f32 / 255.0,
        color.rgb.b as f32 / 255.0,
        alpha,
    ]
}

fn rgb_u8(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha,
    ]
}

/// Background clear color (Catppuccin Mocha base)
pub fn background() -> [f32; 4] {
    palette(&PALETTE.mocha.colors.base, 1.0)
}

/// Build every shape for the current frame
pub fn build_scene(simulation: &Simulation) -> Vec<ShapeInstance> {
    let rows = simulation.config().screen_rows as f32;
    let mut shapes =
        Vec::with_capacity(simulation.buffer().len() + simulation.particles().len() * 4 + 16);

    push_light_source(&mut shapes, simulation, rows);
    push_barrier(&mut shapes, simulation, rows);
    push_screen(&mut shapes, simulation, rows);
    push_particles(&mut shapes, simulation);

    shapes
}

fn push_light_source(shapes: &mut Vec<ShapeInstance>, simulation: &Simulation, rows: f32) {
    let center = rows * 0.5;
    shapes.push(ShapeInstance::rect(SOURCE_X - 20.0, center - 50.0, 40.0, 100.0, WHITE));

    let beam_rgb = simulation
        .params()
        .single_line()
        .map_or([255; 3], |index| SPECTRAL_LINES[index].rgb);
    let beam_x = SOURCE_X + 20.0;
    let beam_width = SLIT_X - 5.0 - beam_x;
    let beam_y = center - BEAM_HEIGHT * 0.5;
    shapes.push(ShapeInstance::rect(
        beam_x,
        beam_y,
        beam_width,
        BEAM_HEIGHT,
        rgb_u8(beam_rgb, 1.0),
    ));

    // Glow halo around the beam
    for i in 0..3 {
        let alpha = (100 - i * 30) as f32 / 255.0;
        let grow = i as f32;
        shapes.push(ShapeInstance::rect(
            beam_x,
            beam_y - grow * 5.0,
            beam_width,
            BEAM_HEIGHT + grow * 10.0,
            rgb_u8(beam_rgb, alpha),
        ));
    }
}

fn push_barrier(shapes: &mut Vec<ShapeInstance>, simulation: &Simulation, rows: f32) {
    let colors = &PALETTE.mocha.colors;
    let x = SLIT_X - BARRIER_WIDTH * 0.5;
    shapes.push(ShapeInstance::rect(x, 0.0, BARRIER_WIDTH, rows, palette(&colors.overlay0, 1.0)));

    let (slit_one, slit_two) = simulation.slit_rows();
    for row in [slit_one, slit_two] {
        shapes.push(ShapeInstance::rect(
            x,
            row - SLIT_HEIGHT * 0.5,
            BARRIER_WIDTH,
            SLIT_HEIGHT,
            palette(&colors.crust, 1.0),
        ));
    }
}

fn push_screen(shapes: &mut Vec<ShapeInstance>, simulation: &Simulation, rows: f32) {
    let colors = &PALETTE.mocha.colors;
    shapes.push(ShapeInstance::rect(
        SCREEN_X,
        0.0,
        SCREEN_THICKNESS,
        rows,
        palette(&colors.overlay2, 1.0),
    ));

    let buffer = simulation.buffer();
    for row in 0..buffer.len() {
        let Some(rgb) = buffer.display_rgb(row) else {
            continue;
        };
        if rgb == [0; 3] {
            continue;
        }
        shapes.push(ShapeInstance::rect(
            SCREEN_X + SCREEN_THICKNESS,
            row as f32,
            PATTERN_WIDTH,
            1.0,
            rgb_u8(rgb, 1.0),
        ));
    }
}

fn push_particles(shapes: &mut Vec<ShapeInstance>, simulation: &Simulation) {
    let lifetime = simulation.config().particle_lifetime;
    let slit_x = simulation.config().slit_x;

    for particle in simulation.particles() {
        let center = [slit_x + particle.traveled, particle.row];
        let fade = particle.fade(lifetime);
        let rgb = particle.tint.rgb();

        for i in 0..3 {
            let alpha = fade / (i + 1) as f32;
            shapes.push(ShapeInstance::disc(
                center,
                WAVE_PARTICLE_SIZE + i as f32,
                rgb_u8(rgb, alpha),
            ));
        }

        if let Some(radius) = particle.wavefront_radius() {
            let alpha = (100.0 - (radius / 2.0).floor()).max(0.0) / 255.0;
            shapes.push(ShapeInstance::ring(center, radius, rgb_u8(rgb, alpha)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slit_simulation::Command;

    fn count(shapes: &[ShapeInstance], kind: ShapeKind) -> usize {
        shapes.iter().filter(|s| s.kind == kind as u32).count()
    }

    #[test]
    fn test_instance_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<ShapeInstance>(), 48);
    }

    #[test]
    fn test_rect_from_corner() {
        let rect = ShapeInstance::rect(10.0, 20.0, 4.0, 2.0, WHITE);
        assert_eq!(rect.center, [12.0, 21.0]);
        assert_eq!(rect.half_size, [2.0, 1.0]);
    }

    #[test]
    fn test_empty_screen_draws_only_fixtures() {
        let simulation = Simulation::default();
        let shapes = build_scene(&simulation);
        // Source, beam, 3 glow layers, barrier, 2 slits, screen
        assert_eq!(shapes.len(), 9);
        assert_eq!(count(&shapes, ShapeKind::Disc), 0);
    }

    #[test]
    fn test_pattern_and_particles_drawn() {
        let mut simulation = Simulation::default();
        simulation.apply(Command::SelectLine(4));
        let simulation = simulation.advance(10);

        let lit_rows = (0..simulation.buffer().len())
            .filter(|&row| simulation.buffer().display_rgb(row) != Some([0; 3]))
            .count();
        let shapes = build_scene(&simulation);

        assert_eq!(count(&shapes, ShapeKind::Disc), simulation.particles().len() * 3);
        assert_eq!(count(&shapes, ShapeKind::Rect), 9 + lit_rows);

        // Single-line mode tints the beam with the line color
        let blue = rgb_u8(SPECTRAL_LINES[4].rgb, 1.0);
        assert_eq!(shapes[1].color, blue);
        assert!(shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::Disc as u32)
            .all(|s| s.color[..3] == blue[..3]));
    }

    #[test]
    fn test_wavefront_rings_every_ten_ticks() {
        let simulation = Simulation::default().advance(10);
        let shapes = build_scene(&simulation);
        // The first pair is exactly ten ticks old
        assert_eq!(count(&shapes, ShapeKind::Ring), 2);
    }
}
