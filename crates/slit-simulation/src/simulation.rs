//! Fixed-timestep simulation controller
//!
//! Owns the parameters, the intensity buffer and the live particles. Every
//! tick runs synchronously: recompute the analytic pattern if the parameters
//! changed, emit a particle batch on the emission cadence, then advance and
//! retire particles, adding arrival shimmer to the buffer.

use crate::{
    EmissionMode, Fate, IntensityBuffer, SimulationConfig, SimulationParams, Tint, WaveParticle,
};
use slit_physics::{SpectralLine, PIXEL_TO_MM, RED, SPECTRAL_LINES, VIOLET};

/// User intent, already decoded from raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DecreaseSeparation,
    IncreaseSeparation,
    SetSeparation(u32),
    /// Single-line mode for the line at this selector index
    SelectLine(usize),
    ToggleAll,
    /// Zero the screen; the analytic pattern is rebuilt on the next tick
    Clear,
    TogglePause,
    SetEmissionMode(EmissionMode),
}

/// Fringe spacing of one line at the current separation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FringeReading {
    pub line: usize,
    pub spacing_px: f32,
    pub spacing_mm: f32,
}

/// Derived quantities shown next to the experiment
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMetrics {
    pub separation_px: u32,
    pub separation_mm: f32,
    pub distance_px: f32,
    pub distance_mm: f32,
    pub mode: String,
    pub wavelength: String,
    /// The selected line, or the red and violet extremes in multi-line mode
    pub fringes: Vec<FringeReading>,
}

pub struct Simulation {
    config: SimulationConfig,
    params: SimulationParams,
    buffer: IntensityBuffer,
    particles: Vec<WaveParticle>,
    tick: u64,
    paused: bool,
    pattern_dirty: bool,
    arrivals: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        log::info!(
            "Initializing Simulation: {} rows, L = {} px, {} ticks to screen",
            config.screen_rows,
            config.screen_distance(),
            config.flight_ticks()
        );

        Self {
            buffer: IntensityBuffer::new(config.screen_rows),
            config,
            params: SimulationParams::default(),
            particles: Vec::with_capacity(config.max_particles),
            tick: 0,
            paused: false,
            pattern_dirty: true,
            arrivals: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn buffer(&self) -> &IntensityBuffer {
        &self.buffer
    }

    pub fn particles(&self) -> &[WaveParticle] {
        &self.particles
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True until the next tick rebuilds the analytic pattern
    pub fn pattern_dirty(&self) -> bool {
        self.pattern_dirty
    }

    /// Particles that have reached the screen since startup
    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn slit_rows(&self) -> (f32, f32) {
        self.params.slit_rows(self.config.screen_rows)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::DecreaseSeparation => {
                if self.params.decrease_separation() {
                    self.separation_changed();
                }
            }
            Command::IncreaseSeparation => {
                if self.params.increase_separation() {
                    self.separation_changed();
                }
            }
            Command::SetSeparation(separation) => {
                if self.params.set_separation(separation) {
                    self.separation_changed();
                }
            }
            Command::SelectLine(index) => {
                if self.params.select_line(index) {
                    log::debug!("Single-line mode: {}", SPECTRAL_LINES[index].name);
                    self.pattern_dirty = true;
                } else {
                    log::warn!("Ignoring selection of unknown spectral line {}", index);
                }
            }
            Command::ToggleAll => {
                self.params.toggle_all();
                log::debug!(
                    "Multi-line mode, all lines {}",
                    if self.params.all_active() { "on" } else { "off" }
                );
                self.pattern_dirty = true;
            }
            Command::Clear => {
                self.buffer.clear();
                self.pattern_dirty = true;
            }
            Command::TogglePause => {
                self.paused = !self.paused;
                log::debug!("Simulation {}", if self.paused { "paused" } else { "resumed" });
            }
            Command::SetEmissionMode(mode) => {
                if self.config.emission_mode != mode {
                    log::debug!("Emission mode: {:?}", mode);
                    self.config.emission_mode = mode;
                }
            }
        }
    }

    fn separation_changed(&mut self) {
        log::debug!("Slit separation: {} px", self.params.separation());
        self.pattern_dirty = true;
    }

    /// Run one fixed tick. Does nothing while paused.
    pub fn step(&mut self) {
        if self.paused {
            return;
        }

        if self.pattern_dirty {
            self.buffer
                .recompute(&self.params, self.config.screen_distance());
            self.pattern_dirty = false;
        }

        if self.tick % self.config.emission_interval.max(1) == 0 {
            self.emit();
        }

        self.advance_particles();
        self.tick += 1;
    }

    /// Consume the simulation, run `ticks` steps and hand it back
    pub fn advance(mut self, ticks: u64) -> Self {
        for _ in 0..ticks {
            self.step();
        }
        self
    }

    fn emit(&mut self) {
        if !self.params.any_active() {
            return;
        }

        let slit_rows = self.slit_rows();
        let tints: Vec<Tint> = match (self.params.single_line(), self.config.emission_mode) {
            (Some(index), _) => vec![Tint::Line(index)],
            (None, EmissionMode::Neutral) => vec![Tint::Neutral],
            (None, EmissionMode::PerLine) => self
                .params
                .active_lines()
                .map(|(index, _)| Tint::Line(index))
                .collect(),
        };

        for tint in tints {
            for particle in WaveParticle::emit_pair(slit_rows, tint) {
                if self.particles.len() >= self.config.max_particles {
                    log::trace!("Particle cap {} reached", self.config.max_particles);
                    return;
                }
                self.particles.push(particle);
            }
        }
    }

    fn advance_particles(&mut self) {
        let slit_rows = self.slit_rows();
        let distance = self.config.screen_distance();
        let speed = self.config.wave_speed;
        let lifetime = self.config.particle_lifetime;
        let weight = self.config.arrival_weight;

        let mut particles = std::mem::take(&mut self.particles);
        particles.retain_mut(|particle| match particle.advance(speed, distance, lifetime) {
            Fate::InFlight => true,
            Fate::Arrived => {
                self.contribute(particle, slit_rows, distance, weight);
                false
            }
            Fate::Expired => false,
        });
        self.particles = particles;
    }

    /// Arrival shimmer: unnormalized, layered over the analytic pattern
    fn contribute(
        &mut self,
        particle: &WaveParticle,
        slit_rows: (f32, f32),
        distance: f32,
        weight: f32,
    ) {
        self.arrivals += 1;

        let mut add = |line: &SpectralLine| {
            let fraction = particle.arrival_fraction(slit_rows, distance, line.wavelength_px());
            self.buffer
                .accrete(particle.row, weight * fraction, line.channels());
        };

        match particle.tint.line() {
            Some(line) => add(line),
            None => {
                for (_, line) in self.params.active_lines() {
                    add(line);
                }
            }
        }
    }

    pub fn metrics(&self) -> DisplayMetrics {
        let separation = self.params.separation();
        let distance = self.config.screen_distance();

        let (mode, wavelength, fringe_lines) = match self.params.single_line() {
            Some(index) => {
                let selected = &SPECTRAL_LINES[index];
                (
                    format!("Monochromatic ({})", selected.name),
                    format!("{} nm", selected.wavelength_nm),
                    vec![index],
                )
            }
            None => (
                "Polychromatic (ROYGBIV)".to_string(),
                "Full visible spectrum".to_string(),
                vec![RED, VIOLET],
            ),
        };

        let fringes = fringe_lines
            .into_iter()
            .map(|index| {
                let line = &SPECTRAL_LINES[index];
                FringeReading {
                    line: index,
                    spacing_px: self.params.fringe_spacing_px(line, distance),
                    spacing_mm: self.params.fringe_spacing_mm(line, distance),
                }
            })
            .collect();

        DisplayMetrics {
            separation_px: separation,
            separation_mm: separation as f32 * PIXEL_TO_MM,
            distance_px: distance,
            distance_mm: distance * PIXEL_TO_MM,
            mode,
            wavelength,
            fringes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slit_physics::{LINE_COUNT, MIN_SLIT_SEPARATION};

    const EPS: f32 = 1e-5;

    fn red_only() -> Simulation {
        let mut sim = Simulation::default();
        sim.apply(Command::SelectLine(RED));
        sim
    }

    #[test]
    fn test_first_tick_builds_pattern() {
        let mut sim = Simulation::default();
        assert!(sim.pattern_dirty());
        assert_eq!(sim.buffer().max(), 0.0);

        sim.step();
        assert!(!sim.pattern_dirty());
        assert!((sim.buffer().max() - 1.0).abs() < EPS);
        assert_eq!(sim.particles().len(), 2);
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn test_particle_lifecycle() {
        let mut sim = red_only();
        let flight = sim.config().flight_ticks() as u64;
        assert_eq!(flight, 250);

        sim = sim.advance(flight - 1);
        assert_eq!(sim.arrivals(), 0);
        let first: Vec<WaveParticle> = sim
            .particles()
            .iter()
            .filter(|p| p.age as u64 == flight - 1)
            .copied()
            .collect();
        assert_eq!(first.len(), 2);

        let before = sim.buffer().clone();
        sim.step();

        assert_eq!(sim.arrivals(), 2);
        assert!(sim.particles().iter().all(|p| (p.age as u64) < flight));

        let slit_rows = sim.slit_rows();
        let distance = sim.config().screen_distance();
        let weight = sim.config().arrival_weight;
        let red = &SPECTRAL_LINES[RED];

        for (index, (old, new)) in before.rows().iter().zip(sim.buffer().rows()).enumerate() {
            match first.iter().find(|p| p.row as usize == index) {
                Some(particle) => {
                    let expected =
                        weight * particle.arrival_fraction(slit_rows, distance, red.wavelength_px());
                    assert!((new[0] - old[0] - expected).abs() < EPS);
                    assert_eq!(new[1], old[1]);
                    assert_eq!(new[2], old[2]);
                }
                None => assert_eq!(old, new, "row {index}"),
            }
        }
    }

    #[test]
    fn test_arrivals_are_not_renormalized() {
        let sim = red_only().advance(400);
        let center = (sim.config().screen_rows / 2) as usize;
        assert!(sim.arrivals() > 2);
        // Slit rows sit near the central maximum, so shimmer lifts them past 1.0
        let (slit_one, _) = sim.slit_rows();
        let slit_row = sim.buffer().row(slit_one as usize).unwrap();
        let nearby = sim.buffer().row(center + 60).unwrap();
        assert!(slit_row[0] > nearby[0]);
        assert!(sim.buffer().max() > 1.0);
        assert_eq!(sim.buffer().display_rgb(slit_one as usize).unwrap()[0], 255);
    }

    #[test]
    fn test_neutral_particles_use_active_lines_on_arrival() {
        let mut sim = Simulation::default().advance(249);
        assert!(sim.particles().iter().all(|p| p.tint == Tint::Neutral));

        let (slit_one, _) = sim.slit_rows();
        let before = sim.buffer().row(slit_one as usize).unwrap();
        sim.step();
        let after = sim.buffer().row(slit_one as usize).unwrap();
        assert!(after.iter().zip(before).all(|(a, b)| *a > b));
    }

    #[test]
    fn test_expired_particles_never_contribute() {
        let config = SimulationConfig {
            particle_lifetime: 10,
            ..Default::default()
        };
        let mut sim = Simulation::new(config);
        sim.apply(Command::SelectLine(2));
        sim = sim.advance(600);
        assert_eq!(sim.arrivals(), 0);
        assert!(sim.particles().iter().all(|p| p.age < 10));
    }

    #[test]
    fn test_tint_frozen_at_emission() {
        let mut sim = red_only();
        sim.step();
        sim.apply(Command::SelectLine(VIOLET));
        sim = sim.advance(5);

        let tints: Vec<Tint> = sim.particles().iter().map(|p| p.tint).collect();
        assert_eq!(
            tints,
            vec![
                Tint::Line(RED),
                Tint::Line(RED),
                Tint::Line(VIOLET),
                Tint::Line(VIOLET)
            ]
        );
    }

    #[test]
    fn test_per_line_emission_and_cap() {
        let mut sim = Simulation::default();
        sim.apply(Command::SetEmissionMode(EmissionMode::PerLine));
        sim.step();
        assert_eq!(sim.particles().len(), 2 * LINE_COUNT);

        let config = SimulationConfig {
            max_particles: 3,
            emission_interval: 1,
            emission_mode: EmissionMode::PerLine,
            ..Default::default()
        };
        let mut capped = Simulation::new(config);
        for _ in 0..50 {
            capped.step();
            assert!(capped.particles().len() <= 3);
        }
        assert_eq!(capped.particles().len(), 3);
    }

    #[test]
    fn test_nothing_emitted_without_active_lines() {
        let mut sim = Simulation::default();
        sim.apply(Command::ToggleAll);
        sim = sim.advance(20);
        assert!(sim.particles().is_empty());
        assert_eq!(sim.buffer().max(), 0.0);
    }

    #[test]
    fn test_pause_freezes_advance_only() {
        let mut sim = Simulation::default();
        sim.apply(Command::TogglePause);
        sim.step();
        assert_eq!(sim.tick(), 0);
        assert!(sim.particles().is_empty());

        sim.apply(Command::DecreaseSeparation);
        assert_eq!(sim.params().separation(), 95);

        sim.apply(Command::TogglePause);
        sim.step();
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn test_clear_then_rebuild() {
        let mut sim = red_only().advance(300);
        sim.apply(Command::Clear);
        assert_eq!(sim.buffer().max(), 0.0);
        assert!(sim.pattern_dirty());

        sim.step();
        assert!(sim.buffer().max() >= 1.0);
    }

    #[test]
    fn test_separation_commands_clamp_and_mark_dirty() {
        let mut sim = Simulation::default();
        sim.step();
        sim.apply(Command::SetSeparation(0));
        assert_eq!(sim.params().separation(), MIN_SLIT_SEPARATION);
        assert!(sim.pattern_dirty());

        sim.step();
        sim.apply(Command::DecreaseSeparation);
        assert!(!sim.pattern_dirty());
    }

    #[test]
    fn test_unknown_line_ignored() {
        let mut sim = Simulation::default();
        sim.step();
        sim.apply(Command::SelectLine(LINE_COUNT));
        assert!(sim.params().all_active());
        assert!(!sim.pattern_dirty());
    }

    #[test]
    fn test_metrics() {
        let mut sim = Simulation::default();
        let metrics = sim.metrics();
        assert_eq!(metrics.separation_px, 100);
        assert!((metrics.separation_mm - 0.1).abs() < EPS);
        assert_eq!(metrics.distance_px, 500.0);
        assert_eq!(metrics.fringes.len(), 2);
        assert_eq!(metrics.fringes[0].line, RED);
        assert!((metrics.fringes[0].spacing_px - 525.0).abs() < 1e-3);
        assert!((metrics.fringes[1].spacing_px - 300.0).abs() < 1e-3);
        assert!(metrics.fringes[1].spacing_px < metrics.fringes[0].spacing_px);

        sim.apply(Command::SelectLine(VIOLET));
        sim.apply(Command::IncreaseSeparation);
        let metrics = sim.metrics();
        assert_eq!(metrics.mode, "Monochromatic (Violet)");
        assert_eq!(metrics.wavelength, "400 nm");
        assert_eq!(metrics.fringes.len(), 1);
        assert!(metrics.fringes[0].spacing_px < 300.0);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let a = Simulation::default().advance(777);
        let b = Simulation::default().advance(777);
        assert_eq!(a.buffer(), b.buffer());
        assert_eq!(a.particles(), b.particles());
    }
}
