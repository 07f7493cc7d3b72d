//! Simulation configuration and runtime parameters

use slit_physics::{
    fringe_spacing, SpectralLine, ARRIVAL_WEIGHT, EMISSION_INTERVAL, INITIAL_SLIT_SEPARATION,
    LINE_COUNT, MAX_SLIT_SEPARATION, MAX_WAVE_PARTICLES, MIN_SLIT_SEPARATION, PIXEL_TO_MM,
    SCENE_HEIGHT, SCREEN_X, SLIT_SEPARATION_STEP, SLIT_X, SPECTRAL_LINES, WAVE_PARTICLE_LIFETIME,
    WAVE_SPEED,
};

/// What the emitter sends while more than one line may be active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmissionMode {
    /// One white pair per emission; contributes for every line active on arrival
    #[default]
    Neutral,
    /// One pair per active line, each tinted with its line
    PerLine,
}

/// Fixed geometry and animation tuning for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Intensity buffer rows (one per screen pixel row)
    pub screen_rows: u32,
    pub slit_x: f32,
    pub screen_x: f32,
    pub wave_speed: f32,
    /// Ticks a particle may live without reaching the screen
    pub particle_lifetime: u32,
    pub max_particles: usize,
    pub emission_interval: u64,
    pub arrival_weight: f32,
    pub emission_mode: EmissionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            screen_rows: SCENE_HEIGHT,
            slit_x: SLIT_X,
            screen_x: SCREEN_X,
            wave_speed: WAVE_SPEED,
            particle_lifetime: WAVE_PARTICLE_LIFETIME,
            max_particles: MAX_WAVE_PARTICLES,
            emission_interval: EMISSION_INTERVAL,
            arrival_weight: ARRIVAL_WEIGHT,
            emission_mode: EmissionMode::default(),
        }
    }
}

impl SimulationConfig {
    /// Slit-to-screen distance (L)
    pub fn screen_distance(&self) -> f32 {
        self.screen_x - self.slit_x
    }

    /// Advancement steps a particle needs to reach the screen
    pub fn flight_ticks(&self) -> u32 {
        (self.screen_distance() / self.wave_speed).ceil() as u32
    }
}

/// User-adjustable parameters. All mutation goes through clamping methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationParams {
    separation: u32,
    active: [bool; LINE_COUNT],
    single_line: Option<usize>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            separation: INITIAL_SLIT_SEPARATION,
            active: [true; LINE_COUNT],
            single_line: None,
        }
    }
}

impl SimulationParams {
    /// Slit separation in pixels, always within bounds
    pub fn separation(&self) -> u32 {
        self.separation
    }

    /// Returns true if the separation changed
    pub fn set_separation(&mut self, separation: u32) -> bool {
        let clamped = separation.clamp(MIN_SLIT_SEPARATION, MAX_SLIT_SEPARATION);
        let changed = clamped != self.separation;
        self.separation = clamped;
        changed
    }

    pub fn decrease_separation(&mut self) -> bool {
        self.set_separation(self.separation.saturating_sub(SLIT_SEPARATION_STEP))
    }

    pub fn increase_separation(&mut self) -> bool {
        self.set_separation(self.separation + SLIT_SEPARATION_STEP)
    }

    /// Single-line mode: activates `index` and deactivates every other line.
    /// Returns false (and changes nothing) for an unknown index.
    pub fn select_line(&mut self, index: usize) -> bool {
        if index >= LINE_COUNT {
            return false;
        }
        self.active = [false; LINE_COUNT];
        self.active[index] = true;
        self.single_line = Some(index);
        true
    }

    /// Leaves single-line mode and flips every line: all off if all were on, else all on
    pub fn toggle_all(&mut self) {
        let target = !self.all_active();
        self.active = [target; LINE_COUNT];
        self.single_line = None;
    }

    pub fn single_line(&self) -> Option<usize> {
        self.single_line
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn all_active(&self) -> bool {
        self.active.iter().all(|&a| a)
    }

    pub fn any_active(&self) -> bool {
        self.active.iter().any(|&a| a)
    }

    /// Active lines with their selector indices
    pub fn active_lines(&self) -> impl Iterator<Item = (usize, &'static SpectralLine)> + '_ {
        SPECTRAL_LINES
            .iter()
            .enumerate()
            .filter(move |(i, _)| self.active[*i])
    }

    /// Rows of the two slit centers for a screen with `rows` rows
    pub fn slit_rows(&self, rows: u32) -> (f32, f32) {
        let center = (rows / 2) as i64;
        let half = (self.separation / 2) as i64;
        ((center - half) as f32, (center + half) as f32)
    }

    pub fn fringe_spacing_px(&self, line: &SpectralLine, distance: f32) -> f32 {
        fringe_spacing(line.wavelength_px(), distance, self.separation as f32)
    }

    pub fn fringe_spacing_mm(&self, line: &SpectralLine, distance: f32) -> f32 {
        self.fringe_spacing_px(line, distance) * PIXEL_TO_MM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separation_clamped_low() {
        let mut params = SimulationParams::default();
        for _ in 0..1000 {
            params.decrease_separation();
        }
        assert_eq!(params.separation(), MIN_SLIT_SEPARATION);
        assert!(!params.decrease_separation());
    }

    #[test]
    fn test_separation_clamped_high() {
        let mut params = SimulationParams::default();
        for _ in 0..1000 {
            params.increase_separation();
        }
        assert_eq!(params.separation(), MAX_SLIT_SEPARATION);
        assert!(!params.increase_separation());
        assert!(!params.set_separation(u32::MAX));
    }

    #[test]
    fn test_select_line_is_exclusive() {
        let mut params = SimulationParams::default();
        assert!(params.select_line(4));
        assert_eq!(params.single_line(), Some(4));
        let active: Vec<usize> = params.active_lines().map(|(i, _)| i).collect();
        assert_eq!(active, vec![4]);

        assert!(!params.select_line(LINE_COUNT));
        assert_eq!(params.single_line(), Some(4));
    }

    #[test]
    fn test_toggle_all() {
        let mut params = SimulationParams::default();
        assert!(params.all_active());

        params.toggle_all();
        assert!(!params.any_active());

        params.toggle_all();
        assert!(params.all_active());

        // From single-line mode not everything is on, so toggling turns all on
        params.select_line(2);
        params.toggle_all();
        assert!(params.all_active());
        assert_eq!(params.single_line(), None);
    }

    #[test]
    fn test_slit_rows() {
        let params = SimulationParams::default();
        assert_eq!(params.slit_rows(700), (300.0, 400.0));
    }

    #[test]
    fn test_fringe_spacing_units() {
        let params = SimulationParams::default();
        let red = &SPECTRAL_LINES[0];
        let px = params.fringe_spacing_px(red, 500.0);
        assert!((px - 525.0).abs() < 1e-3);
        assert!((params.fringe_spacing_mm(red, 500.0) - 0.525).abs() < 1e-5);
    }

    #[test]
    fn test_flight_ticks() {
        let config = SimulationConfig::default();
        assert_eq!(config.screen_distance(), 500.0);
        assert_eq!(config.flight_ticks(), 250);
    }
}
