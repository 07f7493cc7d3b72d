//! Two-beam interference laws
//!
//! The analytic pattern uses the small-angle approximation (`sinθ ≈ y/L`).
//! Wave arrivals use exact Euclidean path lengths instead, so the two layers
//! differ slightly away from the center. Keep both.

use glam::Vec2;
use std::f32::consts::TAU;

/// Phase difference at a screen offset `y_rel` from the center, small-angle form
pub fn small_angle_phase(y_rel: f32, separation: f32, distance: f32, wavelength: f32) -> f32 {
    let sin_theta = y_rel / distance;
    let path_difference = separation * sin_theta;
    TAU * path_difference / wavelength
}

/// `I = cos²(φ/2)`, in [0, 1]
pub fn two_beam_intensity(phase: f32) -> f32 {
    let c = (phase * 0.5).cos();
    c * c
}

/// `(2 + 2cos φ) / 4`, in [0, 1]. Algebraically equal to [`two_beam_intensity`].
pub fn two_beam_fraction(phase: f32) -> f32 {
    (2.0 + 2.0 * phase.cos()) / 4.0
}

/// Exact path difference from two slit rows to a point `distance` away horizontally
pub fn exact_path_difference(row: f32, slit_rows: (f32, f32), distance: f32) -> f32 {
    let d1 = Vec2::new(distance, row - slit_rows.0).length();
    let d2 = Vec2::new(distance, row - slit_rows.1).length();
    (d1 - d2).abs()
}

/// Phase difference for a path difference at a given wavelength
pub fn phase_from_path(path_difference: f32, wavelength: f32) -> f32 {
    TAU * path_difference / wavelength
}

/// Distance between adjacent bright fringes, `λL/d`
pub fn fringe_spacing(wavelength: f32, distance: f32, separation: f32) -> f32 {
    wavelength * distance / separation
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_zero_order_fringe() {
        let phase = small_angle_phase(0.0, 100.0, 500.0, 105.0);
        assert_eq!(phase, 0.0);
        assert_eq!(two_beam_intensity(phase), 1.0);
    }

    #[test]
    fn test_intensity_laws_agree() {
        for i in 0..64 {
            let phase = i as f32 * 0.37;
            assert!((two_beam_intensity(phase) - two_beam_fraction(phase)).abs() < EPS);
        }
    }

    #[test]
    fn test_first_dark_fringe() {
        // Dark where the path difference is half a wavelength
        let (wavelength, distance, separation) = (105.0, 500.0, 100.0);
        let y = fringe_spacing(wavelength, distance, separation) * 0.5;
        let phase = small_angle_phase(y, separation, distance, wavelength);
        assert!(two_beam_intensity(phase) < EPS);
    }

    #[test]
    fn test_exact_path_difference_symmetric() {
        let slits = (300.0, 400.0);
        assert_eq!(exact_path_difference(350.0, slits, 500.0), 0.0);
        let above = exact_path_difference(300.0, slits, 500.0);
        let below = exact_path_difference(400.0, slits, 500.0);
        assert!((above - below).abs() < EPS);
        // Exact geometry stays below the small-angle estimate d·y/L
        assert!(above < 100.0 * 50.0 / 500.0);
    }

    #[test]
    fn test_fringe_spacing_monotonic() {
        let red = 700.0 * crate::SCALE_FACTOR;
        let violet = 400.0 * crate::SCALE_FACTOR;
        assert!(fringe_spacing(violet, 500.0, 100.0) < fringe_spacing(red, 500.0, 100.0));

        let mut last = f32::INFINITY;
        for d in (crate::MIN_SLIT_SEPARATION..=crate::MAX_SLIT_SEPARATION)
            .step_by(crate::SLIT_SEPARATION_STEP as usize)
        {
            let spacing = fringe_spacing(red, 500.0, d as f32);
            assert!(spacing < last);
            last = spacing;
        }
    }
}
