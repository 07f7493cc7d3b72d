//! Visible spectral lines (ROYGBIV)

use crate::constants::SCALE_FACTOR;

/// Number of selectable spectral lines
pub const LINE_COUNT: usize = 7;

/// A single visible wavelength with its display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralLine {
    /// Stable selector key
    pub key: &'static str,
    pub name: &'static str,
    /// Wavelength in nanometers
    pub wavelength_nm: u32,
    /// Display color, 0..=255 per channel
    pub rgb: [u8; 3],
}

impl SpectralLine {
    /// Wavelength in scene pixels
    pub fn wavelength_px(&self) -> f32 {
        self.wavelength_nm as f32 * SCALE_FACTOR
    }

    /// Display color as channel weights in [0, 1]
    pub fn channels(&self) -> [f32; 3] {
        self.rgb.map(|c| c as f32 / 255.0)
    }
}

/// Red to violet, in selector order (keys 1-7)
pub const SPECTRAL_LINES: [SpectralLine; LINE_COUNT] = [
    SpectralLine {
        key: "red",
        name: "Red",
        wavelength_nm: 700,
        rgb: [255, 0, 0],
    },
    SpectralLine {
        key: "orange",
        name: "Orange",
        wavelength_nm: 620,
        rgb: [255, 165, 0],
    },
    SpectralLine {
        key: "yellow",
        name: "Yellow",
        wavelength_nm: 580,
        rgb: [255, 255, 0],
    },
    SpectralLine {
        key: "green",
        name: "Green",
        wavelength_nm: 530,
        rgb: [0, 255, 0],
    },
    SpectralLine {
        key: "blue",
        name: "Blue",
        wavelength_nm: 470,
        rgb: [0, 0, 255],
    },
    SpectralLine {
        key: "indigo",
        name: "Indigo",
        wavelength_nm: 445,
        rgb: [75, 0, 130],
    },
    SpectralLine {
        key: "violet",
        name: "Violet",
        wavelength_nm: 400,
        rgb: [148, 0, 211],
    },
];

/// Index of the longest wavelength
pub const RED: usize = 0;

/// Index of the shortest wavelength
pub const VIOLET: usize = LINE_COUNT - 1;

/// Look up a line by selector index
pub fn line(index: usize) -> Option<&'static SpectralLine> {
    SPECTRAL_LINES.get(index)
}

/// Look up a line index by its selector key
pub fn line_index(key: &str) -> Option<usize> {
    SPECTRAL_LINES.iter().position(|line| line.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_ordered_red_to_violet() {
        for pair in SPECTRAL_LINES.windows(2) {
            assert!(pair[0].wavelength_nm > pair[1].wavelength_nm);
        }
        assert_eq!(SPECTRAL_LINES[RED].key, "red");
        assert_eq!(SPECTRAL_LINES[VIOLET].key, "violet");
    }

    #[test]
    fn test_wavelengths_positive() {
        assert!(SPECTRAL_LINES.iter().all(|l| l.wavelength_px() > 0.0));
    }

    #[test]
    fn test_key_lookup() {
        assert_eq!(line_index("green"), Some(3));
        assert_eq!(line_index("ultraviolet"), None);
        assert!(line(LINE_COUNT).is_none());
    }

    #[test]
    fn test_channels() {
        let orange = line(1).unwrap();
        assert_eq!(orange.channels(), [1.0, 165.0 / 255.0, 0.0]);
        assert_eq!(orange.wavelength_px(), 620.0 * SCALE_FACTOR);
    }
}
