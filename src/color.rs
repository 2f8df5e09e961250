use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
#[allow(clippy::cast_precision_loss)]
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Categorical mapping: sex name → Color32
// ---------------------------------------------------------------------------

/// Maps the values of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CategoryColors {
    pub fn new(values: &BTreeSet<String>) -> Self {
        let mapping = values
            .iter()
            .cloned()
            .zip(generate_palette(values.len()))
            .collect();
        CategoryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale (Viridis)
// ---------------------------------------------------------------------------

const VIRIDIS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

/// Linear Viridis ramp over `[min, max]`, interpolated in linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViridisScale {
    min: f64,
    max: f64,
}

impl ViridisScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Scale spanning the given values; `None` when empty.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self::new(v, v)),
            Some(s) => Some(Self::new(s.min.min(v), s.max.max(v))),
        })
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn color_for(&self, value: f64) -> Color32 {
        let range = self.max - self.min;
        let t = if range > 0.0 {
            ((value - self.min) / range).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let segments = (VIRIDIS.len() - 1) as f64;
        let pos = t * segments;
        let lo = (pos.floor() as usize).min(VIRIDIS.len() - 2);
        let frac = (pos - lo as f64) as f32;

        let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
            Srgb::new(r, g, b).into_format::<f32>().into_linear()
        };
        let mixed = stop(VIRIDIS[lo]).mix(stop(VIRIDIS[lo + 1]), frac);
        to_color32(Srgb::from_linear(mixed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn unknown_category_is_gray() {
        let values: BTreeSet<String> = ["Female", "Male"].iter().map(|s| s.to_string()).collect();
        let colors = CategoryColors::new(&values);
        assert_ne!(colors.color_for("Male"), Color32::GRAY);
        assert_eq!(colors.color_for("Unknown"), Color32::GRAY);
    }

    #[test]
    fn viridis_endpoints() {
        let scale = ViridisScale::new(20.0, 60.0);
        assert_eq!(scale.color_for(20.0), Color32::from_rgb(0x44, 0x01, 0x54));
        assert_eq!(scale.color_for(60.0), Color32::from_rgb(0xfd, 0xe7, 0x25));
        assert_eq!(scale.color_for(100.0), scale.color_for(60.0));
    }

    #[test]
    fn spanning_tracks_extremes() {
        assert_eq!(ViridisScale::spanning(std::iter::empty::<f64>()), None);
        assert_eq!(
            ViridisScale::spanning([40.0, 31.0, 55.5]),
            Some(ViridisScale::new(31.0, 55.5))
        );
    }
}
