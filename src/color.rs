use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.5);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Region colours
// ---------------------------------------------------------------------------

/// Fixed colour per province so a province keeps its colour across charts
/// and filter changes.
#[derive(Debug, Clone, Default)]
pub struct RegionColors {
    mapping: HashMap<String, Color32>,
}

impl RegionColors {
    /// Assign colours to regions in the order given.
    pub fn new(regions: &[String]) -> Self {
        let mapping = regions
            .iter()
            .cloned()
            .zip(generate_palette(regions.len()))
            .collect();
        RegionColors { mapping }
    }

    pub fn color_for(&self, region: &str) -> Color32 {
        self.mapping.get(region).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(24).len(), 24);
    }

    #[test]
    fn regions_get_distinct_colours_and_unknowns_are_grey() {
        let regions = vec!["Salta".to_string(), "Chaco".to_string()];
        let colors = RegionColors::new(&regions);

        assert_ne!(colors.color_for("Salta"), colors.color_for("Chaco"));
        assert_eq!(colors.color_for("Atlantis"), Color32::GRAY);
    }
}
