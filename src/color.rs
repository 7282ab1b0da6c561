use std::collections::{BTreeMap, BTreeSet};

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
// Year → Color32
// ---------------------------------------------------------------------------

/// One colour per calendar year in the loaded series.
#[derive(Debug, Clone, Default)]
pub struct YearColors {
    mapping: BTreeMap<i32, Color32>,
}

impl YearColors {
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        let years: BTreeSet<i32> = years.into_iter().collect();
        let palette = generate_palette(years.len());
        YearColors {
            mapping: years.into_iter().zip(palette).collect(),
        }
    }

    pub fn color_for(&self, year: i32) -> Color32 {
        self.mapping.get(&year).copied().unwrap_or(Color32::GRAY)
    }

    /// Legend entries (year label → colour), oldest first.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(y, c)| (y.to_string(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn years_are_deduplicated_and_unknown_year_is_gray() {
        let colors = YearColors::new([2024, 2023, 2024]);
        let legend = colors.legend_entries();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].0, "2023");
        assert_ne!(colors.color_for(2023), colors.color_for(2024));
        assert_eq!(colors.color_for(1999), Color32::GRAY);
    }
}
