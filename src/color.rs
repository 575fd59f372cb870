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
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Surgery → Color32
// ---------------------------------------------------------------------------

/// Stable colour per surgery type, shared by every chart.
#[derive(Debug, Clone, Default)]
pub struct SurgeryColors {
    mapping: BTreeMap<String, Color32>,
}

impl SurgeryColors {
    pub fn new(surgeries: &BTreeSet<String>) -> Self {
        let palette = generate_palette(surgeries.len());
        SurgeryColors {
            mapping: surgeries.iter().cloned().zip(palette).collect(),
        }
    }

    pub fn color_for(&self, surgery: &str) -> Color32 {
        self.mapping.get(surgery).copied().unwrap_or(Color32::GRAY)
    }
}

/// Colour of the synthetic total line.
pub const TOTAL_COLOR: Color32 = Color32::from_gray(60);

/// Hospital bubbles: translucent red.
pub const BUBBLE_COLOR: Color32 = Color32::from_rgba_premultiplied(160, 24, 0, 160);

// ---------------------------------------------------------------------------
// Choropleth ramp
// ---------------------------------------------------------------------------

/// Fill for a county with `cases` out of a maximum of `max_cases`.
///
/// Counties with no cases are pale; the busiest is deep red.
pub fn choropleth_fill(cases: u64, max_cases: u64) -> Color32 {
    let share = if max_cases == 0 {
        0.0
    } else {
        (cases as f32 / max_cases as f32).clamp(0.0, 1.0)
    };
    let lightness = 0.92 - 0.57 * share;
    let color = hsl_to_color32(Hsl::new(0.0, 0.7, lightness));
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 200)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(6);
        let unique: BTreeSet<[u8; 4]> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn ramp_darkens_with_cases() {
        let low = choropleth_fill(0, 100);
        let high = choropleth_fill(100, 100);
        assert!(high.g() < low.g());
        assert_eq!(choropleth_fill(5, 0), low);
    }
}
