use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use sales_dashboard::{DimensionValue, SummaryTable};

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
            to_color32(hsl.into_color())
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Heat scale for the region map
// ---------------------------------------------------------------------------

/// Light-to-dark blue ramp; `t` is clamped to `[0, 1]`.
pub fn heat_color(t: f64) -> Color32 {
    let low: LinSrgb = Srgb::new(0.87_f32, 0.92, 0.97).into_linear();
    let high: LinSrgb = Srgb::new(0.03_f32, 0.19, 0.42).into_linear();
    let mixed = low.mix(high, t.clamp(0.0, 1.0) as f32);
    to_color32(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: summary key → Color32
// ---------------------------------------------------------------------------

/// Maps the keys of one summary table to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<DimensionValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the table's keys, in key order.
    pub fn new(table: &SummaryTable) -> Self {
        let palette = generate_palette(table.len());
        let mapping: BTreeMap<DimensionValue, Color32> = table
            .iter()
            .map(|(k, _)| k.clone())
            .zip(palette)
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given key.
    pub fn color_for(&self, value: &DimensionValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
