use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.75, 0.55).into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Maps category labels (genres) to distinct colours.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CategoryColors {
    /// Assign colours in label order so the same labels always get the same colours.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut labels: Vec<&str> = labels.into_iter().collect();
        labels.sort_unstable();
        labels.dedup();
        let mapping = labels
            .iter()
            .zip(generate_palette(labels.len()))
            .map(|(label, color)| (label.to_string(), color))
            .collect();
        CategoryColors { mapping }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Named and sequential colours
// ---------------------------------------------------------------------------

/// Resolve the CSS colour names used in chart specifications.
pub fn named(name: &str) -> Color32 {
    match name {
        "blue" => Color32::from_rgb(0, 0, 255),
        "green" => Color32::from_rgb(0, 128, 0),
        _ => Color32::GRAY,
    }
}

/// Apply an opacity in `[0, 1]` to an opaque colour.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Stops of the Plasma sequential scale, dark to bright.
const PLASMA: [(u8, u8, u8); 10] = [
    (13, 8, 135),
    (70, 3, 159),
    (114, 1, 168),
    (156, 23, 158),
    (189, 55, 134),
    (216, 87, 107),
    (237, 121, 83),
    (251, 159, 58),
    (253, 202, 38),
    (240, 249, 33),
];

/// Sample the Plasma scale at `t` in `[0, 1]`, interpolating in linear RGB.
pub fn plasma(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (PLASMA.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(PLASMA.len() - 2);
    let frac = scaled - lower as f32;

    let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = stop(PLASMA[lower]).mix(stop(PLASMA[lower + 1]), frac);
    to_color32(Srgb::from_linear(mixed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plasma_hits_its_end_stops() {
        assert_eq!(plasma(0.0), Color32::from_rgb(13, 8, 135));
        assert_eq!(plasma(1.0), Color32::from_rgb(240, 249, 33));
        assert_eq!(plasma(-3.0), plasma(0.0));
        assert_eq!(plasma(f32::NAN), plasma(0.0));
    }

    #[test]
    fn category_colours_are_stable_and_distinct() {
        let a = CategoryColors::new(["Dramas", "Comedies", "Dramas"]);
        let b = CategoryColors::new(["Comedies", "Dramas"]);
        assert_eq!(a.color_for("Dramas"), b.color_for("Dramas"));
        assert_ne!(a.color_for("Dramas"), a.color_for("Comedies"));
        assert_eq!(a.color_for("Horror"), Color32::GRAY);
    }
}
