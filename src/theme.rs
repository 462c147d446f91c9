//! Unified theme and color constants for the timeline.
//!
//! All colors used by the chart and surrounding panels are sourced
//! from here to keep the two render paths visually consistent.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Visual theme flag. Styling only, no structural effect on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }
}

/// Categorical series palette assigned to experiments.
///
/// Fixed set of ten; assignment cycles when there are more experiments.
pub mod series {
    use super::*;

    pub const CATEGORICAL: [Color32; 10] = [
        Color32::from_rgb(0x4e, 0x79, 0xa7), // blue
        Color32::from_rgb(0xf2, 0x8e, 0x2c), // orange
        Color32::from_rgb(0xe1, 0x57, 0x59), // red
        Color32::from_rgb(0x76, 0xb7, 0xb2), // teal
        Color32::from_rgb(0x59, 0xa1, 0x4f), // green
        Color32::from_rgb(0xed, 0xc9, 0x48), // yellow
        Color32::from_rgb(0xb0, 0x7a, 0xa1), // purple
        Color32::from_rgb(0xff, 0x9d, 0xa7), // pink
        Color32::from_rgb(0x9c, 0x75, 0x5f), // brown
        Color32::from_rgb(0xba, 0xb0, 0xab), // gray
    ];
}

/// Per-theme surface and text colors for the chart area.
#[derive(Debug, Clone, Copy)]
pub struct ChartColors {
    /// Plot background.
    pub bg: Color32,
    /// Axis baseline, ticks and boundary lines.
    pub axis: Color32,
    /// Tick label text.
    pub axis_text: Color32,
    /// Primary text.
    pub text: Color32,
    /// De-emphasized text.
    pub muted: Color32,
    /// Tooltip backdrop.
    pub tooltip_bg: Color32,
    /// Tooltip text.
    pub tooltip_text: Color32,
}

const DARK: ChartColors = ChartColors {
    bg: Color32::from_rgb(14, 17, 23),
    axis: Color32::from_rgb(120, 125, 135),
    axis_text: Color32::from_rgb(180, 180, 190),
    text: Color32::from_rgb(240, 240, 245),
    muted: Color32::from_rgb(120, 125, 135),
    tooltip_bg: Color32::from_rgba_premultiplied(20, 20, 30, 230),
    tooltip_text: Color32::from_rgb(240, 240, 245),
};

const LIGHT: ChartColors = ChartColors {
    bg: Color32::from_rgb(250, 250, 252),
    axis: Color32::from_rgb(110, 115, 125),
    axis_text: Color32::from_rgb(70, 72, 80),
    text: Color32::from_rgb(25, 27, 33),
    muted: Color32::from_rgb(130, 135, 145),
    tooltip_bg: Color32::from_rgba_premultiplied(245, 245, 248, 240),
    tooltip_text: Color32::from_rgb(25, 27, 33),
};

/// Chart colors for the given theme.
pub fn chart_colors(theme: Theme) -> &'static ChartColors {
    match theme {
        Theme::Dark => &DARK,
        Theme::Light => &LIGHT,
    }
}

/// Helper to create a stroke with consistent styling
pub fn stroke(color: Color32, width: f32) -> egui::Stroke {
    egui::Stroke::new(width, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_has_ten_distinct_colors() {
        for (i, a) in series::CATEGORICAL.iter().enumerate() {
            for b in series::CATEGORICAL.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
