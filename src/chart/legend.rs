//! Legend panel: one row per experiment, click to focus its lane.

use crate::events::Grouping;
use crate::theme::ChartColors;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Ui, Vec2};

/// Width reserved for the legend at the right edge of the chart.
pub const LEGEND_WIDTH: f32 = 150.0;
/// Legends are suppressed below this container width regardless of the
/// enable flag.
pub const MIN_CONTAINER_WIDTH: f32 = 768.0;

const ROW_HEIGHT: f32 = 22.0;
const SWATCH: f32 = 10.0;

/// Whether the legend should be shown for this container width.
pub fn visible(enabled: bool, container_width: f32) -> bool {
    enabled && container_width >= MIN_CONTAINER_WIDTH
}

/// Paint legend rows into `area`; returns the id of a clicked grouping.
pub fn show(
    ui: &mut Ui,
    painter: &Painter,
    area: Rect,
    groupings: &[(Grouping, Color32)],
    colors: &ChartColors,
) -> Option<String> {
    let mut clicked = None;
    let font = FontId::proportional(12.0);

    for (i, (grouping, color)) in groupings.iter().enumerate() {
        let row = Rect::from_min_size(
            Pos2::new(area.left(), area.top() + i as f32 * ROW_HEIGHT),
            Vec2::new(area.width(), ROW_HEIGHT),
        );
        if row.bottom() > area.bottom() {
            break;
        }

        let response = ui.interact(row, ui.id().with(("legend-row", i)), Sense::click());
        if response.hovered() {
            painter.rect_filled(row, 3.0, colors.muted.gamma_multiply(0.15));
        }
        if response.clicked() {
            clicked = Some(grouping.uuid.clone());
        }

        let swatch = Rect::from_center_size(
            Pos2::new(row.left() + 4.0 + SWATCH / 2.0, row.center().y),
            Vec2::splat(SWATCH),
        );
        painter.rect_filled(swatch, 2.0, *color);
        painter.text(
            Pos2::new(swatch.right() + 6.0, row.center().y),
            Align2::LEFT_CENTER,
            &grouping.name,
            font.clone(),
            colors.text,
        );
    }

    clicked
}
