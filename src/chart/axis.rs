//! Bottom time axis and plot boundary lines.
//!
//! Re-ticks, re-labels and re-wraps on every redraw, so zoom and resize
//! reflow for free: ticks are derived from whatever scale the caller
//! passes in.

use super::scale::TimeScale;
use super::wrap;
use crate::format::Formatter;
use crate::theme::ChartColors;
use egui::{Align2, FontId, Painter, Pos2, Rect};

/// Aim for roughly this many ticks across the visible span.
pub const TARGET_TICKS: usize = 6;

/// Pixel budget for one tick label before it wraps.
pub const TICK_LABEL_WIDTH: f32 = 48.0;

const TICK_MARK_LEN: f32 = 6.0;
const TICK_FONT_SIZE: f32 = 10.0;
const LABEL_LINE_HEIGHT: f32 = 12.0;

/// Nice time steps, milliseconds, smallest first.
const TICK_STEPS_MS: &[i64] = &[
    60_000,         // 1 min
    300_000,        // 5 min
    600_000,        // 10 min
    900_000,        // 15 min
    1_800_000,      // 30 min
    3_600_000,      // 1 h
    10_800_000,     // 3 h
    21_600_000,     // 6 h
    43_200_000,     // 12 h
    86_400_000,     // 1 d
    604_800_000,    // 7 d
];

/// Largest step used when the visible span outgrows the nice steps.
const MAX_STEP_MS: i64 = 604_800_000;

/// Smallest nice step that yields at most `target` ticks over `span_ms`.
pub fn tick_step(span_ms: f64, target: usize) -> i64 {
    let raw = span_ms / target.max(1) as f64;
    TICK_STEPS_MS
        .iter()
        .copied()
        .find(|&s| s as f64 >= raw)
        .unwrap_or(MAX_STEP_MS)
}

/// Step-aligned tick timestamps covering `domain`.
pub fn ticks(domain: (f64, f64), target: usize) -> Vec<f64> {
    let (d0, d1) = domain;
    if !(d1 > d0) {
        return Vec::new();
    }
    let step = tick_step(d1 - d0, target) as f64;
    let first = (d0 / step).ceil() * step;
    let mut out = Vec::new();
    let mut t = first;
    while t <= d1 {
        out.push(t);
        t += step;
    }
    out
}

/// Draw the bottom axis against the effective scale, plus the two
/// vertical boundary lines framing the plot.
pub fn draw(painter: &Painter, plot: Rect, effective: &TimeScale, fmt: &Formatter, colors: &ChartColors) {
    let axis_y = plot.bottom();
    let font = FontId::proportional(TICK_FONT_SIZE);

    // Boundary lines
    painter.line_segment(
        [Pos2::new(plot.left(), plot.top()), Pos2::new(plot.left(), axis_y)],
        crate::theme::stroke(colors.axis, 2.0),
    );
    painter.line_segment(
        [Pos2::new(plot.right() + 0.5, plot.top()), Pos2::new(plot.right() + 0.5, axis_y)],
        crate::theme::stroke(colors.axis, 1.0),
    );

    // Baseline
    painter.line_segment(
        [Pos2::new(plot.left(), axis_y), Pos2::new(plot.right(), axis_y)],
        crate::theme::stroke(colors.axis, 1.0),
    );

    // Visible domain under the current transform. Scales live in
    // plot-local pixels, zero at the left edge.
    let visible = (effective.invert(0.0), effective.invert(plot.width()));

    for t in ticks(visible, TARGET_TICKS) {
        let x = plot.left() + effective.scale(t);
        if x < plot.left() - 1.0 || x > plot.right() + 1.0 {
            continue;
        }

        painter.line_segment(
            [Pos2::new(x, axis_y), Pos2::new(x, axis_y + TICK_MARK_LEN)],
            crate::theme::stroke(colors.axis, 1.0),
        );

        let label = fmt.tick(t);
        let measure = |s: &str| {
            painter
                .layout_no_wrap(s.to_string(), font.clone(), colors.axis_text)
                .size()
                .x
        };
        for (i, line) in wrap::wrap_text(&label, TICK_LABEL_WIDTH, measure)
            .iter()
            .enumerate()
        {
            painter.text(
                Pos2::new(x, axis_y + TICK_MARK_LEN + 2.0 + i as f32 * LABEL_LINE_HEIGHT),
                Align2::CENTER_TOP,
                line,
                font.clone(),
                colors.axis_text,
            );
        }
    }
}
