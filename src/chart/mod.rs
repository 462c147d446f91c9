//! Interactive experiment events timeline.
//!
//! One horizontal lane per experiment, one dot per event, a pannable and
//! zoomable time axis, hover tooltips and an optional click-to-focus
//! legend. Geometry stays consistent across the three independent update
//! triggers: incoming data, user pan/zoom, and container resize.

pub mod axis;
pub mod legend;
pub mod scale;
pub mod tooltip;
pub mod wrap;

use crate::events::{unique_groupings, Event, EventKey, Grouping};
use crate::format::Formatter;
use crate::theme::{self, Theme};
use chrono::Utc;
use egui::{Color32, FontId, Pos2, Rect, Sense, Ui, Vec2};
use scale::{BandScale, OrdinalColors, TimeScale, Transform};
use std::collections::{HashMap, HashSet};

/// Height reserved under the plot for the time axis.
const MARGIN_BOTTOM: f32 = 30.0;
const POINT_RADIUS: f32 = 4.0;
/// Pointer distance within which a point counts as hovered.
const HOVER_RADIUS: f32 = 8.0;
/// Band padding ratio between lanes.
const LANE_PADDING: f32 = 0.5;
/// Entering points slide in from this far right of their resting x.
const ENTER_SLIDE: f32 = 30.0;
const ENTER_SECS: f64 = 0.75;
const FOCUS_SECS: f64 = 0.75;
/// Zoom level applied when focusing a lane from the legend.
pub const FOCUS_ZOOM: f32 = 3.0;
/// Width changes must settle this long before geometry is rebuilt.
const RESIZE_DEBOUNCE_SECS: f64 = 0.25;

pub type SelectCallback = Box<dyn FnMut(&Event)>;

/// Construction-time configuration for the chart.
pub struct ChartOptions {
    pub enable_legends: bool,
    pub theme: Theme,
    pub formatter: Formatter,
    /// Invoked once per click on a point, with the clicked event.
    pub on_select_event: Option<SelectCallback>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            enable_legends: true,
            theme: Theme::default(),
            formatter: Formatter::default(),
            on_select_event: None,
        }
    }
}

/// Width-dependent geometry plus the user transform.
///
/// Mutated only by its owning controller: a resize rebuilds the base
/// range, gestures replace the transform. Renderers read the composed
/// effective scale every frame instead of caching projected positions.
struct ViewState {
    base: TimeScale,
    transform: Transform,
}

impl ViewState {
    fn effective(&self) -> TimeScale {
        self.transform.rescale(&self.base)
    }
}

/// Enter-transition state of a rendered point.
enum Enter {
    /// Joined on the last update; animation starts on the next frame.
    Pending,
    Running(f64),
    Done,
}

/// One rendered point, positioned from the scales on every frame.
struct PointMark {
    key: EventKey,
    event_idx: usize,
    t_ms: f64,
    lane: String,
    color: Color32,
    enter: Enter,
}

struct FocusAnimation {
    from: Transform,
    to: Transform,
    started: f64,
}

pub struct TimelineChart {
    options: ChartOptions,
    groupings: Vec<Grouping>,
    known_ids: HashSet<String>,
    colors: OrdinalColors,
    /// Legend rows: grouping plus its assigned color.
    swatches: Vec<(Grouping, Color32)>,
    lanes: BandScale,
    view: ViewState,
    events: Vec<Event>,
    marks: Vec<PointMark>,
    focus: Option<FocusAnimation>,
    /// Plot size currently in effect; width is debounced, height is fixed
    /// once observed.
    applied_size: Option<Vec2>,
    /// Candidate width waiting out the resize debounce.
    pending_width: Option<(f32, f64)>,
    hovered: Option<usize>,
    skipped: usize,
}

impl TimelineChart {
    pub fn new(events: &[Event], options: ChartOptions) -> Self {
        let groupings = unique_groupings(events);
        let known_ids: HashSet<String> = groupings.iter().map(|g| g.uuid.clone()).collect();

        let mut colors = OrdinalColors::new(&theme::series::CATEGORICAL);
        let swatches: Vec<(Grouping, Color32)> = groupings
            .iter()
            .map(|g| (g.clone(), colors.color(&g.uuid)))
            .collect();

        let lanes = BandScale::new(
            groupings.iter().map(|g| g.uuid.clone()).collect(),
            (0.0, 0.0),
            LANE_PADDING,
        );

        let last_start = events.iter().filter_map(Event::start_ms).reduce(f64::max);
        let domain = scale::initial_domain(last_start, Utc::now());

        let mut chart = Self {
            options,
            groupings,
            known_ids,
            colors,
            swatches,
            lanes,
            view: ViewState {
                base: TimeScale::new(domain, (0.0, 0.0)),
                transform: Transform::IDENTITY,
            },
            events: Vec::new(),
            marks: Vec::new(),
            focus: None,
            applied_size: None,
            pending_width: None,
            hovered: None,
            skipped: 0,
        };
        chart.reconcile(events);
        chart
    }

    /// Replace the rendered event set. Points new to the chart animate
    /// in; retained points re-project silently; points whose key is gone
    /// are dropped.
    pub fn update(&mut self, events: &[Event]) {
        self.reconcile(events);
    }

    pub fn theme(&self) -> Theme {
        self.options.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.options.theme = theme;
    }

    pub fn legends_enabled(&self) -> bool {
        self.options.enable_legends
    }

    pub fn set_legends_enabled(&mut self, enabled: bool) {
        self.options.enable_legends = enabled;
    }

    pub fn zoom(&self) -> f32 {
        self.view.transform.k
    }

    pub fn event_count(&self) -> usize {
        self.marks.len()
    }

    pub fn grouping_count(&self) -> usize {
        self.groupings.len()
    }

    /// Events dropped on the last update (unknown experiment or
    /// unparsable timestamp).
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn reset_view(&mut self) {
        self.view.transform = Transform::IDENTITY;
        self.focus = None;
    }

    fn reconcile(&mut self, events: &[Event]) {
        // Retained marks keep their enter state so an update arriving
        // mid-animation does not cut the transition short.
        let mut previous: HashMap<EventKey, Enter> = self
            .marks
            .drain(..)
            .map(|m| (m.key, m.enter))
            .collect();

        let mut marks = Vec::new();
        let mut skipped = 0;
        for (idx, event) in events.iter().enumerate() {
            let Some(t_ms) = event.start_ms() else {
                tracing::warn!(
                    experiment_id = %event.experiment_id,
                    start_time = %event.start_time,
                    "skipping event with unparsable timestamp"
                );
                skipped += 1;
                continue;
            };
            if !self.known_ids.contains(&event.experiment_id) {
                tracing::warn!(
                    experiment_id = %event.experiment_id,
                    "skipping event for experiment not present at initialization"
                );
                skipped += 1;
                continue;
            }

            let key = event.key();
            let enter = previous.remove(&key).unwrap_or(Enter::Pending);
            marks.push(PointMark {
                key,
                event_idx: idx,
                t_ms,
                lane: event.experiment_id.clone(),
                color: self.colors.color(&event.experiment_id),
                enter,
            });
        }

        self.marks = marks;
        self.events = events.to_vec();
        self.skipped = skipped;
        self.hovered = None;
    }

    /// Adopt a new plot size: transform resets to identity and all
    /// width-dependent geometry is rebuilt from the base scale.
    fn apply_plot_size(&mut self, size: Vec2) {
        self.view.transform = Transform::IDENTITY;
        self.view.base.set_range((0.0, size.x));
        self.lanes.set_range((0.0, size.y));
        self.applied_size = Some(size);
        self.focus = None;
    }

    /// Transform centering `t_ms` in the plot at the focus zoom level.
    fn focus_transform(&self, t_ms: f64) -> Transform {
        let plot_width = self.view.base.range.1;
        Transform {
            k: FOCUS_ZOOM,
            tx: plot_width / 2.0 - FOCUS_ZOOM * self.view.base.scale(t_ms),
        }
    }

    /// Animate toward the most recent event of `uuid`.
    fn focus_on(&mut self, uuid: &str, now: f64) {
        let latest = self
            .events
            .iter()
            .filter(|e| e.experiment_id == uuid)
            .filter_map(Event::start_ms)
            .reduce(f64::max);
        let Some(t_ms) = latest else { return };

        self.focus = Some(FocusAnimation {
            from: self.view.transform,
            to: self.focus_transform(t_ms),
            started: now,
        });
    }

    fn fire_select(&mut self, mark_idx: usize) {
        let Some(mark) = self.marks.get(mark_idx) else { return };
        if let Some(cb) = self.options.on_select_event.as_mut() {
            cb(&self.events[mark.event_idx]);
        }
    }

    /// Track the container width, debouncing changes; returns the plot
    /// rect currently in effect.
    fn track_size(&mut self, ui: &Ui, container: Rect, plot_width_avail: f32, now: f64) -> Rect {
        match self.applied_size {
            // First layout is the mount, not a resize: adopt immediately.
            None => {
                let size = Vec2::new(
                    plot_width_avail,
                    (container.height() - MARGIN_BOTTOM).max(0.0),
                );
                self.apply_plot_size(size);
            }
            Some(size) => {
                if (plot_width_avail - size.x).abs() > 0.5 {
                    match self.pending_width {
                        Some((w, since)) if (w - plot_width_avail).abs() <= 0.5 => {
                            if now - since >= RESIZE_DEBOUNCE_SECS {
                                // Only width is tracked; height stays fixed.
                                self.apply_plot_size(Vec2::new(plot_width_avail, size.y));
                                self.pending_width = None;
                            }
                        }
                        _ => self.pending_width = Some((plot_width_avail, now)),
                    }
                    if self.pending_width.is_some() {
                        ui.ctx()
                            .request_repaint_after(std::time::Duration::from_millis(50));
                    }
                } else {
                    self.pending_width = None;
                }
            }
        }

        let size = self.applied_size.unwrap_or_default();
        Rect::from_min_size(container.min, size)
    }

    /// Render one frame and handle input.
    pub fn show(&mut self, ui: &mut Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let container = response.rect;
        let now = ui.input(|i| i.time);
        let colors = *theme::chart_colors(self.options.theme);

        painter.rect_filled(container, 0.0, colors.bg);

        let legend_on = legend::visible(self.options.enable_legends, container.width());
        let margin_right = if legend_on { legend::LEGEND_WIDTH } else { 0.0 };
        let plot = self.track_size(ui, container, (container.width() - margin_right).max(0.0), now);

        // Gather input deltas first (allows simultaneous pan+zoom on
        // trackpad).
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta);
        let zoom_delta = ui.input(|i| i.zoom_delta());
        let hover_pos = response.hover_pos();

        let mut gesture = false;

        if response.dragged_by(egui::PointerButton::Primary) {
            let dx = response.drag_delta().x;
            if dx != 0.0 {
                self.view.transform = self.view.transform.pan(dx);
                gesture = true;
            }
        }

        if scroll_delta.x != 0.0 && response.hovered() {
            self.view.transform = self.view.transform.pan(scroll_delta.x);
            gesture = true;
        }

        if let Some(cursor) = hover_pos {
            if zoom_delta != 1.0 {
                let anchor = cursor.x - plot.left();
                self.view.transform = self.view.transform.zoom_at(anchor, zoom_delta);
                gesture = true;
            }
        }

        // A fresh gesture supersedes a running focus animation.
        if gesture {
            self.focus = None;
        }

        if let Some(anim) = &self.focus {
            let t = ((now - anim.started) / FOCUS_SECS).clamp(0.0, 1.0) as f32;
            let e = ease_cubic_in_out(t);
            self.view.transform = Transform {
                k: lerp(anim.from.k, anim.to.k, e),
                tx: lerp(anim.from.tx, anim.to.tx, e),
            };
            if t >= 1.0 {
                self.view.transform = anim.to;
                self.focus = None;
            }
            ui.ctx().request_repaint();
        }

        let effective = self.view.effective();

        // Lane guide lines
        for (grouping, color) in &self.swatches {
            if let Some(y) = self.lanes.center(&grouping.uuid) {
                let y = plot.top() + y;
                painter.line_segment(
                    [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
                    theme::stroke(color.gamma_multiply(0.6), 1.0),
                );
            }
        }

        axis::draw(&painter, plot, &effective, &self.options.formatter, &colors);

        // Points, clipped to the plot area
        let clipped = painter.with_clip_rect(plot);
        let mut animating = false;
        let mut positions: Vec<Option<Pos2>> = Vec::with_capacity(self.marks.len());
        for mark in &mut self.marks {
            let Some(lane_y) = self.lanes.center(&mark.lane) else {
                positions.push(None);
                continue;
            };

            let progress = match mark.enter {
                Enter::Pending => {
                    mark.enter = Enter::Running(now);
                    0.0
                }
                Enter::Running(started) => {
                    let p = ((now - started) / ENTER_SECS).clamp(0.0, 1.0) as f32;
                    if p >= 1.0 {
                        mark.enter = Enter::Done;
                    }
                    p
                }
                Enter::Done => 1.0,
            };
            if progress < 1.0 {
                animating = true;
            }
            let eased = ease_cubic_in_out(progress);

            let rest_x = plot.left() + effective.scale(mark.t_ms);
            let pos = Pos2::new(rest_x + ENTER_SLIDE * (1.0 - eased), plot.top() + lane_y);
            positions.push(Some(pos));

            clipped.circle_filled(pos, POINT_RADIUS, mark.color.gamma_multiply(eased));
        }
        if animating {
            ui.ctx().request_repaint();
        }

        // Hover: closest point within reach of the pointer
        self.hovered = hover_pos.and_then(|cursor| {
            let mut closest: Option<(usize, f32)> = None;
            for (i, pos) in positions.iter().enumerate() {
                let Some(pos) = pos else { continue };
                let d = pos.distance(cursor);
                if d <= HOVER_RADIUS && closest.map_or(true, |(_, best)| d < best) {
                    closest = Some((i, d));
                }
            }
            closest.map(|(i, _)| i)
        });

        if let Some(idx) = self.hovered {
            if let Some(Some(pos)) = positions.get(idx) {
                clipped.circle_stroke(
                    *pos,
                    POINT_RADIUS + 2.0,
                    theme::stroke(colors.text, 1.5),
                );
            }
        }

        if response.clicked() {
            if let Some(idx) = self.hovered {
                self.fire_select(idx);
            }
        }

        // Legend
        if legend_on {
            let legend_area = Rect::from_min_max(
                Pos2::new(container.right() - legend::LEGEND_WIDTH + 8.0, container.top() + 4.0),
                container.max,
            );
            if let Some(uuid) = legend::show(ui, &painter, legend_area, &self.swatches, &colors) {
                self.focus_on(&uuid, now);
                ui.ctx().request_repaint();
            }
        }

        // Tooltip last, above everything
        if let (Some(idx), Some(cursor)) = (self.hovered, hover_pos) {
            if let Some(mark) = self.marks.get(idx) {
                let text = tooltip::content(&self.events[mark.event_idx], &self.options.formatter);
                let galley = painter.layout_no_wrap(text, FontId::default(), colors.tooltip_text);
                let pad = Vec2::splat(8.0);
                let anchor = tooltip::anchor(cursor, container, galley.size() + pad * 2.0);
                painter.rect_filled(
                    Rect::from_min_size(anchor, galley.size() + pad * 2.0),
                    4.0,
                    colors.tooltip_bg,
                );
                painter.galley(anchor + pad, galley, colors.tooltip_text);
            }
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Symmetric cubic easing used by both timed transitions.
fn ease_cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(name: &str, id: &str, start: &str) -> Event {
        Event {
            experiment: name.into(),
            experiment_id: id.into(),
            start_time: start.into(),
            finish_time: None,
        }
    }

    fn chart_with(events: &[Event]) -> TimelineChart {
        let mut chart = TimelineChart::new(events, ChartOptions::default());
        chart.apply_plot_size(Vec2::new(800.0, 370.0));
        chart
    }

    #[test]
    fn test_initial_marks_enter_pending() {
        let chart = chart_with(&[
            event("a", "A", "2026-08-07T10:00:00Z"),
            event("b", "B", "2026-08-07T10:05:00Z"),
        ]);
        assert_eq!(chart.marks.len(), 2);
        assert!(chart
            .marks
            .iter()
            .all(|m| matches!(m.enter, Enter::Pending)));
    }

    #[test]
    fn test_update_partitions_added_retained_removed() {
        let first = event("a", "A", "2026-08-07T10:00:00Z");
        let second = event("a", "A", "2026-08-07T10:10:00Z");
        let mut chart = chart_with(std::slice::from_ref(&first));

        // Settle the existing mark so added/retained are distinguishable.
        chart.marks[0].enter = Enter::Done;

        chart.update(&[first.clone(), second.clone()]);
        assert_eq!(chart.marks.len(), 2);
        assert!(matches!(chart.marks[0].enter, Enter::Done));
        assert!(matches!(chart.marks[1].enter, Enter::Pending));

        // Removal drops the mark without replacing the rest.
        chart.update(std::slice::from_ref(&second));
        assert_eq!(chart.marks.len(), 1);
        assert_eq!(chart.marks[0].key, second.key());
    }

    #[test]
    fn test_unknown_grouping_skipped() {
        let mut chart = chart_with(&[event("a", "A", "2026-08-07T10:00:00Z")]);
        chart.update(&[
            event("a", "A", "2026-08-07T10:00:00Z"),
            event("late", "Z", "2026-08-07T10:01:00Z"),
        ]);
        assert_eq!(chart.marks.len(), 1);
        assert_eq!(chart.skipped_count(), 1);
    }

    #[test]
    fn test_unparsable_timestamp_skipped() {
        let mut chart = chart_with(&[event("a", "A", "2026-08-07T10:00:00Z")]);
        chart.update(&[
            event("a", "A", "2026-08-07T10:00:00Z"),
            event("a", "A", "not-a-time"),
        ]);
        assert_eq!(chart.marks.len(), 1);
        assert_eq!(chart.skipped_count(), 1);
    }

    #[test]
    fn test_lane_positions_stable_across_updates() {
        let initial = [
            event("a", "A", "2026-08-07T10:00:00Z"),
            event("b", "B", "2026-08-07T10:05:00Z"),
        ];
        let mut chart = chart_with(&initial);
        let lane_a = chart.lanes.center("A").unwrap();
        let lane_b = chart.lanes.center("B").unwrap();

        chart.update(&[
            initial[0].clone(),
            initial[1].clone(),
            event("a", "A", "2026-08-07T10:20:00Z"),
        ]);
        assert_eq!(chart.lanes.center("A").unwrap(), lane_a);
        assert_eq!(chart.lanes.center("B").unwrap(), lane_b);
        // Exactly one band per grouping.
        assert_eq!(chart.lanes.domain().len(), 2);
    }

    #[test]
    fn test_shared_grouping_shares_color() {
        let chart = chart_with(&[
            event("a", "A", "2026-08-07T10:00:00Z"),
            event("a", "A", "2026-08-07T10:10:00Z"),
            event("b", "B", "2026-08-07T10:05:00Z"),
        ]);
        assert_eq!(chart.marks[0].color, chart.marks[1].color);
        assert_ne!(chart.marks[0].color, chart.marks[2].color);
    }

    #[test]
    fn test_resize_resets_transform_to_identity() {
        let mut chart = chart_with(&[event("a", "A", "2026-08-07T10:00:00Z")]);
        chart.view.transform = Transform { k: 3.0, tx: -120.0 };

        chart.apply_plot_size(Vec2::new(600.0, 370.0));
        assert_eq!(chart.view.transform, Transform::IDENTITY);

        // With the identity transform, effective == base for every mark.
        let effective = chart.view.effective();
        for mark in &chart.marks {
            assert_eq!(effective.scale(mark.t_ms), chart.view.base.scale(mark.t_ms));
        }
        assert_eq!(chart.view.base.range, (0.0, 600.0));
    }

    #[test]
    fn test_focus_transform_centers_at_3x() {
        let mut chart = chart_with(&[event("a", "A", "2026-08-07T10:00:00Z")]);
        chart.apply_plot_size(Vec2::new(800.0, 370.0));

        let t_ms = chart.marks[0].t_ms;
        let target = chart.focus_transform(t_ms);
        assert_eq!(target.k, FOCUS_ZOOM);

        let centered = target.rescale(&chart.view.base).scale(t_ms);
        assert!((centered - 400.0).abs() < 1e-2);
    }

    #[test]
    fn test_focus_on_latest_event_of_grouping() {
        let mut chart = chart_with(&[
            event("a", "A", "2026-08-07T10:00:00Z"),
            event("a", "A", "2026-08-07T10:30:00Z"),
            event("b", "B", "2026-08-07T10:45:00Z"),
        ]);
        chart.focus_on("A", 1.0);

        let anim = chart.focus.as_ref().unwrap();
        let latest = crate::events::parse_ms("2026-08-07T10:30:00Z").unwrap();
        assert_eq!(anim.to.k, FOCUS_ZOOM);
        assert!((anim.to.tx - chart.focus_transform(latest).tx).abs() < 1e-3);
    }

    #[test]
    fn test_select_callback_invoked_once_with_event() {
        let hits: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = hits.clone();
        let options = ChartOptions {
            on_select_event: Some(Box::new(move |e: &Event| {
                sink.borrow_mut().push(e.start_time.clone());
            })),
            ..Default::default()
        };
        let mut chart = TimelineChart::new(
            &[
                event("a", "A", "2026-08-07T10:00:00Z"),
                event("a", "A", "2026-08-07T10:10:00Z"),
            ],
            options,
        );

        chart.fire_select(1);
        assert_eq!(hits.borrow().as_slice(), ["2026-08-07T10:10:00Z"]);
    }

    #[test]
    fn test_empty_events_still_build_a_window() {
        let chart = chart_with(&[]);
        assert_eq!(chart.event_count(), 0);
        assert_eq!(chart.grouping_count(), 0);
        let (lower, upper) = chart.view.base.domain;
        assert_eq!(upper - lower, 3_600_000.0);
    }

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-6);
    }
}
