//! Hover tooltip content and placement.

use crate::events::Event;
use crate::format::Formatter;
use egui::{Pos2, Rect, Vec2};

/// Vertical drop below the pointer before edge correction.
const POINTER_DROP: f32 = 50.0;
/// Upward shift applied when the pointer is in the bottom third.
const FLIP_SHIFT: f32 = 200.0;

/// Tooltip body: experiment, status, start and (when present) end time.
pub fn content(event: &Event, fmt: &Formatter) -> String {
    let mut out = format!(
        "{}: {}\n{}: {}\n",
        fmt.experiment_label,
        event.experiment,
        fmt.status_label,
        fmt.status(event.finished()),
    );
    if let Some(start) = event.start_ms() {
        out.push_str(&format!("\n{}: {}", fmt.started_label, fmt.datetime(start)));
    }
    if let Some(end) = event.finish_ms() {
        out.push_str(&format!("\n{}: {}", fmt.ended_label, fmt.datetime(end)));
    }
    out
}

/// Top-left corner for a tooltip of `size`, near `pointer`, flipped away
/// from the container's right and bottom thirds so it stays on screen.
pub fn anchor(pointer: Pos2, container: Rect, size: Vec2) -> Pos2 {
    let mut x = pointer.x;
    let mut y = pointer.y + POINTER_DROP;

    if pointer.x > container.left() + container.width() * 2.0 / 3.0 {
        x -= size.x;
    }
    if pointer.y > container.top() + container.height() * 2.0 / 3.0 {
        y -= FLIP_SHIFT;
    }

    Pos2::new(x, y)
}
