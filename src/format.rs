//! Display-string formatting for timestamps and event status.
//!
//! The chart never hardcodes user-facing wording; everything it prints
//! goes through a `Formatter` so a host can swap labels or date patterns
//! without touching the render code. Times are rendered in UTC.

use chrono::DateTime;

/// Labels and date patterns used by the tooltip and the time axis.
#[derive(Debug, Clone)]
pub struct Formatter {
    pub experiment_label: String,
    pub status_label: String,
    pub started_label: String,
    pub ended_label: String,
    pub finished_label: String,
    pub running_label: String,
    /// Pattern for full timestamps in the tooltip.
    pub datetime_pattern: String,
    /// Pattern for axis tick labels.
    pub tick_pattern: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            experiment_label: "Experiment".into(),
            status_label: "Status".into(),
            started_label: "Started".into(),
            ended_label: "Ended".into(),
            finished_label: "Finished".into(),
            running_label: "Running".into(),
            datetime_pattern: "%Y-%m-%d %H:%M:%S".into(),
            tick_pattern: "%m-%d %H:%M".into(),
        }
    }
}

impl Formatter {
    pub fn status(&self, finished: bool) -> &str {
        if finished {
            &self.finished_label
        } else {
            &self.running_label
        }
    }

    /// Full timestamp for the tooltip, from epoch milliseconds.
    pub fn datetime(&self, ms: f64) -> String {
        format_ms(ms, &self.datetime_pattern)
    }

    /// Axis tick label, from epoch milliseconds.
    pub fn tick(&self, ms: f64) -> String {
        format_ms(ms, &self.tick_pattern)
    }
}

fn format_ms(ms: f64, pattern: &str) -> String {
    match DateTime::from_timestamp_millis(ms as i64) {
        Some(dt) => dt.format(pattern).to_string(),
        None => String::new(),
    }
}
