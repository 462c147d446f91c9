//! Experiment event data model.

pub mod loader;

pub use loader::EventLoader;

use chrono::DateTime;
use serde::Deserialize;

/// A single timestamped occurrence belonging to one experiment.
///
/// Events are read-only inputs; the chart never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Event {
    /// Display name of the owning experiment.
    pub experiment: String,
    /// Stable unique id of the owning experiment.
    pub experiment_id: String,
    /// ISO-8601 start timestamp.
    pub start_time: String,
    /// ISO-8601 finish timestamp; absent while the experiment runs.
    #[serde(default)]
    pub finish_time: Option<String>,
}

/// Stable identity used to reconcile rendered marks across updates.
pub type EventKey = (String, String);

impl Event {
    /// Start timestamp as epoch milliseconds.
    pub fn start_ms(&self) -> Option<f64> {
        parse_ms(&self.start_time)
    }

    /// Finish timestamp as epoch milliseconds.
    pub fn finish_ms(&self) -> Option<f64> {
        self.finish_time.as_deref().and_then(parse_ms)
    }

    pub fn finished(&self) -> bool {
        self.finish_time.is_some()
    }

    pub fn key(&self) -> EventKey {
        (self.experiment_id.clone(), self.start_time.clone())
    }
}

/// Parse an ISO-8601 timestamp to epoch milliseconds.
pub fn parse_ms(ts: &str) -> Option<f64> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.timestamp_millis() as f64)
}

/// An experiment lane: display name plus stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouping {
    pub name: String,
    pub uuid: String,
}

/// Distinct experiments in first-seen order.
///
/// If the same id appears under two display names, the first-seen name
/// wins; later names only show up in per-event tooltips.
pub fn unique_groupings(events: &[Event]) -> Vec<Grouping> {
    let mut seen: Vec<Grouping> = Vec::new();
    for e in events {
        if !seen.iter().any(|g| g.uuid == e.experiment_id) {
            seen.push(Grouping {
                name: e.experiment.clone(),
                uuid: e.experiment_id.clone(),
            });
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, id: &str, start: &str) -> Event {
        Event {
            experiment: name.into(),
            experiment_id: id.into(),
            start_time: start.into(),
            finish_time: None,
        }
    }

    #[test]
    fn test_parse_ms() {
        let ms = parse_ms("2026-08-07T12:00:00Z");
        assert!(ms.is_some());

        let later = parse_ms("2026-08-07T12:30:00+00:00").unwrap();
        assert_eq!(later - ms.unwrap(), 30.0 * 60.0 * 1000.0);

        // Offsets are honored
        let offset = parse_ms("2026-08-07T13:00:00+01:00").unwrap();
        assert_eq!(offset, ms.unwrap());
    }

    #[test]
    fn test_parse_ms_rejects_garbage() {
        assert!(parse_ms("yesterday").is_none());
        assert!(parse_ms("2026-08-07").is_none());
        assert!(parse_ms("").is_none());
    }

    #[test]
    fn test_groupings_first_seen_order() {
        let events = vec![
            event("net-delay", "B", "2026-08-07T10:00:00Z"),
            event("pod-kill", "A", "2026-08-07T10:05:00Z"),
            event("net-delay", "B", "2026-08-07T10:10:00Z"),
        ];
        let groups = unique_groupings(&events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].uuid, "B");
        assert_eq!(groups[1].uuid, "A");
    }

    #[test]
    fn test_groupings_first_seen_name_wins() {
        let events = vec![
            event("pod-kill", "A", "2026-08-07T10:00:00Z"),
            event("pod-kill-renamed", "A", "2026-08-07T10:05:00Z"),
        ];
        let groups = unique_groupings(&events);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "pod-kill");
    }

    #[test]
    fn test_event_key_distinguishes_same_experiment() {
        let a = event("x", "A", "2026-08-07T10:00:00Z");
        let b = event("x", "A", "2026-08-07T10:05:00Z");
        assert_ne!(a.key(), b.key());
    }
}
