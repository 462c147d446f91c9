//! Events file loader with caching.
//!
//! Reads events from a JSONL file (one event per line), caches the parsed
//! set, and invalidates the cache when the file's mtime changes. This is
//! what drives live chart updates while an experiment run appends events.

use super::{parse_ms, Event};
use chrono::Utc;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::time::SystemTime;

/// Result of loading the events file.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub count: usize,
    pub parse_errors: usize,
}

/// File-backed event source with mtime-based cache invalidation.
pub struct EventLoader {
    path: Option<PathBuf>,
    events: Vec<Event>,
    last_mtime: Option<SystemTime>,
    cache_valid: bool,
    last_check: std::time::Instant,
    /// Minimum interval between mtime checks.
    check_interval: std::time::Duration,
    pub parse_errors: usize,
}

impl EventLoader {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            events: Vec::new(),
            last_mtime: None,
            cache_valid: false,
            last_check: std::time::Instant::now(),
            check_interval: std::time::Duration::from_millis(500),
            parse_errors: 0,
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Check if the cache needs to be reloaded.
    pub fn needs_refresh(&mut self) -> bool {
        let now = std::time::Instant::now();
        if now.duration_since(self.last_check) < self.check_interval {
            return !self.cache_valid;
        }
        self.last_check = now;

        let Some(ref path) = self.path else {
            return !self.cache_valid;
        };

        let current_mtime = std::fs::metadata(path).ok().and_then(|m| m.modified().ok());

        let changed = match (current_mtime, self.last_mtime) {
            (Some(current), Some(last)) => current != last,
            (Some(_), None) => true,
            (None, Some(_)) => true,
            (None, None) => false,
        };
        if changed {
            self.cache_valid = false;
        }

        !self.cache_valid
    }

    /// Load and parse the events file, updating the cache.
    ///
    /// Malformed lines are counted, not fatal. With no file configured a
    /// built-in sample dataset is produced so the app renders out of the
    /// box.
    pub fn load(&mut self) -> LoadResult {
        let Some(path) = self.path.clone() else {
            self.events = sample_events();
            self.parse_errors = 0;
            self.cache_valid = true;
            return LoadResult {
                count: self.events.len(),
                parse_errors: 0,
            };
        };

        self.last_mtime = std::fs::metadata(&path).ok().and_then(|m| m.modified().ok());

        let mut events = Vec::new();
        let mut parse_errors = 0;

        match File::open(&path) {
            Ok(file) => {
                let reader = BufReader::new(file);
                for line in reader.lines() {
                    let Ok(line) = line else {
                        parse_errors += 1;
                        continue;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<Event>(&line) {
                        Ok(event) => events.push(event),
                        Err(_) => parse_errors += 1,
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not open events file");
            }
        }

        // Chronological order; unparsable timestamps sort first and are
        // skipped by the chart anyway.
        events.sort_by(|a, b| {
            let a_ms = a.start_ms().unwrap_or(f64::MIN);
            let b_ms = b.start_ms().unwrap_or(f64::MIN);
            a_ms.partial_cmp(&b_ms).unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::info!(
            path = %path.display(),
            count = events.len(),
            parse_errors,
            "loaded events"
        );

        self.events = events;
        self.parse_errors = parse_errors;
        self.cache_valid = true;

        LoadResult {
            count: self.events.len(),
            parse_errors,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

/// Demo dataset: three experiments over the last hour.
fn sample_events() -> Vec<Event> {
    let now = Utc::now();
    let at = |mins_ago: i64| (now - chrono::Duration::minutes(mins_ago)).to_rfc3339();

    let mut events = Vec::new();
    for (name, id, starts) in [
        ("pod-failure", "sample-a", vec![55, 40, 25, 10]),
        ("network-delay", "sample-b", vec![50, 20]),
        ("io-latency", "sample-c", vec![35, 5]),
    ] {
        for (i, mins_ago) in starts.iter().enumerate() {
            let finished = i + 1 < starts.len();
            events.push(Event {
                experiment: name.into(),
                experiment_id: id.into(),
                start_time: at(*mins_ago),
                finish_time: finished.then(|| at(mins_ago - 3)),
            });
        }
    }
    events.sort_by(|a, b| {
        let a_ms = parse_ms(&a.start_time).unwrap_or(f64::MIN);
        let b_ms = parse_ms(&b.start_time).unwrap_or(f64::MIN);
        a_ms.partial_cmp(&b_ms).unwrap_or(std::cmp::Ordering::Equal)
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_counts_parse_errors() {
        let path = write_temp(
            "timeline_native_loader_errors.jsonl",
            concat!(
                r#"{"experiment":"a","experiment_id":"A","start_time":"2026-08-07T10:00:00Z"}"#,
                "\n",
                "not json\n",
                "\n",
                r#"{"experiment":"b","experiment_id":"B","start_time":"2026-08-07T09:00:00Z","finish_time":"2026-08-07T09:30:00Z"}"#,
                "\n",
            ),
        );

        let mut loader = EventLoader::new(Some(path));
        let result = loader.load();
        assert_eq!(result.count, 2);
        assert_eq!(result.parse_errors, 1);

        // Sorted chronologically
        let events = loader.events();
        assert_eq!(events[0].experiment_id, "B");
        assert!(events[1].finish_time.is_none());
    }

    #[test]
    fn test_missing_file_is_empty_not_fatal() {
        let mut loader = EventLoader::new(Some(PathBuf::from("/nonexistent/events.jsonl")));
        let result = loader.load();
        assert_eq!(result.count, 0);
        assert_eq!(result.parse_errors, 0);
    }

    #[test]
    fn test_no_path_produces_sample_data() {
        let mut loader = EventLoader::new(None);
        loader.load();
        assert!(!loader.events().is_empty());
        assert!(loader.events().iter().all(|e| e.start_ms().is_some()));
    }

    #[test]
    fn test_refresh_after_write() {
        let path = write_temp("timeline_native_loader_refresh.jsonl", "");
        let mut loader = EventLoader::new(Some(path.clone()));
        loader.load();
        assert!(!loader.needs_refresh());

        // Backdate the recorded mtime rather than sleeping for a real
        // filesystem tick.
        loader.last_mtime = Some(SystemTime::UNIX_EPOCH);
        loader.last_check = std::time::Instant::now() - std::time::Duration::from_secs(1);
        assert!(loader.needs_refresh());
    }
}
