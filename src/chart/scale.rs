//! Scales mapping the event domain onto the plot.
//!
//! `TimeScale` and `Transform` compose into the effective horizontal
//! mapping; `BandScale` fixes one vertical lane per experiment;
//! `OrdinalColors` assigns the categorical palette.

use chrono::{DateTime, Duration, Utc};
use egui::Color32;

/// Zoom factor bounds for the user transform.
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 6.0;

/// Continuous linear map from epoch milliseconds to horizontal pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
}

impl TimeScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, t: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        let frac = (t - d0) / (d1 - d0);
        r0 + frac as f32 * (r1 - r0)
    }

    pub fn invert(&self, px: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        let frac = ((px - r0) / (r1 - r0)) as f64;
        d0 + frac * (d1 - d0)
    }

    pub fn set_range(&mut self, range: (f32, f32)) {
        self.range = range;
    }
}

/// Initial time domain: a 1-hour window ending 30 minutes past the most
/// recent event, or past `now` when there are no events.
pub fn initial_domain(last_start_ms: Option<f64>, now: DateTime<Utc>) -> (f64, f64) {
    let anchor = last_start_ms.unwrap_or(now.timestamp_millis() as f64);
    let upper = anchor + Duration::minutes(30).num_milliseconds() as f64;
    let lower = upper - Duration::hours(1).num_milliseconds() as f64;
    (lower, upper)
}

/// Pan/zoom state applied on top of the base time scale.
///
/// Screen position of a timestamp is `k * base(t) + tx`, in plot-local
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub k: f32,
    pub tx: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self { k: 1.0, tx: 0.0 };

    pub fn apply(&self, x: f32) -> f32 {
        self.k * x + self.tx
    }

    /// Effective scale under this transform. The base stays untouched;
    /// only the range is re-projected.
    pub fn rescale(&self, base: &TimeScale) -> TimeScale {
        TimeScale {
            domain: base.domain,
            range: (self.apply(base.range.0), self.apply(base.range.1)),
        }
    }

    /// Zoom by `factor` keeping the screen point `anchor_x` fixed.
    /// The resulting factor is clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn zoom_at(&self, anchor_x: f32, factor: f32) -> Self {
        let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let applied = k / self.k;
        Self {
            k,
            tx: anchor_x - (anchor_x - self.tx) * applied,
        }
    }

    pub fn pan(&self, dx: f32) -> Self {
        Self {
            k: self.k,
            tx: self.tx + dx,
        }
    }
}

/// Discrete map from experiment id to a vertical band.
///
/// Band arithmetic with equal inner and outer padding: with padding `p`,
/// `step = extent / (n - p + 2p)` and `bandwidth = step * (1 - p)`.
/// The domain is fixed at construction for the life of the chart.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f32, f32),
    padding: f32,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f32, f32), padding: f32) -> Self {
        Self {
            domain,
            range,
            padding,
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn set_range(&mut self, range: (f32, f32)) {
        self.range = range;
    }

    fn step(&self) -> f32 {
        let n = self.domain.len() as f32;
        let extent = self.range.1 - self.range.0;
        extent / (n - self.padding + 2.0 * self.padding).max(1.0)
    }

    pub fn bandwidth(&self) -> f32 {
        self.step() * (1.0 - self.padding)
    }

    /// Top edge of the band for `id`, or None for an unknown id.
    pub fn position(&self, id: &str) -> Option<f32> {
        let idx = self.domain.iter().position(|d| d == id)?;
        let n = self.domain.len() as f32;
        let step = self.step();
        let extent = self.range.1 - self.range.0;
        // Center the used span inside the range.
        let start = self.range.0 + (extent - step * (n - self.padding)) * 0.5;
        Some(start + step * idx as f32)
    }

    /// Vertical center of the band for `id`.
    pub fn center(&self, id: &str) -> Option<f32> {
        self.position(id).map(|top| top + self.bandwidth() / 2.0)
    }
}

/// First-seen assignment from experiment id to the categorical palette,
/// cycling when ids outnumber colors.
#[derive(Debug, Clone)]
pub struct OrdinalColors {
    domain: Vec<String>,
    palette: &'static [Color32],
}

impl OrdinalColors {
    pub fn new(palette: &'static [Color32]) -> Self {
        Self {
            domain: Vec::new(),
            palette,
        }
    }

    pub fn color(&mut self, id: &str) -> Color32 {
        let idx = match self.domain.iter().position(|d| d == id) {
            Some(idx) => idx,
            None => {
                self.domain.push(id.to_string());
                self.domain.len() - 1
            }
        };
        self.palette[idx % self.palette.len()]
    }
}
