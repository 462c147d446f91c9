//! Persistent preferences for the timeline app.
//!
//! Only preferences are stored; view state (pan/zoom) is never
//! persisted.

use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All persistable UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_enable_legends")]
    pub enable_legends: bool,
    /// JSONL events file to watch; the built-in sample set renders when
    /// unset.
    #[serde(default)]
    pub events_path: Option<PathBuf>,
}

fn default_enable_legends() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            enable_legends: true,
            events_path: None,
        }
    }
}

impl Settings {
    /// Get the path to the settings file
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("timeline-native");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, returning defaults if file doesn't exist or is invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("could not determine config directory, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    tracing::info!(path = %path.display(), "loaded settings");
                    settings
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse settings file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                // File doesn't exist yet, that's fine
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            tracing::warn!("could not determine config directory, settings not saved");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "failed to create config directory");
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!(error = %e, "failed to write settings file");
                } else {
                    tracing::info!(path = %path.display(), "saved settings");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize settings");
            }
        }
    }
}
