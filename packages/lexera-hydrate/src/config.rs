/// Hydration settings: the date and time patterns used to parse item metadata.
/// Global settings are read from a JSON file; a board may override each key.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DATE_FORMAT_KEY: &str = "date-format";
pub const TIME_FORMAT_KEY: &str = "time-format";

fn default_date_format() -> String {
    "YYYY-MM-DD".to_string()
}

fn default_time_format() -> String {
    "HH:mm".to_string()
}

/// Moment-style patterns (`YYYY-MM-DD`, `HH:mm`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HydrateSettings {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for HydrateSettings {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            time_format: default_time_format(),
        }
    }
}

/// Per-board overrides, stored with the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BoardSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
}

impl HydrateSettings {
    pub fn get_by_key(&self, key: &str) -> Option<String> {
        match key {
            DATE_FORMAT_KEY => Some(self.date_format.clone()),
            TIME_FORMAT_KEY => Some(self.time_format.clone()),
            _ => None,
        }
    }

    /// Blank values are ignored so a cleared field keeps the previous pattern.
    pub fn set_by_key(&mut self, key: &str, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        match key {
            DATE_FORMAT_KEY => self.date_format = value.to_string(),
            TIME_FORMAT_KEY => self.time_format = value.to_string(),
            _ => {}
        }
    }

    /// Board overrides win over the global values.
    pub fn overlay(&self, board: &BoardSettings) -> HydrateSettings {
        let mut merged = self.clone();
        if let Some(fmt) = &board.date_format {
            merged.set_by_key(DATE_FORMAT_KEY, fmt);
        }
        if let Some(fmt) = &board.time_format {
            merged.set_by_key(TIME_FORMAT_KEY, fmt);
        }
        merged
    }
}

/// Load settings from a JSON file. Returns defaults if the file is missing or invalid.
pub fn load_settings(path: &Path) -> HydrateSettings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!(
                "[lexera.hydrate.config] Failed to parse settings {}: {}",
                path.display(),
                e
            );
            HydrateSettings::default()
        }),
        Err(_) => HydrateSettings::default(),
    }
}
