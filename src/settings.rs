//! Host configuration
//!
//! Read once at startup. Natively the JSON file named by
//! `SAT_DEFENSE_SETTINGS` is used when present; the browser build always
//! starts from defaults and sizes the canvas from the page.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::FRAME_MS;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "SAT_DEFENSE_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Session and host-loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Spawn RNG seed; random when absent
    pub seed: Option<u64>,
    /// Frame period for the headless driver
    pub frame_ms: u64,
    /// Headless run length in frames
    pub max_frames: u64,
    /// Let the built-in policy play (headless only)
    pub autoplay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 400.0,
            canvas_height: 600.0,
            seed: None,
            frame_ms: FRAME_MS,
            max_frames: 60 * 60 * 5,
            autoplay: true,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(SettingsError::Invalid {
                field: "canvas",
                reason: "dimensions must be positive",
            });
        }
        if self.frame_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "frame_ms",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Seed to use for this run
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Load from the file named by `SAT_DEFENSE_SETTINGS`, falling back to
    /// defaults when it is unset or unusable
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(err) => {
                log::warn!("Ignoring settings file: {}", err);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "autoplay": false }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert!(!settings.autoplay);
        assert_eq!(settings.canvas_width, 400.0);
        assert_eq!(settings.frame_ms, FRAME_MS);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "canvas_width": 0 }"#),
            Err(SettingsError::Invalid { field: "canvas", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "frame_ms": 0 }"#),
            Err(SettingsError::Invalid { field: "frame_ms", .. })
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Settings::load_from("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_fixed_seed_is_used() {
        let settings = Settings {
            seed: Some(9),
            ..Settings::default()
        };
        assert_eq!(settings.resolve_seed(), 9);
    }
}
