// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Settings are read from a YAML file. The path comes from the
//! `HOTSPOT_EDITOR_CONFIG` environment variable, falling back to
//! `hotspot-editor.yaml` in the working directory. Missing keys take their
//! defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::Mode;
use crate::util::geometry::Size;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HOTSPOT_EDITOR_CONFIG";
/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hotspot-editor.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest size a resize can produce, in pixels.
    pub min_width: f64,
    pub min_height: f64,
    /// Size of a freshly placed hotspot, in pixels.
    pub draft_width: f64,
    pub draft_height: f64,
    /// Minimum spacing between playback time updates.
    pub time_update_interval_ms: u64,
    /// Length of the video timeline in seconds.
    pub video_duration: f64,
    pub loop_playback: bool,
    /// Width over height of the video container.
    pub aspect_ratio: f32,
    /// Still frame drawn behind the hotspots.
    pub poster_image: Option<PathBuf>,
    pub start_mode: Mode,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_width: 60.0,
            min_height: 40.0,
            draft_width: 200.0,
            draft_height: 100.0,
            time_update_interval_ms: 100,
            video_duration: 60.0,
            loop_playback: true,
            aspect_ratio: 16.0 / 9.0,
            poster_image: None,
            start_mode: Mode::View,
        }
    }
}

impl EditorConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration file from the environment.
    ///
    /// Returns the defaults when no file is configured or present.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_width >= 0.0 && self.min_height >= 0.0) {
            bail!("minimum size must not be negative");
        }
        if !(self.draft_width > 0.0 && self.draft_height > 0.0) {
            bail!("draft size must be positive");
        }
        if !(self.video_duration > 0.0) {
            bail!("video_duration must be positive");
        }
        if !(self.aspect_ratio > 0.0) {
            bail!("aspect_ratio must be positive");
        }
        Ok(())
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    pub fn draft_size(&self) -> Size {
        Size::new(self.draft_width, self.draft_height)
    }

    pub fn time_update_interval(&self) -> Duration {
        Duration::from_millis(self.time_update_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EditorConfig::from_yaml("min_width: 80\nstart_mode: edit\n").unwrap();
        assert_eq!(config.min_width, 80.0);
        assert_eq!(config.min_height, 40.0);
        assert_eq!(config.start_mode, Mode::Edit);
        assert_eq!(config.time_update_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(EditorConfig::from_yaml("video_duration: 0").is_err());
        assert!(EditorConfig::from_yaml("draft_width: -5").is_err());
        assert!(EditorConfig::from_yaml("min_height: -1").is_err());
        assert!(EditorConfig::from_yaml("aspect_ratio: 0").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(EditorConfig::load(Path::new("no/such/config.yaml")).is_err());
    }
}
