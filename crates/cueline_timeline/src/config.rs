// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline settings.
//!
//! Settings are stored as RON. Every field has a default so partial files
//! load; a missing file is the caller's decision.

use crate::domain::{DomainError, NumericDomain};
use crate::drag::DragFps;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default settings file name
pub const CONFIG_FILE_NAME: &str = "cueline.ron";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// A domain could not be built
    #[error("Invalid domain: {0}")]
    Domain(#[from] DomainError),

    /// Settings are inconsistent
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Pixel metrics of the timeline surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of the controls/track-name column
    pub track_column_width: f32,
    /// Height of the controls/ruler row
    pub header_height: f32,
    /// Height of one track row
    pub row_height: f32,
    /// Horizontal padding around time content
    pub content_padding: f32,
    /// Total height of the timeline strip
    pub panel_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            track_column_width: 300.0,
            header_height: 40.0,
            row_height: 40.0,
            content_padding: 16.0,
            panel_height: 300.0,
        }
    }
}

/// Timeline surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Duration domain, in milliseconds
    pub duration: NumericDomain,
    /// Current-time step, in milliseconds
    pub current_time_step: f64,
    /// Current-time lower bound, in milliseconds
    pub current_time_min: f64,
    /// Initial duration (defaults to the duration max)
    pub initial_duration_time: Option<f64>,
    /// Initial current time (defaults to the current-time min)
    pub initial_current_time: Option<f64>,
    /// Publish rate while scrubbing the ruler
    pub drag_fps: DragFps,
    /// Track names shown in the track list
    pub tracks: Vec<String>,
    /// Pixel metrics
    pub layout: LayoutConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            duration: NumericDomain::from_parts(10.0, 100.0, 6000.0),
            current_time_step: 10.0,
            current_time_min: 0.0,
            initial_duration_time: None,
            initial_current_time: None,
            drag_fps: DragFps::Thirty,
            tracks: ('A'..='J').map(|c| format!("Track {c}")).collect(),
            layout: LayoutConfig::default(),
        }
    }
}

impl TimelineConfig {
    /// Domain of the current time before any duration is applied
    pub fn current_time_domain(&self) -> std::result::Result<NumericDomain, DomainError> {
        NumericDomain::new(
            self.current_time_step,
            self.current_time_min,
            self.duration.max().max(self.current_time_min),
        )
    }

    /// Check that the settings describe a usable timeline
    pub fn validate(&self) -> Result<()> {
        self.current_time_domain()?;
        if self.current_time_min > self.duration.min() {
            return Err(ConfigError::Invalid(format!(
                "current time min {} is above the shortest duration {}",
                self.current_time_min,
                self.duration.min()
            )));
        }
        let layout = &self.layout;
        let metrics = [
            layout.track_column_width,
            layout.header_height,
            layout.row_height,
            layout.panel_height,
        ];
        if metrics.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            return Err(ConfigError::Invalid("layout metrics must be positive".to_string()));
        }
        if !layout.content_padding.is_finite() || layout.content_padding < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "content padding {} must be zero or positive",
                layout.content_padding
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from RON text
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize settings to pretty RON
    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        tracing::info!("Loaded timeline settings from {}", path.display());
        Ok(config)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron_string()?)?;
        tracing::info!("Saved timeline settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let config = TimelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.duration.min(), 100.0);
        assert_eq!(config.duration.max(), 6000.0);
        assert_eq!(config.tracks.len(), 10);
        assert_eq!(config.tracks[0], "Track A");
        assert_eq!(config.drag_fps, DragFps::Thirty);
    }

    #[test]
    fn test_serialization() {
        let mut config = TimelineConfig::default();
        config.initial_current_time = Some(120.0);
        config.drag_fps = DragFps::Sixty;
        let text = config.to_ron_string().unwrap();
        let loaded = TimelineConfig::from_ron_str(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = TimelineConfig::from_ron_str("(tracks: [\"Intro\", \"Outro\"])").unwrap();
        assert_eq!(config.tracks, vec!["Intro".to_string(), "Outro".to_string()]);
        assert_eq!(config.current_time_step, 10.0);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let err = TimelineConfig::from_ron_str("(current_time_step: 0.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Domain(_)));

        let err = TimelineConfig::from_ron_str("(current_time_min: 500.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = TimelineConfig::from_ron_str("(duration: (step: 10.0, min: 10.0, max: 1.0))")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_content_padding_is_checked() {
        let err = TimelineConfig::from_ron_str("(layout: (content_padding: -4.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let mut config = TimelineConfig::default();
        config.layout.content_padding = f32::NAN;
        assert!(config.validate().is_err());

        config.layout.content_padding = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("cueline-{}.ron", uuid::Uuid::new_v4()));
        let config = TimelineConfig::default();
        config.save(&path).unwrap();
        let loaded = TimelineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
