//! Application configuration.
//!
//! [`AppConfig`] is built in code with chained setters, or read from a TOML
//! file where every field is optional:
//!
//! ```toml
//! title = "Enter"
//! width = 1280
//! height = 720
//! fade_duration = 1.0
//! zoom_duration = 1.0
//! antialias = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// Window and animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
    /// Seconds the canvas takes to fade out once the page is revealed.
    pub fade_duration: f32,
    /// Seconds of the camera zoom into the sphere.
    pub zoom_duration: f32,
    /// Render with 4x multisampling.
    pub antialias: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Sphere Reveal".to_string(),
            width: 800,
            height: 600,
            fade_duration: 1.0,
            zoom_duration: 1.0,
            antialias: true,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn fade_duration(mut self, seconds: f32) -> Self {
        self.fade_duration = seconds.max(0.0);
        self
    }

    pub fn zoom_duration(mut self, seconds: f32) -> Self {
        self.zoom_duration = seconds.max(0.0);
        self
    }

    pub fn antialias(mut self, enabled: bool) -> Self {
        self.antialias = enabled;
        self
    }

    /// MSAA sample count implied by [`AppConfig::antialias`].
    pub fn sample_count(&self) -> u32 {
        if self.antialias { 4 } else { 1 }
    }

    /// Parse a config from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Read a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    fn sanitized(mut self) -> Self {
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self.fade_duration = self.fade_duration.max(0.0);
        self.zoom_duration = self.zoom_duration.max(0.0);
        self
    }
}
