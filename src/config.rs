// ABOUTME: Manager configuration loaded from TOML or built in code
// Validated once at construction; invalid values are rejected before any toast exists

use crate::toast::ToastError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Screen slot the renderer anchors the stack to. Not interpreted by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToasterConfig {
    pub max_visible: usize,
    pub default_duration_ms: u64,
    pub animation_duration_ms: u64,
    pub position: Position,
}

impl Default for ToasterConfig {
    fn default() -> Self {
        Self {
            max_visible: Self::DEFAULT_MAX_VISIBLE,
            default_duration_ms: Self::DEFAULT_DURATION_MS,
            animation_duration_ms: Self::DEFAULT_ANIMATION_MS,
            position: Position::default(),
        }
    }
}

impl ToasterConfig {
    pub const DEFAULT_MAX_VISIBLE: usize = 5;
    pub const DEFAULT_DURATION_MS: u64 = 5000;
    pub const DEFAULT_ANIMATION_MS: u64 = 300;

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible;
        self
    }

    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration_ms = millis(duration);
        self
    }

    pub fn with_animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration_ms = millis(duration);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_duration_ms)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn validate(&self) -> Result<(), ToastError> {
        if self.max_visible == 0 {
            return Err(ToastError::InvalidConfig(
                "max_visible must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ToastError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ToastError> {
        debug!("Loading toast config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// `<config dir>/toast-queue/config.toml` for the current platform.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "toast-queue").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the default config file when present, otherwise falls back to built-in defaults.
    pub fn load_or_default() -> Result<Self, ToastError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                info!("Using toast config at {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
