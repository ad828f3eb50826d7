use crate::constants::{DEFAULT_ICON_SIZE, DEFAULT_SPRITE_PATH};
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub icons: IconsConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Sprite sheet location and rendering defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Path of the sprite sheet, relative to `origin` or `assets_dir`.
    pub sprite_path: String,
    /// HTTP origin (`https://cdn.example.com`). When absent the sheet is read from `assets_dir`.
    pub origin: Option<String>,
    /// Local directory serving static assets.
    pub assets_dir: PathBuf,
    /// Icon edge length used when a request names no dimensions.
    pub default_size: f64,
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    /// Extra directives, e.g. `arcade_icons=debug`.
    pub env_filter: Option<String>,
    pub console: bool,
    /// Directory for rolling log files; file output is disabled when absent.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

// --- Default ---

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            sprite_path: DEFAULT_SPRITE_PATH.to_owned(),
            origin: None,
            assets_dir: PathBuf::from("public"),
            default_size: DEFAULT_ICON_SIZE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            env_filter: None,
            console: true,
            path: None,
            json: false,
            max_files: 10,
        }
    }
}
