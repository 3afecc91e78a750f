//! Application settings.
//!
//! Stored as TOML next to the window config:
//! - Linux: `~/.config/live2d-pet/settings.toml`
//! - Windows: `%APPDATA%/live2d-pet/settings.toml`

use std::path::{Path, PathBuf};

use live2d_pet_protocol::constants::{
    DEFAULT_OPACITY_PERCENT, DEFAULT_SCALE_PERCENT, DEFAULT_SENSITIVITY,
};
use live2d_pet_tray::ControllerOptions;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`Settings::environment`].
const ENV_VAR: &str = "LIVE2D_PET_ENV";

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Model shown at startup (first catalog model when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_model: Option<String>,

    /// Initial model scale in percent.
    #[serde(default = "default_scale")]
    pub initial_scale: u16,

    /// Initial opacity in percent.
    #[serde(default = "default_opacity")]
    pub initial_opacity: u8,

    /// Initial lip-sync sensitivity.
    #[serde(default = "default_sensitivity")]
    pub lip_sync_sensitivity: u8,

    /// Catalog file replacing the built-in model list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub environment: Environment,
}

fn default_scale() -> u16 {
    DEFAULT_SCALE_PERCENT
}

fn default_opacity() -> u8 {
    DEFAULT_OPACITY_PERCENT
}

fn default_sensitivity() -> u8 {
    DEFAULT_SENSITIVITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_model: None,
            initial_scale: default_scale(),
            initial_opacity: default_opacity(),
            lip_sync_sensitivity: default_sensitivity(),
            catalog_path: None,
            environment: Environment::default(),
        }
    }
}

impl Settings {
    /// Loads settings from the default location, honoring `LIVE2D_PET_ENV`.
    pub fn load() -> Self {
        let path = live2d_pet_config::app_config_dir().join("settings.toml");
        Self::load_from(&path).with_env_override(std::env::var(ENV_VAR).ok().as_deref())
    }

    /// Loads settings from `path`, writing defaults if the file is missing.
    ///
    /// Never fails: an unreadable or unparsable file is reported and replaced
    /// by defaults in memory, and a failed write of the defaults is reported
    /// and ignored.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            let settings = Settings::default();
            if let Err(e) = settings.save_to(path) {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to write default settings, continuing with defaults"
                );
            }
            return settings;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read settings, using defaults"
                );
                return Settings::default();
            }
        };

        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse settings, using defaults"
                );
                Settings::default()
            }
        }
    }

    /// Writes settings to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Applies an environment override (`development` / `production`).
    /// Unrecognized values are ignored.
    pub fn with_env_override(mut self, value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("development") => self.environment = Environment::Development,
            Some("production") => self.environment = Environment::Production,
            Some(other) => tracing::warn!(value = other, "unknown {ENV_VAR} value, ignored"),
            None => {}
        }
        self
    }

    /// Update checks run everywhere except in development.
    pub fn auto_update_enabled(&self) -> bool {
        self.environment != Environment::Development
    }

    /// Startup options for the tray controller.
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            initial_model: self.initial_model.clone(),
            scale_percent: self.initial_scale,
            opacity_percent: self.initial_opacity,
            lip_sync_sensitivity: self.lip_sync_sensitivity,
        }
    }
}
