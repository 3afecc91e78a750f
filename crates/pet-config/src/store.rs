use std::path::{Path, PathBuf};

use live2d_pet_protocol::WindowConfig;

use crate::error::ConfigError;
use crate::paths::window_config_path;

/// Reads and writes the window configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the platform default location.
    pub fn at_default_location() -> Self {
        Self::new(window_config_path())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted configuration.
    ///
    /// Falls back to [`WindowConfig::default`] when the file is missing,
    /// unreadable or malformed.
    pub fn load(&self) -> WindowConfig {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.path.display(),
                    "no window config found, using defaults"
                );
                return WindowConfig::default();
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to read window config, using defaults"
                );
                return WindowConfig::default();
            }
        };

        match serde_json::from_str::<WindowConfig>(&content) {
            Ok(config) => {
                tracing::debug!(?config, "window config loaded");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to parse window config, using defaults"
                );
                WindowConfig::default()
            }
        }
    }

    /// Overwrites the file with `config`.
    ///
    /// Failures are logged here and returned; callers treat them as non-fatal.
    pub fn save(&self, config: &WindowConfig) -> Result<(), ConfigError> {
        let result = self.write(config);
        match &result {
            Ok(()) => tracing::debug!(path = %self.path.display(), "window config saved"),
            Err(e) => tracing::error!(
                path = %self.path.display(),
                error = %e,
                "failed to save window config"
            ),
        }
        result
    }

    fn write(&self, config: &WindowConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, json)?;
        set_permissions_0600(&self.path);
        Ok(())
    }
}

fn set_permissions_0600(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
