use std::path::PathBuf;

/// Directory name under the platform config base.
const APP_DIR: &str = "live2d-pet";

/// File name of the persisted window configuration.
const WINDOW_CONFIG_FILE: &str = "live2d-pet-config.json";

/// Per-user application data directory.
pub fn app_config_dir() -> PathBuf {
    config_base_dir().join(APP_DIR)
}

/// Default location of the window configuration file.
pub fn window_config_path() -> PathBuf {
    app_config_dir().join(WINDOW_CONFIG_FILE)
}

fn config_base_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".config")
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        PathBuf::from("/tmp")
    }
}
