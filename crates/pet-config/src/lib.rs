//! Window configuration persistence.
//!
//! Stores the pet window's geometry and flags as pretty-printed JSON at
//! `<config dir>/live2d-pet/live2d-pet-config.json`:
//! - Linux: `~/.config/live2d-pet/`
//! - Windows: `%APPDATA%\live2d-pet\`
//!
//! Loading never fails: a missing or unreadable file yields the default
//! record. Saving reports failures to the caller, who decides whether to care.

mod error;
mod paths;
mod position;
mod store;

pub use error::ConfigError;
pub use paths::{app_config_dir, window_config_path};
pub use position::default_position;
pub use store::ConfigStore;
