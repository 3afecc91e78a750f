//! Tray menu and state controller for the Live2D pet.
//!
//! The controller keeps one [`AppState`](live2d_pet_protocol::AppState) and
//! projects it into a tray menu after every change. Inputs arrive as:
//! - menu clicks ([`Intent`]s, via [`TrayEvent`] ids)
//! - render-surface notifications and queries
//! - window host events ([`WindowEvent`])
//!
//! Outputs leave through the [`RenderSurface`] seam (commands), the
//! [`WindowHost`] seam (window operations), the [`ConfigStore`] (persisted
//! window config) and the [`TrayHandle`] channel (menu, tooltip, balloons).
//!
//! [`ConfigStore`]: live2d_pet_config::ConfigStore
//!
//! # Threading
//! All of it runs on one thread. Events are serialized by the host's event
//! loop, so nothing here locks.

mod controller;
mod intent;
pub mod menu;
mod surface;
mod tray;

pub use controller::{ControllerOptions, Flow, TrayController};
pub use intent::{Intent, IntentError};
pub use menu::{ItemKind, MenuItem};
pub use surface::{ChannelError, RenderSurface, WindowEvent, WindowHost};
pub use tray::{AboutInfo, TrayConfig, TrayEvent, TrayHandle, TrayUpdate};
