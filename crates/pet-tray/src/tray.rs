//! Tray handle, events, and update types.
//!
//! The actual system tray implementation depends on platform menu crates
//! that need system libraries. This module defines the channel-based
//! interface between the controller and whatever backend draws the tray.

use std::sync::mpsc;

use serde::Serialize;

use crate::menu::MenuItem;

/// Configuration for the system tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Product name shown in the tooltip and about box.
    pub app_name: String,
    /// Version shown in the about box.
    pub version: String,
    /// Optional icon data (PNG bytes).
    pub icon_data: Option<Vec<u8>>,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            app_name: live2d_pet_protocol::constants::APP_NAME.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            icon_data: None,
        }
    }
}

/// Contents of the about box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Events emitted by the tray backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// A menu item was clicked; carries the item's menu id.
    MenuClicked(String),
    /// The tray icon was double-clicked.
    DoubleClicked,
}

/// Updates sent to the tray backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum TrayUpdate {
    /// Replace the whole context menu.
    MenuRebuilt(Vec<MenuItem>),
    Tooltip(String),
    Balloon { title: String, content: String },
    About(AboutInfo),
    /// Request tray shutdown.
    Shutdown,
}

/// Controller-side handle to the tray backend.
pub struct TrayHandle {
    /// Send updates to the tray.
    update_tx: mpsc::Sender<TrayUpdate>,
    /// Receive events from the tray.
    event_rx: mpsc::Receiver<TrayEvent>,
    config: TrayConfig,
    /// Menu most recently installed.
    menu: Vec<MenuItem>,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)`; the sender/receiver
    /// pair is given to the tray backend.
    pub fn new(config: TrayConfig) -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = Self {
            update_tx,
            event_rx,
            config,
            menu: Vec::new(),
        };

        (handle, event_tx, update_rx)
    }

    /// Replaces the tray menu wholesale.
    pub fn install_menu(&mut self, items: Vec<MenuItem>) {
        self.menu = items.clone();
        self.send(TrayUpdate::MenuRebuilt(items));
    }

    pub fn set_tooltip(&self, text: impl Into<String>) {
        self.send(TrayUpdate::Tooltip(text.into()));
    }

    /// Shows a transient balloon notification next to the tray icon.
    pub fn display_balloon(&self, title: impl Into<String>, content: impl Into<String>) {
        self.send(TrayUpdate::Balloon {
            title: title.into(),
            content: content.into(),
        });
    }

    pub fn show_about(&self, description: impl Into<String>) {
        self.send(TrayUpdate::About(AboutInfo {
            name: self.config.app_name.clone(),
            version: self.config.version.clone(),
            description: description.into(),
        }));
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        self.send(TrayUpdate::Shutdown);
    }

    /// Tries to receive a tray event (non-blocking).
    pub fn try_recv_event(&self) -> Option<TrayEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Returns the menu most recently installed.
    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn config(&self) -> &TrayConfig {
        &self.config
    }

    fn send(&self, update: TrayUpdate) {
        if self.update_tx.send(update).is_err() {
            tracing::debug!("tray backend gone, update dropped");
        }
    }
}
