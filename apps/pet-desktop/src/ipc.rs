//! JSON-lines bridge to the UI host process.
//!
//! Every line on stdin is one [`Inbound`] message and every line written to
//! stdout is one [`Outbound`] message. Both are tagged by `channel`:
//!
//! ```text
//! {"channel":"notification","id":1,"message":{"type":"model-loaded","payload":"idol"}}
//! {"channel":"query","id":2,"query":{"type":"get-app-state"}}
//! {"channel":"menu","id":"set-opacity:50"}
//! {"channel":"window","event":"moved","bounds":{"x":10,"y":20,"width":300,"height":400}}
//! {"channel":"tray-double-click"}
//! ```

use live2d_pet_protocol::{
    Bounds, QueryResponse, SurfaceCommand, SurfaceNotification, SurfaceQuery,
};
use live2d_pet_tray::TrayUpdate;
use serde::{Deserialize, Serialize};

/// Messages read from the UI host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "channel", rename_all = "kebab-case")]
pub enum Inbound {
    /// Render surface notification; acknowledged when `id` is present.
    Notification {
        #[serde(default)]
        id: Option<u64>,
        message: SurfaceNotification,
    },
    /// Render surface request; always answered with a reply carrying `id`.
    Query { id: u64, query: SurfaceQuery },
    /// Tray menu click.
    Menu { id: String },
    /// Native window lifecycle.
    Window {
        event: WindowSignal,
        #[serde(default)]
        bounds: Option<Bounds>,
        #[serde(default, rename = "workArea")]
        work_area: Option<Bounds>,
    },
    /// Tray icon double-click.
    TrayDoubleClick,
}

/// Window lifecycle signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowSignal {
    /// The window exists; `bounds` and `workArea` describe it.
    Ready,
    Moved,
    CloseRequested,
    Closed,
}

/// Messages written to the UI host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "channel", rename_all = "kebab-case")]
pub enum Outbound {
    /// Command for the render surface.
    Command { command: SurfaceCommand },
    /// Acknowledgement of a notification.
    Ack { id: u64, ok: bool },
    /// Answer to a query.
    Reply { id: u64, response: QueryResponse },
    /// Operation on the native window.
    Window { op: WindowOp },
    /// Tray menu, tooltip or balloon update.
    Tray { update: TrayUpdate },
}

/// Native window operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WindowOp {
    Show,
    Hide,
    Focus,
    SetPosition { x: i32, y: i32 },
    SetAlwaysOnTop { on_top: bool },
    /// Answer to a close request.
    CloseResponse { veto: bool },
}

/// Parses one stdin line.
pub fn decode(line: &str) -> Result<Inbound, serde_json::Error> {
    serde_json::from_str(line)
}

/// Serializes one stdout line (without the trailing newline).
pub fn encode(message: &Outbound) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}
