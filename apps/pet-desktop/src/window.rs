//! Window host backed by the UI process.

use live2d_pet_protocol::Bounds;
use live2d_pet_tray::WindowHost;
use tokio::sync::mpsc::UnboundedSender;

use crate::ipc::{Outbound, WindowOp};

/// Mirrors the native window's geometry and forwards operations over IPC.
///
/// The UI host reports geometry with `window` messages; operations issued
/// here update the mirror immediately so reads stay consistent in between.
#[derive(Debug)]
pub struct IpcWindow {
    out: UnboundedSender<Outbound>,
    bounds: Bounds,
    work_area: Bounds,
    visible: bool,
}

impl IpcWindow {
    pub fn new(out: UnboundedSender<Outbound>, bounds: Bounds, work_area: Bounds) -> Self {
        Self {
            out,
            bounds,
            work_area,
            visible: false,
        }
    }

    /// Records geometry reported by the UI host.
    pub fn update_geometry(&mut self, bounds: Option<Bounds>, work_area: Option<Bounds>) {
        if let Some(bounds) = bounds {
            self.bounds = bounds;
        }
        if let Some(work_area) = work_area {
            self.work_area = work_area;
        }
    }

    fn emit(&self, op: WindowOp) {
        if self.out.send(Outbound::Window { op }).is_err() {
            tracing::warn!("output closed, window operation dropped");
        }
    }
}

impl WindowHost for IpcWindow {
    fn show(&mut self) {
        self.visible = true;
        self.emit(WindowOp::Show);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.emit(WindowOp::Hide);
    }

    fn focus(&mut self) {
        self.emit(WindowOp::Focus);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.bounds.x = x;
        self.bounds.y = y;
        self.emit(WindowOp::SetPosition { x, y });
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        self.emit(WindowOp::SetAlwaysOnTop { on_top });
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn work_area(&self) -> Bounds {
        self.work_area
    }
}
