//! Seams to the collaborators the controller drives but does not own.
//!
//! - [`RenderSurface`]: draws the character; receives [`SurfaceCommand`]s.
//! - [`WindowHost`]: the transparent always-on-top window; reports
//!   [`WindowEvent`]s.

use live2d_pet_protocol::{Bounds, SurfaceCommand};

/// Errors produced when pushing a command to the render surface.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("render surface unavailable, dropped {0}")]
    Closed(&'static str),
}

/// Outbound half of the notification channel.
///
/// Sends are fire-and-forget: no acknowledgement, no retry, no queueing
/// beyond what the transport does. The surface queries current state when it
/// (re)starts instead of relying on replay.
pub trait RenderSurface {
    fn send(&self, command: SurfaceCommand) -> Result<(), ChannelError>;
}

impl RenderSurface for tokio::sync::mpsc::UnboundedSender<SurfaceCommand> {
    fn send(&self, command: SurfaceCommand) -> Result<(), ChannelError> {
        let name = command.name();
        tokio::sync::mpsc::UnboundedSender::send(self, command)
            .map_err(|_| ChannelError::Closed(name))
    }
}

/// Window lifecycle events reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The user finished dragging the window.
    Moved,
    /// The window is about to close; the controller may veto.
    CloseRequested,
    /// The window is gone.
    Closed,
}

/// The native window hosting the render surface.
pub trait WindowHost {
    fn show(&mut self);
    fn hide(&mut self);
    fn focus(&mut self);
    fn is_visible(&self) -> bool;
    fn set_position(&mut self, x: i32, y: i32);
    fn set_always_on_top(&mut self, on_top: bool);
    /// Current outer bounds of the window.
    fn bounds(&self) -> Bounds;
    /// Usable area of the primary display (excluding task bars).
    fn work_area(&self) -> Bounds;
}
