//! Shared types for the Live2D pet main process and render surface.
//!
//! Everything that crosses the notification channel lives here:
//! - [`SurfaceCommand`]: main process to render surface (fire-and-forget)
//! - [`SurfaceNotification`]: render surface to main process (acknowledged)
//! - [`SurfaceQuery`] / [`QueryResponse`]: request/response calls
//!
//! plus the persisted [`WindowConfig`] record and the [`AppState`] snapshot.

pub mod constants;
pub mod messages;
pub mod types;

pub use messages::{QueryResponse, SurfaceCommand, SurfaceNotification, SurfaceQuery};
pub use types::{
    AppState, Bounds, ExpressionDescriptor, ModelDescriptor, MotionDescriptor, SoundDescriptor,
    WindowConfig, WindowConfigPatch,
};
