use serde::{Deserialize, Serialize};

use crate::types::{AppState, ModelDescriptor, WindowConfig, WindowConfigPatch};

// ---------------------------------------------------------------------------
// Main process -> render surface
// ---------------------------------------------------------------------------

/// Commands pushed to the render surface. Fire-and-forget.
///
/// Scale and opacity travel as fractions (`percent / 100`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum SurfaceCommand {
    ChangeModel(String),
    PlayExpression(String),
    PlayMotion(String),
    StartSpeaking,
    StopSpeaking,
    SetLipSyncSensitivity(u8),
    SetModelScale(f64),
    SetOpacity(f64),
    RefitModel,
    PositionLockChanged(bool),
}

impl SurfaceCommand {
    /// Wire name of the command, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChangeModel(_) => "change-model",
            Self::PlayExpression(_) => "play-expression",
            Self::PlayMotion(_) => "play-motion",
            Self::StartSpeaking => "start-speaking",
            Self::StopSpeaking => "stop-speaking",
            Self::SetLipSyncSensitivity(_) => "set-lip-sync-sensitivity",
            Self::SetModelScale(_) => "set-model-scale",
            Self::SetOpacity(_) => "set-opacity",
            Self::RefitModel => "refit-model",
            Self::PositionLockChanged(_) => "position-lock-changed",
        }
    }
}

// ---------------------------------------------------------------------------
// Render surface -> main process
// ---------------------------------------------------------------------------

/// Completion and state notifications from the render surface.
///
/// Each one is acknowledged with a boolean: `true` when the main process
/// accepted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum SurfaceNotification {
    ModelLoaded(String),
    SpeakingStateChanged(bool),
    ExpressionPlayed(String),
    MotionPlayed(String),
    ModelScaleChanged(f64),
    OpacityChanged(f64),
    PositionLockChanged(bool),
    LipSyncSensitivityChanged(u8),
}

impl SurfaceNotification {
    /// Wire name of the notification, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModelLoaded(_) => "model-loaded",
            Self::SpeakingStateChanged(_) => "speaking-state-changed",
            Self::ExpressionPlayed(_) => "expression-played",
            Self::MotionPlayed(_) => "motion-played",
            Self::ModelScaleChanged(_) => "model-scale-changed",
            Self::OpacityChanged(_) => "opacity-changed",
            Self::PositionLockChanged(_) => "position-lock-changed",
            Self::LipSyncSensitivityChanged(_) => "lip-sync-sensitivity-changed",
        }
    }
}

/// Request/response calls issued by the render surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum SurfaceQuery {
    GetWindowConfig,
    SaveWindowConfig(WindowConfigPatch),
    ToggleAlwaysOnTop,
    GetAppState,
    GetModelConfigs,
}

/// Answer to a [`SurfaceQuery`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum QueryResponse {
    WindowConfig(WindowConfig),
    /// Result of `save-window-config`.
    Saved(bool),
    /// New always-on-top flag after `toggle-always-on-top`.
    AlwaysOnTop(bool),
    AppState(AppState),
    ModelConfigs(Vec<ModelDescriptor>),
}
