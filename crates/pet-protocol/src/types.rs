use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_OPACITY_PERCENT, DEFAULT_SCALE_PERCENT, DEFAULT_SENSITIVITY, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH, POSITION_UNSET,
};

// ---------------------------------------------------------------------------
// Window geometry
// ---------------------------------------------------------------------------

/// A rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Persisted window geometry and flags.
///
/// `x == -1 && y == -1` means "use the default bottom-right position".
/// Fields missing from the file take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfig {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub always_on_top: bool,
    pub is_locked: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            x: POSITION_UNSET,
            y: POSITION_UNSET,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            always_on_top: true,
            is_locked: false,
        }
    }
}

impl WindowConfig {
    /// Returns true when either coordinate carries the unset sentinel.
    pub fn uses_default_position(&self) -> bool {
        self.x == POSITION_UNSET || self.y == POSITION_UNSET
    }

    /// Width and height with non-positive values replaced by the defaults.
    pub fn effective_size(&self) -> (i32, i32) {
        let width = if self.width > 0 {
            self.width
        } else {
            DEFAULT_WINDOW_WIDTH
        };
        let height = if self.height > 0 {
            self.height
        } else {
            DEFAULT_WINDOW_HEIGHT
        };
        (width, height)
    }

    /// Copies position and size from live window bounds.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    /// Merges every field present in `patch`.
    pub fn apply(&mut self, patch: &WindowConfigPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(on_top) = patch.always_on_top {
            self.always_on_top = on_top;
        }
        if let Some(locked) = patch.is_locked {
            self.is_locked = locked;
        }
    }
}

/// Partial update sent by the render surface with `save-window-config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always_on_top: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The single source of truth the tray menu is projected from.
///
/// `selected_motion_file` / `selected_expression_file` are empty when nothing
/// is selected, otherwise they name a file of the current model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub current_model_key: String,
    pub is_model_loaded: bool,
    pub model_scale_percent: u16,
    pub opacity_percent: u8,
    pub is_always_on_top: bool,
    pub is_position_locked: bool,
    pub is_speaking: bool,
    pub lip_sync_sensitivity: u8,
    pub selected_motion_file: String,
    pub selected_expression_file: String,
}

impl AppState {
    /// Creates the startup state for `model_key` with window flags taken from
    /// the persisted config.
    pub fn new(model_key: impl Into<String>, window: &WindowConfig) -> Self {
        Self {
            current_model_key: model_key.into(),
            is_model_loaded: false,
            model_scale_percent: DEFAULT_SCALE_PERCENT,
            opacity_percent: DEFAULT_OPACITY_PERCENT,
            is_always_on_top: window.always_on_top,
            is_position_locked: window.is_locked,
            is_speaking: false,
            lip_sync_sensitivity: DEFAULT_SENSITIVITY,
            selected_motion_file: String::new(),
            selected_expression_file: String::new(),
        }
    }

    /// Switches to another model, clearing selections that belonged to the
    /// previous one.
    pub fn switch_model(&mut self, model_key: impl Into<String>) {
        self.current_model_key = model_key.into();
        self.is_model_loaded = false;
        self.selected_motion_file.clear();
        self.selected_expression_file.clear();
    }
}

// ---------------------------------------------------------------------------
// Model descriptors
// ---------------------------------------------------------------------------

/// A motion a model can play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionDescriptor {
    pub name: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// An expression a model can show. `index` is stable within the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionDescriptor {
    pub name: String,
    pub file: String,
    pub index: u32,
}

/// A sound clip bundled with a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundDescriptor {
    pub name: String,
    pub file: String,
}

/// Static description of one character and its assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub key: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub motions: Vec<MotionDescriptor>,
    #[serde(default)]
    pub expressions: Vec<ExpressionDescriptor>,
    #[serde(default)]
    pub sounds: Vec<SoundDescriptor>,
}

impl ModelDescriptor {
    /// Looks up a motion by its file reference.
    pub fn motion(&self, file: &str) -> Option<&MotionDescriptor> {
        self.motions.iter().find(|m| m.file == file)
    }

    /// Looks up an expression by its file reference.
    pub fn expression(&self, file: &str) -> Option<&ExpressionDescriptor> {
        self.expressions.iter().find(|e| e.file == file)
    }
}
