//! Validated requests to change application state.
//!
//! Every actionable tray menu item carries an [`Intent`]. Native menu
//! backends only hand back string ids, so intents round-trip through a
//! stable id format: `kind` or `kind:argument` (e.g. `set-opacity:20`,
//! `select-model:idol`).

use std::fmt;
use std::str::FromStr;

use live2d_pet_catalog::CatalogError;
use serde::{Deserialize, Serialize};

/// A user- or surface-originated request to change application state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Intent {
    SelectModel(String),
    SelectExpression(String),
    SelectMotion(String),
    StartSpeaking,
    StopSpeaking,
    SetSensitivity(u8),
    SetScale(u16),
    SetOpacity(u8),
    RefitModel,
    ToggleAlwaysOnTop,
    TogglePositionLock,
    ResetPosition,
    ShowPet,
    HidePet,
    About,
    Quit,
}

/// Reasons an intent or menu id is refused.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("unknown intent kind: {0}")]
    UnknownKind(String),

    #[error("invalid argument for {kind}: {value:?}")]
    InvalidArgument { kind: String, value: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("model {model} has no expression {file}")]
    ExpressionNotFound { model: String, file: String },

    #[error("model {model} has no motion {file}")]
    MotionNotFound { model: String, file: String },

    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: i64 },
}

impl Intent {
    /// The id kind, i.e. the part before the `:`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SelectModel(_) => "select-model",
            Self::SelectExpression(_) => "select-expression",
            Self::SelectMotion(_) => "select-motion",
            Self::StartSpeaking => "start-speaking",
            Self::StopSpeaking => "stop-speaking",
            Self::SetSensitivity(_) => "set-sensitivity",
            Self::SetScale(_) => "set-scale",
            Self::SetOpacity(_) => "set-opacity",
            Self::RefitModel => "refit-model",
            Self::ToggleAlwaysOnTop => "toggle-always-on-top",
            Self::TogglePositionLock => "toggle-position-lock",
            Self::ResetPosition => "reset-position",
            Self::ShowPet => "show-pet",
            Self::HidePet => "hide-pet",
            Self::About => "about",
            Self::Quit => "quit",
        }
    }

    /// Stable menu id for this intent.
    pub fn menu_id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            Self::SelectModel(arg) | Self::SelectExpression(arg) | Self::SelectMotion(arg) => {
                write!(f, "{kind}:{arg}")
            }
            Self::SetSensitivity(v) | Self::SetOpacity(v) => write!(f, "{kind}:{v}"),
            Self::SetScale(v) => write!(f, "{kind}:{v}"),
            _ => f.write_str(kind),
        }
    }
}

impl FromStr for Intent {
    type Err = IntentError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        let (kind, arg) = match id.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (id, None),
        };

        let invalid = || IntentError::InvalidArgument {
            kind: kind.to_string(),
            value: arg.unwrap_or_default().to_string(),
        };
        let text = || match arg {
            Some(a) if !a.is_empty() => Ok(a.to_string()),
            _ => Err(invalid()),
        };
        let unit = |intent: Intent| match arg {
            None => Ok(intent),
            Some(_) => Err(invalid()),
        };

        match kind {
            "select-model" => Ok(Self::SelectModel(text()?)),
            "select-expression" => Ok(Self::SelectExpression(text()?)),
            "select-motion" => Ok(Self::SelectMotion(text()?)),
            "set-sensitivity" => text()?
                .parse()
                .map(Self::SetSensitivity)
                .map_err(|_| invalid()),
            "set-scale" => text()?.parse().map(Self::SetScale).map_err(|_| invalid()),
            "set-opacity" => text()?.parse().map(Self::SetOpacity).map_err(|_| invalid()),
            "start-speaking" => unit(Self::StartSpeaking),
            "stop-speaking" => unit(Self::StopSpeaking),
            "refit-model" => unit(Self::RefitModel),
            "toggle-always-on-top" => unit(Self::ToggleAlwaysOnTop),
            "toggle-position-lock" => unit(Self::TogglePositionLock),
            "reset-position" => unit(Self::ResetPosition),
            "show-pet" => unit(Self::ShowPet),
            "hide-pet" => unit(Self::HidePet),
            "about" => unit(Self::About),
            "quit" => unit(Self::Quit),
            other => Err(IntentError::UnknownKind(other.to_string())),
        }
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.to_string()
    }
}

impl TryFrom<String> for Intent {
    type Error = IntentError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        id.parse()
    }
}
