//! Tray menu projection.
//!
//! Every function here is a pure projection of [`AppState`] and the
//! [`ModelCatalog`]: same inputs, same tree. The controller rebuilds the whole
//! menu after each state change instead of patching items in place.

use live2d_pet_catalog::ModelCatalog;
use live2d_pet_protocol::AppState;
use live2d_pet_protocol::constants::{OPACITY_CHOICES, SCALE_CHOICES, SENSITIVITY_CHOICES};
use serde::Serialize;

use crate::intent::Intent;

/// How a menu item is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ItemKind {
    /// Plain clickable (or disabled informational) entry.
    Normal,
    /// Independent on/off toggle.
    Check { checked: bool },
    /// One of a mutually exclusive group.
    Radio { checked: bool },
    /// Nested menu.
    Submenu { items: Vec<MenuItem> },
    Separator,
}

/// A single menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    /// Presentation.
    #[serde(flatten)]
    pub kind: ItemKind,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Intent dispatched on click, serialized as its menu id.
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

impl MenuItem {
    /// Enabled entry that dispatches `intent`.
    pub fn action(label: impl Into<String>, intent: Intent) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Normal,
            enabled: true,
            intent: Some(intent),
        }
    }

    /// Checkbox entry.
    pub fn check(label: impl Into<String>, checked: bool, intent: Intent) -> Self {
        Self {
            kind: ItemKind::Check { checked },
            ..Self::action(label, intent)
        }
    }

    /// Radio entry.
    pub fn radio(label: impl Into<String>, checked: bool, intent: Intent) -> Self {
        Self {
            kind: ItemKind::Radio { checked },
            ..Self::action(label, intent)
        }
    }

    /// Disabled entry without an action.
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Normal,
            enabled: false,
            intent: None,
        }
    }

    pub fn submenu(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            kind: ItemKind::Submenu { items },
            enabled: true,
            intent: None,
        }
    }

    pub fn separator() -> Self {
        Self {
            label: String::new(),
            kind: ItemKind::Separator,
            enabled: false,
            intent: None,
        }
    }

    /// Returns a copy with `enabled` overridden.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// `Some(checked)` for check and radio items.
    pub fn checked(&self) -> Option<bool> {
        match self.kind {
            ItemKind::Check { checked } | ItemKind::Radio { checked } => Some(checked),
            _ => None,
        }
    }

    /// Children of a submenu, empty otherwise.
    pub fn children(&self) -> &[MenuItem] {
        match &self.kind {
            ItemKind::Submenu { items } => items,
            _ => &[],
        }
    }
}

/// Depth-first search for the item carrying `intent`.
pub fn find_item<'a>(items: &'a [MenuItem], intent: &Intent) -> Option<&'a MenuItem> {
    items.iter().find_map(|item| {
        if item.intent.as_ref() == Some(intent) {
            Some(item)
        } else {
            find_item(item.children(), intent)
        }
    })
}

/// One radio entry per catalog model, in catalog order.
pub fn build_model_menu(state: &AppState, catalog: &ModelCatalog) -> Vec<MenuItem> {
    catalog
        .models()
        .iter()
        .map(|model| {
            MenuItem::radio(
                &model.name,
                model.key == state.current_model_key,
                Intent::SelectModel(model.key.clone()),
            )
        })
        .collect()
}

/// Expressions of the current model, or a disabled placeholder.
pub fn build_expression_menu(state: &AppState, catalog: &ModelCatalog) -> Vec<MenuItem> {
    let Ok(model) = catalog.get_model(&state.current_model_key) else {
        return vec![MenuItem::placeholder("Model unavailable")];
    };
    if model.expressions.is_empty() {
        return vec![MenuItem::placeholder("No expressions")];
    }
    model
        .expressions
        .iter()
        .map(|exp| {
            MenuItem::radio(
                &exp.name,
                exp.file == state.selected_expression_file,
                Intent::SelectExpression(exp.file.clone()),
            )
        })
        .collect()
}

/// Motions of the current model, or a disabled placeholder.
pub fn build_motion_menu(state: &AppState, catalog: &ModelCatalog) -> Vec<MenuItem> {
    let Ok(model) = catalog.get_model(&state.current_model_key) else {
        return vec![MenuItem::placeholder("Model unavailable")];
    };
    if model.motions.is_empty() {
        return vec![MenuItem::placeholder("No motions")];
    }
    model
        .motions
        .iter()
        .map(|motion| {
            MenuItem::radio(
                &motion.name,
                motion.file == state.selected_motion_file,
                Intent::SelectMotion(motion.file.clone()),
            )
        })
        .collect()
}

/// Start/stop speaking plus the sensitivity radio group.
pub fn build_lip_sync_menu(state: &AppState) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::action("Start speaking", Intent::StartSpeaking).enabled(!state.is_speaking),
        MenuItem::action("Stop speaking", Intent::StopSpeaking).enabled(state.is_speaking),
        MenuItem::separator(),
    ];
    items.extend(SENSITIVITY_CHOICES.iter().map(|&value| {
        MenuItem::radio(
            format!("Sensitivity {value}"),
            state.lip_sync_sensitivity == value,
            Intent::SetSensitivity(value),
        )
    }));
    items
}

/// Scale percentages plus a refit action.
pub fn build_scale_menu(state: &AppState) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = SCALE_CHOICES
        .iter()
        .map(|&pct| {
            MenuItem::radio(
                format!("{pct}%"),
                state.model_scale_percent == pct,
                Intent::SetScale(pct),
            )
        })
        .collect();
    items.push(MenuItem::separator());
    items.push(MenuItem::action("Refit model", Intent::RefitModel));
    items
}

/// Opacity percentages.
pub fn build_opacity_menu(state: &AppState) -> Vec<MenuItem> {
    OPACITY_CHOICES
        .iter()
        .map(|&pct| {
            MenuItem::radio(
                format!("{pct}%"),
                state.opacity_percent == pct,
                Intent::SetOpacity(pct),
            )
        })
        .collect()
}

/// The complete tray menu.
pub fn build_root_menu(state: &AppState, catalog: &ModelCatalog) -> Vec<MenuItem> {
    vec![
        MenuItem::action("Show pet", Intent::ShowPet),
        MenuItem::action("Hide pet", Intent::HidePet),
        MenuItem::separator(),
        MenuItem::submenu("Model", build_model_menu(state, catalog)),
        MenuItem::submenu("Expression", build_expression_menu(state, catalog)),
        MenuItem::submenu("Motion", build_motion_menu(state, catalog)),
        MenuItem::submenu("Lip sync", build_lip_sync_menu(state)),
        MenuItem::submenu("Scale", build_scale_menu(state)),
        MenuItem::submenu("Opacity", build_opacity_menu(state)),
        MenuItem::separator(),
        MenuItem::check(
            "Always on top",
            state.is_always_on_top,
            Intent::ToggleAlwaysOnTop,
        ),
        MenuItem::check(
            "Lock position",
            state.is_position_locked,
            Intent::TogglePositionLock,
        ),
        MenuItem::separator(),
        MenuItem::action("Reset position", Intent::ResetPosition),
        MenuItem::action("About", Intent::About),
        MenuItem::separator(),
        MenuItem::action("Quit", Intent::Quit),
    ]
}
