//! Tray controller: the single owner of application state.
//!
//! Every input (menu click, render-surface notification, surface query,
//! window event) runs to completion on the caller's thread:
//!
//! 1. validate against the catalog and value ranges
//! 2. apply to [`AppState`] (and the window config mirror)
//! 3. notify the render surface (menu intents only)
//! 4. persist when a window-config field changed
//! 5. rebuild and install the whole tray menu
//!
//! Rejected inputs are logged and leave state, surface and disk untouched.

use std::sync::Arc;

use live2d_pet_catalog::{CatalogError, ModelCatalog};
use live2d_pet_config::{ConfigStore, default_position};
use live2d_pet_protocol::constants::{
    APP_DESCRIPTION, DEFAULT_OPACITY_PERCENT, DEFAULT_SCALE_PERCENT, DEFAULT_SENSITIVITY,
    SCALE_RANGE, fraction_to_percent, percent_to_fraction,
};
use live2d_pet_protocol::{
    AppState, ModelDescriptor, QueryResponse, SurfaceCommand, SurfaceNotification, SurfaceQuery,
    WindowConfig, WindowConfigPatch,
};
use tracing::{debug, info, warn};

use crate::intent::{Intent, IntentError};
use crate::menu::{MenuItem, build_root_menu};
use crate::surface::{RenderSurface, WindowEvent, WindowHost};
use crate::tray::{TrayEvent, TrayHandle};

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Startup values for the non-persisted parts of [`AppState`].
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Model to show first; the catalog's first model when `None` or unknown.
    pub initial_model: Option<String>,
    pub scale_percent: u16,
    pub opacity_percent: u8,
    pub lip_sync_sensitivity: u8,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            initial_model: None,
            scale_percent: DEFAULT_SCALE_PERCENT,
            opacity_percent: DEFAULT_OPACITY_PERCENT,
            lip_sync_sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

/// Owns [`AppState`], the live [`WindowConfig`] and the tray menu.
pub struct TrayController<W, S> {
    state: AppState,
    window_config: WindowConfig,
    catalog: Arc<ModelCatalog>,
    store: ConfigStore,
    window: Option<W>,
    surface: S,
    tray: TrayHandle,
    quitting: bool,
}

impl<W: WindowHost, S: RenderSurface> TrayController<W, S> {
    /// Loads the window config, builds the initial state and installs the
    /// first menu.
    pub fn new(
        catalog: Arc<ModelCatalog>,
        store: ConfigStore,
        surface: S,
        tray: TrayHandle,
        options: ControllerOptions,
    ) -> Self {
        let window_config = store.load();

        let model_key = match options.initial_model {
            Some(key) if catalog.contains(&key) => key,
            Some(key) => {
                warn!(model = %key, "configured model not in catalog, using default");
                catalog.default_key().to_string()
            }
            None => catalog.default_key().to_string(),
        };

        let mut state = AppState::new(model_key, &window_config);
        match check_scale(options.scale_percent) {
            Ok(()) => state.model_scale_percent = options.scale_percent,
            Err(e) => warn!(error = %e, "ignoring configured scale"),
        }
        match check_opacity(options.opacity_percent) {
            Ok(()) => state.opacity_percent = options.opacity_percent,
            Err(e) => warn!(error = %e, "ignoring configured opacity"),
        }
        match check_sensitivity(options.lip_sync_sensitivity) {
            Ok(()) => state.lip_sync_sensitivity = options.lip_sync_sensitivity,
            Err(e) => warn!(error = %e, "ignoring configured lip-sync sensitivity"),
        }

        let mut controller = Self {
            state,
            window_config,
            catalog,
            store,
            window: None,
            surface,
            tray,
            quitting: false,
        };
        controller.rebuild_menu();
        controller
    }

    /// Places the window at its stored (or default bottom-right) position,
    /// applies the always-on-top flag and shows it.
    ///
    /// The host creates the window with [`WindowConfig::effective_size`].
    pub fn attach_window(&mut self, mut window: W) {
        let (width, height) = self.window_config.effective_size();
        let (x, y) = if self.window_config.uses_default_position() {
            default_position(window.work_area(), width, height)
        } else {
            (self.window_config.x, self.window_config.y)
        };

        window.set_position(x, y);
        window.set_always_on_top(self.window_config.always_on_top);
        window.show();
        info!(x, y, width, height, "window attached");
        self.window = Some(window);
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Parses a menu id and handles the resulting intent.
    ///
    /// Unknown or malformed ids are logged and ignored.
    pub fn handle_menu_id(&mut self, id: &str) -> Flow {
        match id.parse::<Intent>() {
            Ok(intent) => self.handle_intent(intent),
            Err(e) => {
                warn!(id, error = %e, "ignoring menu click");
                Flow::Continue
            }
        }
    }

    /// Validates and applies one intent, then rebuilds the menu.
    pub fn handle_intent(&mut self, intent: Intent) -> Flow {
        if let Err(e) = self.validate(&intent) {
            warn!(%intent, error = %e, "intent rejected");
            return Flow::Continue;
        }

        debug!(%intent, "applying intent");
        let flow = self.apply(intent);
        if flow == Flow::Continue {
            self.rebuild_menu();
        }
        flow
    }

    fn validate(&self, intent: &Intent) -> Result<(), IntentError> {
        match intent {
            Intent::SelectModel(key) => {
                self.catalog.get_model(key)?;
            }
            Intent::SelectExpression(file) => self.check_expression(file)?,
            Intent::SelectMotion(file) => self.check_motion(file)?,
            Intent::SetSensitivity(value) => check_sensitivity(*value)?,
            Intent::SetScale(pct) => check_scale(*pct)?,
            Intent::SetOpacity(pct) => check_opacity(*pct)?,
            _ => {}
        }
        Ok(())
    }

    fn apply(&mut self, intent: Intent) -> Flow {
        match intent {
            Intent::SelectModel(key) => {
                self.state.switch_model(key.clone());
                self.notify(SurfaceCommand::ChangeModel(key));
            }
            Intent::SelectExpression(file) => {
                self.state.selected_expression_file = file.clone();
                self.notify(SurfaceCommand::PlayExpression(file));
            }
            Intent::SelectMotion(file) => {
                self.state.selected_motion_file = file.clone();
                self.notify(SurfaceCommand::PlayMotion(file));
            }
            Intent::StartSpeaking => {
                self.state.is_speaking = true;
                self.notify(SurfaceCommand::StartSpeaking);
            }
            Intent::StopSpeaking => {
                self.state.is_speaking = false;
                self.notify(SurfaceCommand::StopSpeaking);
            }
            Intent::SetSensitivity(value) => {
                self.state.lip_sync_sensitivity = value;
                self.notify(SurfaceCommand::SetLipSyncSensitivity(value));
            }
            Intent::SetScale(pct) => {
                self.state.model_scale_percent = pct;
                self.notify(SurfaceCommand::SetModelScale(percent_to_fraction(pct)));
            }
            Intent::SetOpacity(pct) => {
                self.state.opacity_percent = pct;
                self.notify(SurfaceCommand::SetOpacity(percent_to_fraction(pct.into())));
            }
            Intent::RefitModel => self.notify(SurfaceCommand::RefitModel),
            Intent::ToggleAlwaysOnTop => {
                self.toggle_always_on_top();
            }
            Intent::TogglePositionLock => {
                let locked = !self.state.is_position_locked;
                self.set_position_locked(locked);
                self.notify(SurfaceCommand::PositionLockChanged(locked));
            }
            Intent::ResetPosition => self.reset_position(),
            Intent::ShowPet => self.show_window(),
            Intent::HidePet => {
                if let Some(window) = self.window.as_mut() {
                    window.hide();
                }
            }
            Intent::About => self.tray.show_about(APP_DESCRIPTION),
            Intent::Quit => {
                self.shutdown();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    // -----------------------------------------------------------------------
    // Render surface -> controller
    // -----------------------------------------------------------------------

    /// Applies a notification from the render surface.
    ///
    /// Returns the acknowledgement sent back: `false` when rejected.
    pub fn handle_notification(&mut self, notification: SurfaceNotification) -> bool {
        let name = notification.name();
        match self.apply_notification(notification) {
            Ok(()) => {
                debug!(notification = name, "notification applied");
                self.rebuild_menu();
                true
            }
            Err(e) => {
                warn!(notification = name, error = %e, "notification rejected");
                false
            }
        }
    }

    fn apply_notification(&mut self, notification: SurfaceNotification) -> Result<(), IntentError> {
        match notification {
            SurfaceNotification::ModelLoaded(key) => {
                self.catalog.get_model(&key)?;
                if key != self.state.current_model_key {
                    self.state.switch_model(key);
                }
                self.state.is_model_loaded = true;
                info!(model = %self.state.current_model_key, "model loaded");
            }
            SurfaceNotification::SpeakingStateChanged(speaking) => {
                self.state.is_speaking = speaking;
            }
            SurfaceNotification::ExpressionPlayed(file) => {
                self.check_expression(&file)?;
                self.state.selected_expression_file = file;
            }
            SurfaceNotification::MotionPlayed(file) => {
                self.check_motion(&file)?;
                self.state.selected_motion_file = file;
            }
            SurfaceNotification::ModelScaleChanged(fraction) => {
                let pct = fraction_to_percent(fraction)
                    .ok_or_else(|| invalid_fraction("model-scale-changed", fraction))?;
                check_scale(pct)?;
                self.state.model_scale_percent = pct;
            }
            SurfaceNotification::OpacityChanged(fraction) => {
                let pct = fraction_to_percent(fraction)
                    .ok_or_else(|| invalid_fraction("opacity-changed", fraction))?;
                let pct = u8::try_from(pct).map_err(|_| IntentError::OutOfRange {
                    what: "opacity",
                    value: pct.into(),
                })?;
                check_opacity(pct)?;
                self.state.opacity_percent = pct;
            }
            SurfaceNotification::PositionLockChanged(locked) => {
                self.set_position_locked(locked);
            }
            SurfaceNotification::LipSyncSensitivityChanged(value) => {
                check_sensitivity(value)?;
                self.state.lip_sync_sensitivity = value;
            }
        }
        Ok(())
    }

    /// Answers a request/response call from the render surface.
    pub fn handle_query(&mut self, query: SurfaceQuery) -> QueryResponse {
        match query {
            SurfaceQuery::GetWindowConfig => QueryResponse::WindowConfig(self.window_config.clone()),
            SurfaceQuery::SaveWindowConfig(patch) => {
                QueryResponse::Saved(self.save_window_config(&patch))
            }
            SurfaceQuery::ToggleAlwaysOnTop => {
                let on_top = self.toggle_always_on_top();
                self.rebuild_menu();
                QueryResponse::AlwaysOnTop(on_top)
            }
            SurfaceQuery::GetAppState => QueryResponse::AppState(self.state.clone()),
            SurfaceQuery::GetModelConfigs => {
                QueryResponse::ModelConfigs(self.catalog.models().to_vec())
            }
        }
    }

    fn save_window_config(&mut self, patch: &WindowConfigPatch) -> bool {
        self.window_config.apply(patch);

        if let Some(window) = self.window.as_mut() {
            if let Some(on_top) = patch.always_on_top {
                window.set_always_on_top(on_top);
            }
            let moved = patch.x.is_some() || patch.y.is_some();
            if moved && !self.window_config.uses_default_position() {
                window.set_position(self.window_config.x, self.window_config.y);
            }
        }
        self.state.is_always_on_top = self.window_config.always_on_top;
        self.state.is_position_locked = self.window_config.is_locked;

        let saved = self.persist();
        self.rebuild_menu();
        saved
    }

    // -----------------------------------------------------------------------
    // Window host and tray backend events
    // -----------------------------------------------------------------------

    /// Reacts to a window lifecycle event.
    ///
    /// Returns true when the host must cancel the event's default action
    /// (a vetoed close).
    pub fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::Moved => {
                if self.state.is_position_locked {
                    debug!("position locked, move not persisted");
                } else {
                    self.sync_geometry();
                    self.persist();
                }
                false
            }
            WindowEvent::CloseRequested => {
                if self.quitting {
                    return false;
                }
                if let Some(window) = self.window.as_mut() {
                    window.hide();
                }
                self.tray.display_balloon(
                    self.tray.config().app_name.clone(),
                    "Minimized to the system tray",
                );
                true
            }
            WindowEvent::Closed => {
                info!("window closed");
                self.window = None;
                false
            }
        }
    }

    /// Dispatches one tray backend event.
    pub fn handle_tray_event(&mut self, event: TrayEvent) -> Flow {
        match event {
            TrayEvent::MenuClicked(id) => self.handle_menu_id(&id),
            TrayEvent::DoubleClicked => {
                self.toggle_visibility();
                Flow::Continue
            }
        }
    }

    /// Drains pending tray backend events.
    pub fn poll_tray_events(&mut self) -> Flow {
        while let Some(event) = self.tray.try_recv_event() {
            if self.handle_tray_event(event) == Flow::Quit {
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Persists final geometry and asks the tray to go away. Idempotent.
    pub fn shutdown(&mut self) {
        if self.quitting {
            return;
        }
        self.quitting = true;
        self.sync_geometry();
        self.persist();
        self.tray.shutdown();
        info!("controller shut down");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn window_config(&self) -> &WindowConfig {
        &self.window_config
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// The menu currently installed in the tray.
    pub fn menu(&self) -> &[MenuItem] {
        self.tray.menu()
    }

    pub fn window(&self) -> Option<&W> {
        self.window.as_ref()
    }

    /// Mutable access for hosts that mirror geometry reported by the window.
    pub fn window_mut(&mut self) -> Option<&mut W> {
        self.window.as_mut()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn current_model(&self) -> Result<&ModelDescriptor, CatalogError> {
        self.catalog.get_model(&self.state.current_model_key)
    }

    fn check_expression(&self, file: &str) -> Result<(), IntentError> {
        let model = self.current_model()?;
        match model.expression(file) {
            Some(_) => Ok(()),
            None => Err(IntentError::ExpressionNotFound {
                model: model.key.clone(),
                file: file.to_string(),
            }),
        }
    }

    fn check_motion(&self, file: &str) -> Result<(), IntentError> {
        let model = self.current_model()?;
        match model.motion(file) {
            Some(_) => Ok(()),
            None => Err(IntentError::MotionNotFound {
                model: model.key.clone(),
                file: file.to_string(),
            }),
        }
    }

    fn toggle_always_on_top(&mut self) -> bool {
        let on_top = !self.state.is_always_on_top;
        if let Some(window) = self.window.as_mut() {
            window.set_always_on_top(on_top);
        }
        self.state.is_always_on_top = on_top;
        self.window_config.always_on_top = on_top;
        self.persist();
        on_top
    }

    fn set_position_locked(&mut self, locked: bool) {
        self.state.is_position_locked = locked;
        self.window_config.is_locked = locked;
        self.persist();
    }

    fn reset_position(&mut self) {
        let Some(window) = self.window.as_mut() else {
            warn!("no window to reset");
            return;
        };
        let (width, height) = self.window_config.effective_size();
        let (x, y) = default_position(window.work_area(), width, height);
        window.set_position(x, y);
        info!(x, y, "window position reset");
        self.sync_geometry();
        self.persist();
    }

    fn show_window(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.show();
            window.focus();
        }
    }

    fn toggle_visibility(&mut self) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        if window.is_visible() {
            window.hide();
        } else {
            window.show();
            window.focus();
        }
    }

    /// Copies live window bounds into the config mirror.
    fn sync_geometry(&mut self) {
        if let Some(window) = &self.window {
            self.window_config.set_bounds(window.bounds());
        }
    }

    fn persist(&self) -> bool {
        self.store.save(&self.window_config).is_ok()
    }

    fn notify(&self, command: SurfaceCommand) {
        debug!(command = command.name(), "sending to render surface");
        if let Err(e) = self.surface.send(command) {
            warn!(error = %e, "render surface command dropped");
        }
    }

    fn rebuild_menu(&mut self) {
        let items = build_root_menu(&self.state, &self.catalog);
        self.tray.install_menu(items);

        let app_name = &self.tray.config().app_name;
        let tooltip = match self.current_model() {
            Ok(model) => format!("{app_name} - {}", model.name),
            Err(_) => app_name.clone(),
        };
        self.tray.set_tooltip(tooltip);
    }
}

fn check_scale(pct: u16) -> Result<(), IntentError> {
    if SCALE_RANGE.contains(&pct) {
        Ok(())
    } else {
        Err(IntentError::OutOfRange {
            what: "model scale",
            value: pct.into(),
        })
    }
}

fn check_opacity(pct: u8) -> Result<(), IntentError> {
    if pct <= 100 {
        Ok(())
    } else {
        Err(IntentError::OutOfRange {
            what: "opacity",
            value: pct.into(),
        })
    }
}

fn check_sensitivity(value: u8) -> Result<(), IntentError> {
    if (1..=100).contains(&value) {
        Ok(())
    } else {
        Err(IntentError::OutOfRange {
            what: "lip-sync sensitivity",
            value: value.into(),
        })
    }
}

fn invalid_fraction(kind: &str, fraction: f64) -> IntentError {
    IntentError::InvalidArgument {
        kind: kind.to_string(),
        value: fraction.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::find_item;
    use crate::tray::{TrayConfig, TrayUpdate};
    use live2d_pet_protocol::Bounds;
    use std::sync::mpsc;
    use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

    /// In-memory window that records its geometry and flags.
    #[derive(Debug, Default)]
    struct FakeWindow {
        visible: bool,
        focused: bool,
        on_top: bool,
        x: i32,
        y: i32,
    }

    impl WindowHost for FakeWindow {
        fn show(&mut self) {
            self.visible = true;
        }
        fn hide(&mut self) {
            self.visible = false;
        }
        fn focus(&mut self) {
            self.focused = true;
        }
        fn is_visible(&self) -> bool {
            self.visible
        }
        fn set_position(&mut self, x: i32, y: i32) {
            self.x = x;
            self.y = y;
        }
        fn set_always_on_top(&mut self, on_top: bool) {
            self.on_top = on_top;
        }
        fn bounds(&self) -> Bounds {
            Bounds {
                x: self.x,
                y: self.y,
                width: 300,
                height: 400,
            }
        }
        fn work_area(&self) -> Bounds {
            Bounds {
                x: 0,
                y: 0,
                width: 1920,
                height: 1040,
            }
        }
    }

    struct Fixture {
        controller: TrayController<FakeWindow, UnboundedSender<SurfaceCommand>>,
        commands: UnboundedReceiver<SurfaceCommand>,
        updates: mpsc::Receiver<TrayUpdate>,
        events: mpsc::Sender<TrayEvent>,
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn config_path(&self) -> std::path::PathBuf {
            self.dir.path().join("live2d-pet-config.json")
        }

        fn drain_commands(&mut self) -> Vec<SurfaceCommand> {
            let mut out = Vec::new();
            while let Ok(cmd) = self.commands.try_recv() {
                out.push(cmd);
            }
            out
        }

        fn drain_updates(&self) -> Vec<TrayUpdate> {
            self.updates.try_iter().collect()
        }

        fn saved_config(&self) -> WindowConfig {
            ConfigStore::new(self.config_path()).load()
        }
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("live2d-pet-config.json"));
        let catalog = Arc::new(ModelCatalog::builtin().unwrap());
        let (surface, commands) = unbounded_channel();
        let (tray, events, updates) = TrayHandle::new(TrayConfig::default());

        let mut controller =
            TrayController::new(catalog, store, surface, tray, ControllerOptions::default());
        controller.attach_window(FakeWindow::default());

        Fixture {
            controller,
            commands,
            updates,
            events,
            dir,
        }
    }

    #[test]
    fn startup_state() {
        let f = fixture();
        let state = f.controller.state();
        assert_eq!(state.current_model_key, "idol");
        assert_eq!(state.model_scale_percent, 100);
        assert!(state.is_always_on_top);
        assert!(!f.controller.menu().is_empty());
        assert!(!f.config_path().exists());
    }

    #[test]
    fn attach_window_uses_default_position() {
        let f = fixture();
        let window = f.controller.window().unwrap();
        assert_eq!((window.x, window.y), (1570, 590));
        assert!(window.visible);
        assert!(window.on_top);
    }

    #[test]
    fn attach_window_uses_stored_position() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("c.json"));
        store
            .save(&WindowConfig {
                x: 10,
                y: 20,
                always_on_top: false,
                ..WindowConfig::default()
            })
            .unwrap();
        let (surface, _commands) = unbounded_channel();
        let (tray, _events, _updates) = TrayHandle::new(TrayConfig::default());
        let mut controller: TrayController<FakeWindow, _> = TrayController::new(
            Arc::new(ModelCatalog::builtin().unwrap()),
            store,
            surface,
            tray,
            ControllerOptions::default(),
        );
        controller.attach_window(FakeWindow::default());

        let window = controller.window().unwrap();
        assert_eq!((window.x, window.y), (10, 20));
        assert!(!window.on_top);
        assert!(!controller.state().is_always_on_top);
    }

    #[test]
    fn always_on_top_toggled_before_attach_applies_on_attach() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        let (surface, _commands) = unbounded_channel();
        let (tray, _events, _updates) = TrayHandle::new(TrayConfig::default());
        let mut controller: TrayController<FakeWindow, _> = TrayController::new(
            Arc::new(ModelCatalog::builtin().unwrap()),
            ConfigStore::new(&path),
            surface,
            tray,
            ControllerOptions::default(),
        );

        assert_eq!(
            controller.handle_query(SurfaceQuery::ToggleAlwaysOnTop),
            QueryResponse::AlwaysOnTop(false)
        );
        assert!(!ConfigStore::new(&path).load().always_on_top);
        assert_eq!(
            controller.handle_query(SurfaceQuery::ToggleAlwaysOnTop),
            QueryResponse::AlwaysOnTop(true)
        );

        controller.attach_window(FakeWindow::default());
        assert!(controller.window().unwrap().on_top);
    }

    #[test]
    fn invalid_options_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let (surface, _commands) = unbounded_channel();
        let (tray, _events, _updates) = TrayHandle::new(TrayConfig::default());
        let controller: TrayController<FakeWindow, _> = TrayController::new(
            Arc::new(ModelCatalog::builtin().unwrap()),
            ConfigStore::new(dir.path().join("c.json")),
            surface,
            tray,
            ControllerOptions {
                initial_model: Some("ghost".into()),
                scale_percent: 10,
                opacity_percent: 200,
                lip_sync_sensitivity: 0,
            },
        );
        let state = controller.state();
        assert_eq!(state.current_model_key, "idol");
        assert_eq!(state.model_scale_percent, 100);
        assert_eq!(state.opacity_percent, 100);
        assert_eq!(state.lip_sync_sensitivity, 50);
    }

    #[test]
    fn select_motion_sends_play_motion() {
        let mut f = fixture();
        f.controller
            .handle_intent(Intent::SelectMotion("greeting.motion3.json".into()));
        assert_eq!(f.controller.state().selected_motion_file, "greeting.motion3.json");
        assert_eq!(
            f.drain_commands(),
            vec![SurfaceCommand::PlayMotion("greeting.motion3.json".into())]
        );
    }

    #[test]
    fn motion_of_other_model_rejected() {
        let mut f = fixture();
        f.controller
            .handle_intent(Intent::SelectMotion("mtn_01.motion3.json".into()));
        assert!(f.controller.state().selected_motion_file.is_empty());
        assert!(f.drain_commands().is_empty());
    }

    #[test]
    fn speaking_toggles_menu_entries() {
        let mut f = fixture();
        f.controller.handle_intent(Intent::StartSpeaking);
        assert!(f.controller.state().is_speaking);
        let menu = f.controller.menu();
        assert!(!find_item(menu, &Intent::StartSpeaking).unwrap().enabled);
        assert!(find_item(menu, &Intent::StopSpeaking).unwrap().enabled);

        f.controller.handle_intent(Intent::StopSpeaking);
        assert!(!f.controller.state().is_speaking);
        assert_eq!(
            f.drain_commands(),
            vec![SurfaceCommand::StartSpeaking, SurfaceCommand::StopSpeaking]
        );
    }

    #[test]
    fn scale_sends_fraction() {
        let mut f = fixture();
        f.controller.handle_intent(Intent::SetScale(150));
        assert_eq!(f.controller.state().model_scale_percent, 150);
        assert_eq!(f.drain_commands(), vec![SurfaceCommand::SetModelScale(1.5)]);
    }

    #[test]
    fn out_of_range_values_rejected() {
        let mut f = fixture();
        f.controller.handle_intent(Intent::SetScale(10));
        f.controller.handle_intent(Intent::SetOpacity(101));
        f.controller.handle_intent(Intent::SetSensitivity(0));
        let state = f.controller.state();
        assert_eq!(state.model_scale_percent, 100);
        assert_eq!(state.opacity_percent, 100);
        assert_eq!(state.lip_sync_sensitivity, 50);
        assert!(f.drain_commands().is_empty());
    }

    #[test]
    fn toggle_always_on_top_persists() {
        let mut f = fixture();
        f.controller.handle_intent(Intent::ToggleAlwaysOnTop);

        assert!(!f.controller.state().is_always_on_top);
        assert!(!f.controller.window().unwrap().on_top);
        assert!(!f.saved_config().always_on_top);
        let item = find_item(f.controller.menu(), &Intent::ToggleAlwaysOnTop).unwrap();
        assert_eq!(item.checked(), Some(false));
    }

    #[test]
    fn toggle_position_lock_persists_and_notifies() {
        let mut f = fixture();
        f.controller.handle_intent(Intent::TogglePositionLock);

        assert!(f.controller.state().is_position_locked);
        assert!(f.saved_config().is_locked);
        assert_eq!(
            f.drain_commands(),
            vec![SurfaceCommand::PositionLockChanged(true)]
        );
    }

    #[test]
    fn moved_persists_unless_locked() {
        let mut f = fixture();
        f.controller.handle_window_event(WindowEvent::Moved);
        let saved = f.saved_config();
        assert_eq!((saved.x, saved.y), (1570, 590));

        f.controller.handle_intent(Intent::TogglePositionLock);
        let before = std::fs::read(f.config_path()).unwrap();
        f.controller.handle_window_event(WindowEvent::Moved);
        assert_eq!(std::fs::read(f.config_path()).unwrap(), before);
    }

    #[test]
    fn reset_position_moves_and_saves() {
        let mut f = fixture();
        f.controller.handle_query(SurfaceQuery::SaveWindowConfig(WindowConfigPatch {
            x: Some(5),
            y: Some(5),
            ..WindowConfigPatch::default()
        }));
        assert_eq!(f.controller.window().unwrap().x, 5);

        f.controller.handle_intent(Intent::ResetPosition);
        let window = f.controller.window().unwrap();
        assert_eq!((window.x, window.y), (1570, 590));
        assert_eq!(f.saved_config().x, 1570);
    }

    #[test]
    fn close_is_vetoed_until_quitting() {
        let mut f = fixture();
        f.drain_updates();

        assert!(f.controller.handle_window_event(WindowEvent::CloseRequested));
        assert!(!f.controller.window().unwrap().visible);
        assert!(
            f.drain_updates()
                .iter()
                .any(|u| matches!(u, TrayUpdate::Balloon { .. }))
        );

        assert_eq!(f.controller.handle_intent(Intent::Quit), Flow::Quit);
        assert!(!f.controller.handle_window_event(WindowEvent::CloseRequested));
    }

    #[test]
    fn quit_saves_and_shuts_tray_down() {
        let mut f = fixture();
        f.drain_updates();

        assert_eq!(f.controller.handle_menu_id("quit"), Flow::Quit);
        assert!(f.controller.is_quitting());
        assert_eq!(f.saved_config().x, 1570);
        assert_eq!(f.drain_updates(), vec![TrayUpdate::Shutdown]);

        // Second shutdown is a no-op.
        f.controller.shutdown();
        assert!(f.drain_updates().is_empty());
    }

    #[test]
    fn closed_window_is_forgotten() {
        let mut f = fixture();
        f.controller.handle_window_event(WindowEvent::Closed);
        assert!(f.controller.window().is_none());

        // Window operations become no-ops.
        f.controller.handle_intent(Intent::ShowPet);
        f.controller.handle_intent(Intent::ResetPosition);
        assert!(!f.config_path().exists());
    }

    #[test]
    fn show_hide_and_double_click() {
        let mut f = fixture();
        f.controller.handle_intent(Intent::HidePet);
        assert!(!f.controller.window().unwrap().visible);

        f.events.send(TrayEvent::DoubleClicked).unwrap();
        assert_eq!(f.controller.poll_tray_events(), Flow::Continue);
        let window = f.controller.window().unwrap();
        assert!(window.visible);
        assert!(window.focused);

        f.events.send(TrayEvent::DoubleClicked).unwrap();
        f.controller.poll_tray_events();
        assert!(!f.controller.window().unwrap().visible);
    }

    #[test]
    fn poll_dispatches_menu_clicks() {
        let mut f = fixture();
        f.events
            .send(TrayEvent::MenuClicked("set-opacity:50".into()))
            .unwrap();
        f.events.send(TrayEvent::MenuClicked("quit".into())).unwrap();
        f.events
            .send(TrayEvent::MenuClicked("set-opacity:75".into()))
            .unwrap();

        assert_eq!(f.controller.poll_tray_events(), Flow::Quit);
        assert_eq!(f.controller.state().opacity_percent, 50);
    }

    #[test]
    fn about_goes_to_tray() {
        let mut f = fixture();
        f.drain_updates();
        f.controller.handle_intent(Intent::About);
        assert!(
            f.drain_updates()
                .iter()
                .any(|u| matches!(u, TrayUpdate::About(info) if info.name == "Live2D Desktop Pet"))
        );
    }

    #[test]
    fn tooltip_names_current_model() {
        let mut f = fixture();
        f.drain_updates();
        f.controller.handle_intent(Intent::SelectModel("natori".into()));
        assert!(
            f.drain_updates()
                .contains(&TrayUpdate::Tooltip("Live2D Desktop Pet - Natori".into()))
        );
    }

    #[test]
    fn notifications_update_state_without_commands() {
        let mut f = fixture();
        assert!(f.controller.handle_notification(SurfaceNotification::ModelLoaded("idol".into())));
        assert!(f.controller.state().is_model_loaded);
        assert!(f.controller.handle_notification(SurfaceNotification::SpeakingStateChanged(true)));
        assert!(f.controller.handle_notification(SurfaceNotification::MotionPlayed(
            "dance.motion3.json".into()
        )));
        assert!(f.controller.handle_notification(SurfaceNotification::ModelScaleChanged(0.75)));
        assert!(f.controller.handle_notification(SurfaceNotification::OpacityChanged(0.5)));
        assert!(
            f.controller
                .handle_notification(SurfaceNotification::LipSyncSensitivityChanged(80))
        );

        let state = f.controller.state();
        assert!(state.is_speaking);
        assert_eq!(state.selected_motion_file, "dance.motion3.json");
        assert_eq!(state.model_scale_percent, 75);
        assert_eq!(state.opacity_percent, 50);
        assert_eq!(state.lip_sync_sensitivity, 80);
        assert!(f.drain_commands().is_empty());
    }

    #[test]
    fn model_loaded_for_other_model_switches() {
        let mut f = fixture();
        f.controller
            .handle_intent(Intent::SelectExpression("2.exp3.json".into()));
        assert!(f.controller.handle_notification(SurfaceNotification::ModelLoaded("natori".into())));

        let state = f.controller.state();
        assert_eq!(state.current_model_key, "natori");
        assert!(state.is_model_loaded);
        assert!(state.selected_expression_file.is_empty());
    }

    #[test]
    fn invalid_notifications_rejected() {
        let mut f = fixture();
        let before = f.controller.state().clone();

        assert!(!f.controller.handle_notification(SurfaceNotification::ModelLoaded("ghost".into())));
        assert!(!f.controller.handle_notification(SurfaceNotification::ExpressionPlayed(
            "Smile.exp3.json".into()
        )));
        assert!(!f.controller.handle_notification(SurfaceNotification::OpacityChanged(3.0)));
        assert!(!f.controller.handle_notification(SurfaceNotification::ModelScaleChanged(f64::NAN)));
        assert!(
            !f.controller
                .handle_notification(SurfaceNotification::LipSyncSensitivityChanged(101))
        );
        assert_eq!(f.controller.state(), &before);
    }

    #[test]
    fn position_lock_notification_persists() {
        let mut f = fixture();
        assert!(f.controller.handle_notification(SurfaceNotification::PositionLockChanged(true)));
        assert!(f.saved_config().is_locked);
        assert!(f.drain_commands().is_empty());
    }

    #[test]
    fn queries() {
        let mut f = fixture();
        assert_eq!(
            f.controller.handle_query(SurfaceQuery::GetWindowConfig),
            QueryResponse::WindowConfig(WindowConfig::default())
        );
        assert_eq!(
            f.controller.handle_query(SurfaceQuery::ToggleAlwaysOnTop),
            QueryResponse::AlwaysOnTop(false)
        );
        match f.controller.handle_query(SurfaceQuery::GetAppState) {
            QueryResponse::AppState(state) => assert!(!state.is_always_on_top),
            other => panic!("unexpected response: {other:?}"),
        }
        match f.controller.handle_query(SurfaceQuery::GetModelConfigs) {
            QueryResponse::ModelConfigs(models) => assert_eq!(models[0].key, "idol"),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn save_window_config_merges_and_mirrors_flags() {
        let mut f = fixture();
        let response = f.controller.handle_query(SurfaceQuery::SaveWindowConfig(WindowConfigPatch {
            is_locked: Some(true),
            always_on_top: Some(false),
            ..WindowConfigPatch::default()
        }));

        assert_eq!(response, QueryResponse::Saved(true));
        assert!(f.controller.state().is_position_locked);
        assert!(!f.controller.state().is_always_on_top);
        assert!(!f.controller.window().unwrap().on_top);
        let saved = f.saved_config();
        assert!(saved.is_locked);
        assert_eq!((saved.x, saved.y), (-1, -1));
    }

    #[test]
    fn save_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let (surface, _commands) = unbounded_channel();
        let (tray, _events, _updates) = TrayHandle::new(TrayConfig::default());
        let mut controller: TrayController<FakeWindow, _> = TrayController::new(
            Arc::new(ModelCatalog::builtin().unwrap()),
            ConfigStore::new(blocker.join("c.json")),
            surface,
            tray,
            ControllerOptions::default(),
        );

        controller.handle_intent(Intent::TogglePositionLock);
        assert!(controller.state().is_position_locked);
        assert!(controller.window_config().is_locked);
        assert_eq!(
            controller.handle_query(SurfaceQuery::SaveWindowConfig(WindowConfigPatch::default())),
            QueryResponse::Saved(false)
        );
    }

    #[test]
    fn dropped_surface_does_not_block_state_changes() {
        let mut f = fixture();
        f.commands.close();

        f.controller.handle_intent(Intent::SetOpacity(75));
        assert_eq!(f.controller.state().opacity_percent, 75);
    }
}
