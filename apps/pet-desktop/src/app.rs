//! Application orchestrator: wires the tray controller to the UI host.

use std::sync::{Arc, mpsc};

use live2d_pet_catalog::ModelCatalog;
use live2d_pet_config::ConfigStore;
use live2d_pet_protocol::constants::APP_NAME;
use live2d_pet_protocol::{Bounds, SurfaceCommand};
use live2d_pet_tray::{
    Flow, TrayConfig, TrayController, TrayEvent, TrayHandle, TrayUpdate, WindowEvent,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::ipc::{self, Inbound, Outbound, WindowOp, WindowSignal};
use crate::settings::Settings;
use crate::window::IpcWindow;

/// Work area assumed when the UI host does not report one.
const FALLBACK_WORK_AREA: Bounds = Bounds {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

type Controller = TrayController<IpcWindow, UnboundedSender<SurfaceCommand>>;

/// Runs the main process until stdin closes, Ctrl-C, or Quit.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let catalog = Arc::new(load_catalog(&settings)?);
    tracing::info!(models = catalog.models().len(), "model catalog ready");

    let (out_tx, out_rx) = unbounded_channel();
    let writer = tokio::spawn(write_outbound(out_rx));

    let mut bridge = Bridge::new(catalog, ConfigStore::at_default_location(), &settings, out_tx);
    bridge.flush();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let flow = bridge.handle_line(&line);
                    bridge.flush();
                    if flow == Flow::Quit {
                        tracing::info!("quit requested via tray");
                        break;
                    }
                }
                Ok(None) => {
                    tracing::info!("input closed, shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to read input");
                    break;
                }
            },
            _ = &mut ctrl_c => {
                tracing::info!("SIGINT received, shutting down");
                break;
            }
        }
    }

    bridge.shutdown();
    drop(bridge);

    // The writer ends once every sender (bridge and window) is gone.
    if let Err(e) = writer.await {
        tracing::error!("output writer failed: {e}");
    }
    Ok(())
}

/// Loads the configured catalog, falling back to the built-in one.
fn load_catalog(settings: &Settings) -> anyhow::Result<ModelCatalog> {
    if let Some(path) = &settings.catalog_path {
        match ModelCatalog::load(path) {
            Ok(catalog) => return Ok(catalog),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load model catalog, using built-in models"
            ),
        }
    }
    Ok(ModelCatalog::builtin()?)
}

/// Writes outbound messages to stdout, one JSON document per line.
async fn write_outbound(mut rx: UnboundedReceiver<Outbound>) {
    let mut stdout = tokio::io::stdout();
    while let Some(message) = rx.recv().await {
        let mut line = match ipc::encode(&message) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode output message");
                continue;
            }
        };
        line.push('\n');
        if let Err(e) = stdout.write_all(line.as_bytes()).await {
            tracing::error!(error = %e, "stdout closed");
            break;
        }
        if let Err(e) = stdout.flush().await {
            tracing::error!(error = %e, "stdout closed");
            break;
        }
    }
}

/// Routes inbound messages to the controller and collects its output.
struct Bridge {
    controller: Controller,
    tray_events: mpsc::Sender<TrayEvent>,
    tray_updates: mpsc::Receiver<TrayUpdate>,
    commands: UnboundedReceiver<SurfaceCommand>,
    out: UnboundedSender<Outbound>,
}

impl Bridge {
    fn new(
        catalog: Arc<ModelCatalog>,
        store: ConfigStore,
        settings: &Settings,
        out: UnboundedSender<Outbound>,
    ) -> Self {
        let (surface, commands) = unbounded_channel();
        let tray_config = TrayConfig {
            app_name: APP_NAME.into(),
            version: env!("CARGO_PKG_VERSION").into(),
            icon_data: None,
        };
        let (tray, tray_events, tray_updates) = TrayHandle::new(tray_config);
        let controller = TrayController::new(
            catalog,
            store,
            surface,
            tray,
            settings.controller_options(),
        );

        Self {
            controller,
            tray_events,
            tray_updates,
            commands,
            out,
        }
    }

    /// Handles one raw input line. Malformed lines are logged and skipped.
    fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }
        match ipc::decode(line) {
            Ok(message) => self.handle(message),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed input line");
                Flow::Continue
            }
        }
    }

    fn handle(&mut self, message: Inbound) -> Flow {
        match message {
            Inbound::Notification { id, message } => {
                let ok = self.controller.handle_notification(message);
                if let Some(id) = id {
                    self.emit(Outbound::Ack { id, ok });
                }
                Flow::Continue
            }
            Inbound::Query { id, query } => {
                let response = self.controller.handle_query(query);
                self.emit(Outbound::Reply { id, response });
                Flow::Continue
            }
            Inbound::Menu { id } => self.tray_event(TrayEvent::MenuClicked(id)),
            Inbound::TrayDoubleClick => self.tray_event(TrayEvent::DoubleClicked),
            Inbound::Window {
                event,
                bounds,
                work_area,
            } => {
                self.window_signal(event, bounds, work_area);
                Flow::Continue
            }
        }
    }

    /// Feeds a tray event through the tray handle's channel.
    fn tray_event(&mut self, event: TrayEvent) -> Flow {
        if self.tray_events.send(event).is_err() {
            tracing::warn!("tray event channel closed");
            return Flow::Continue;
        }
        self.controller.poll_tray_events()
    }

    fn window_signal(
        &mut self,
        signal: WindowSignal,
        bounds: Option<Bounds>,
        work_area: Option<Bounds>,
    ) {
        if let Some(window) = self.controller.window_mut() {
            window.update_geometry(bounds, work_area);
        }

        match signal {
            WindowSignal::Ready => {
                if self.controller.window().is_some() {
                    tracing::debug!("window already attached, geometry refreshed");
                    return;
                }
                let (width, height) = self.controller.window_config().effective_size();
                let bounds = bounds.unwrap_or(Bounds {
                    x: 0,
                    y: 0,
                    width,
                    height,
                });
                let work_area = work_area.unwrap_or_else(|| {
                    tracing::warn!("window reported no work area, assuming 1920x1080");
                    FALLBACK_WORK_AREA
                });
                let window = IpcWindow::new(self.out.clone(), bounds, work_area);
                self.controller.attach_window(window);
            }
            WindowSignal::Moved => {
                self.controller.handle_window_event(WindowEvent::Moved);
            }
            WindowSignal::CloseRequested => {
                let veto = self.controller.handle_window_event(WindowEvent::CloseRequested);
                self.emit(Outbound::Window {
                    op: WindowOp::CloseResponse { veto },
                });
            }
            WindowSignal::Closed => {
                self.controller.handle_window_event(WindowEvent::Closed);
            }
        }
    }

    /// Forwards queued surface commands and tray updates to the output.
    fn flush(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.emit(Outbound::Command { command });
        }
        while let Ok(update) = self.tray_updates.try_recv() {
            self.emit(Outbound::Tray { update });
        }
    }

    /// Persists state and flushes the final tray update.
    fn shutdown(&mut self) {
        self.controller.shutdown();
        self.flush();
    }

    fn emit(&self, message: Outbound) {
        if self.out.send(message).is_err() {
            tracing::debug!("output closed, message dropped");
        }
    }
}
