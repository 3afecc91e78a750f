//! Live2D desktop pet main process entry point.

mod app;
mod ipc;
mod settings;
mod window;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // stdout carries the IPC stream, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Live2D pet");

    let settings = settings::Settings::load();
    tracing::info!(
        environment = ?settings.environment,
        auto_update = settings.auto_update_enabled(),
        "settings loaded"
    );

    // All state lives on one thread; the runtime only multiplexes stdin,
    // stdout and Ctrl-C.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(app::run(settings))?;

    tracing::info!("shut down cleanly");
    Ok(())
}
