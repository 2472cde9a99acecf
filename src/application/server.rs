use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::application::routes::app_router;
use crate::application::state::{AppState, AppStateConfig};
use crate::domain::stylize::BACKGROUND_ASSET;
use crate::infrastructure::style_refs;

pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub provider_url: String,
    pub replicate_api_token: String,
    pub model: String,
    pub assets_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub generated_dir: PathBuf,
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.uploads_dir)
        .await
        .with_context(|| format!("failed to create {}", config.uploads_dir.display()))?;
    tokio::fs::create_dir_all(&config.generated_dir)
        .await
        .with_context(|| format!("failed to create {}", config.generated_dir.display()))?;

    if config.replicate_api_token.is_empty() {
        warn!("no Replicate API token configured - provider calls will be rejected upstream");
    }

    // Missing assets only fail individual requests, but they are almost always
    // a deployment mistake, so surface them at startup.
    if style_refs::resolve(&config.assets_dir).is_empty() {
        warn!(
            assets_dir = %config.assets_dir.display(),
            "no reference style images found - stylize requests will fail"
        );
    }
    if !config.assets_dir.join(BACKGROUND_ASSET).exists() {
        warn!(
            assets_dir = %config.assets_dir.display(),
            background = BACKGROUND_ASSET,
            "background asset missing - compositing will fail"
        );
    }

    let state = AppState::new(AppStateConfig {
        provider_url: config.provider_url,
        provider_token: config.replicate_api_token,
        provider_model: config.model,
        assets_dir: config.assets_dir,
        uploads_dir: config.uploads_dir,
        generated_dir: config.generated_dir,
    });

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_address))?;

    let app = app_router(state);

    info!(address = %config.bind_address, "starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");

    Ok(())
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if signal handlers fail
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
