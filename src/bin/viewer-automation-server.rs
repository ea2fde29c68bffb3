//! # Viewer Automation Server
//!
//! Serves the upload, submission, status and result endpoints over HTTP.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use viewer_automation::config::AutomationConfig;
use viewer_automation::logging::init_structured_logging;
use viewer_automation::services::ViewerAutomationService;
use viewer_automation::storage::blob_store_from_config;
use viewer_automation::transport::ReqwestTransport;
use viewer_automation::web::{create_app, AppState};

#[derive(Parser)]
#[command(name = "viewer-automation-server")]
#[command(about = "HTTP front for drawing upload, processing and result unpacking")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (default: ./viewer-automation.toml or ./config/viewer-automation.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the configured one
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let mut config =
        AutomationConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.web.bind_address = bind;
    }
    config.validate().context("invalid configuration")?;

    let transport = Arc::new(
        ReqwestTransport::new(&config.http).context("failed to build the HTTP transport")?,
    );
    let store =
        blob_store_from_config(&config.storage).context("failed to set up the blob store")?;

    let bind_address = config.web.bind_address.clone();
    let request_timeout = config.web.request_timeout();
    let service = ViewerAutomationService::new(Arc::new(config), transport, store);
    let app = create_app(AppState::new(Arc::new(service)), request_timeout);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!(bind_address = %bind_address, "Viewer automation server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Viewer automation server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
