use anyhow::Context;
use axum::Server;
use clap::Parser;
use config::{Config, ValidationMode};
use std::net::SocketAddr;

mod api;
mod config;
mod errors;
mod logging;
mod models;
mod services;
mod state;

/// Result type for API
pub type Result<T> = std::result::Result<T, errors::ApiError>;

/// Authenticates requests carrying an AWS federated identity token
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Port to listen on, overrides PORT
    #[arg(long)]
    port: Option<u16>,

    /// Validation mode (gcp or aws), overrides VALIDATION_MODE
    #[arg(long)]
    mode: Option<ValidationMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(mode) = args.mode {
        config.validation_mode = mode;
    }

    // Held until shutdown so the audit file gets flushed
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        "Validating tokens in {} mode, audience {}",
        config.validation_mode,
        config.audience
    );

    let state = state::AppState::new(config).context("Failed to build HTTP client")?;
    let app = api::initialize_router(state)?;
    tracing::info!("Server starting on {}", addr);

    Server::try_bind(&addr)
        .with_context(|| format!("Failed to bind {addr}"))?
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("Server error")?;

    Ok(())
}
