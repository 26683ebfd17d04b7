use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use credential_backend::{
    config::Settings, router::create_router, secrets::EnvSecretProvider, AppState,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Credential server: signup, signin and token-guarded user endpoints
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the listen port from the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)?;
    if let Some(port) = args.port {
        settings.server.port = port;
        settings.validate()?;
    }

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let secrets = Arc::new(EnvSecretProvider);
    if std::env::var_os(&settings.auth.secret_name).is_none() {
        tracing::warn!(
            secret = %settings.auth.secret_name,
            "signing secret is not set; signup and signin will fail until it is"
        );
    }

    let state = Arc::new(
        AppState::from_settings(&settings, secrets).context("opening user store")?,
    );
    let app = create_router(state);

    let addr = settings.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, backend = ?settings.storage.backend, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
