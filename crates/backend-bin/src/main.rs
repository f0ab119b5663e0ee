//! Betting-ledger HTTP server.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{
    auth::session::CLEANUP_INTERVAL, config::Settings, create_router, logging,
    storage::SqliteStorage, AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "betledger")]
#[command(version, about = "Betting ledger server")]
struct Args {
    /// Configuration file (toml, yaml or json). Defaults to config.* in the working directory.
    #[arg(long, env = "BETLEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the configuration.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// sqlx database URL, overrides the configuration.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load configuration")?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    if let Some(url) = args.database_url {
        settings.database_url = url;
    }

    logging::init_tracing(&settings.log_level, settings.log_json);

    let storage = SqliteStorage::connect(&settings.database_url)
        .await
        .with_context(|| format!("failed to open database {}", settings.database_url))?;
    info!(database = %settings.database_url, "database ready");

    let addr = settings.bind_addr;
    let (state, sessions) = AppState::from_settings(settings, Arc::new(storage))?;
    let cleanup = sessions.spawn_cleanup_task(CLEANUP_INTERVAL);

    let app = create_router(Arc::new(state));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}
