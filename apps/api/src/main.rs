mod auth;
mod binder;
mod config;
mod errors;
mod export;
mod handoff;
mod models;
mod render;
mod routes;
mod state;
mod storage;
mod store;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::Sha256Hasher;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder v{}", env!("CARGO_PKG_VERSION"));

    let storage = FileStore::open(&config.data_dir)
        .with_context(|| format!("Cannot open data directory {}", config.data_dir.display()))?;

    info!("Using storage file {}", storage.path().display());

    let state = AppState::new(Arc::new(storage), Arc::new(Sha256Hasher));

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.host, config.port);
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
