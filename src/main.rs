//! Badminton scoreboard binary entrypoint wiring REST, WebSocket, SSE and blob storage.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::{AppConfig, StorageKind};
use dao::blob_store::{
    BlobStore,
    file::{FileBlobStore, FileStoreConfig},
    memory::MemoryBlobStore,
};
use services::{persistence, sse_events, storage_supervisor};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = open_store(&config).await?;

    let scoreboard = persistence::restore(store.as_ref(), &config).await;
    let (persistence_handle, persistence_rx) = persistence::PersistenceHandle::channel();
    let app_state = AppState::new(config, scoreboard, persistence_handle);

    tokio::spawn(persistence::run_writer(
        app_state.clone(),
        store.clone(),
        persistence_rx,
    ));
    tokio::spawn(storage_supervisor::run(app_state.clone(), store));
    tokio::spawn(sse_events::run_status_notifier(app_state.clone()));

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Open the configured blob store.
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    match config.storage {
        StorageKind::File => {
            let store = FileBlobStore::connect(FileStoreConfig::new(config.data_dir.clone()))
                .await
                .with_context(|| {
                    format!("opening data directory {}", config.data_dir.display())
                })?;
            info!(data_dir = %config.data_dir.display(), "using file blob store");
            Ok(Arc::new(store))
        }
        StorageKind::Memory => {
            info!("using in-memory blob store; nothing survives a restart");
            Ok(Arc::new(MemoryBlobStore::new()))
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
