use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use job_board_api::api::{self, AppState};
use job_board_api::cli::Cli;
use job_board_api::config::{self, StoreBackend};
use job_board_api::database::DatabaseManager;
use job_board_api::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let cli = Cli::parse();
    let config = cli.apply(config::config().clone());
    tracing::info!("Starting Job Board API in {:?} mode", config.environment);
    if job_board_api::is_development!() {
        tracing::debug!("Configuration: {:?}", config);
    }

    let mut database = None;
    let store: Arc<dyn Store> = match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let manager = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            let store = PgStore::new(manager.pool());
            if config.database.bootstrap_schema {
                store.bootstrap().await.context("failed to create schema")?;
            }
            database = Some(manager);
            Arc::new(store)
        }
    };

    let app = api::router(AppState::new(store, &config), &config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Job Board API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(manager) = database {
        manager.close().await;
    }
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
