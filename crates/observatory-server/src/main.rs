//! Observatory API Server
//!
//! Serves the election-night Reddit comment dataset over HTTP.
//!
//! On startup the dataset loads in the background — snapshot if present,
//! otherwise a full archive ingest, otherwise sample data — while the API
//! answers immediately; `/reddit/loading-status` reports progress until the
//! table is published.
//!
//! ## Configuration
//! Via environment variables, see `config.rs`. Logging is controlled with
//! `RUST_LOG`:
//! ```bash
//! RUST_LOG=debug cargo run -p observatory-server
//! ```

use std::net::SocketAddr;

use observatory_server::{
    config::ServerConfig,
    create_router,
    dataset::{status_channel, DatasetHandle, LoadStatus, StatusProgress},
    loader, AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let addr: SocketAddr = config.addr.parse()?;

    let dataset = DatasetHandle::new();
    let (status_tx, status_rx) = status_channel();

    let state = AppState {
        dataset: dataset.clone(),
        status: status_rx,
    };
    let app = create_router(state, &config.allowed_origins);

    // Load in the background so the API is reachable while ingesting.
    {
        let dataset = dataset.clone();
        let load_config = config.clone();
        let progress_tx = status_tx.clone();
        tokio::spawn(async move {
            let loaded = tokio::task::spawn_blocking(move || {
                let observer = StatusProgress::new(progress_tx);
                loader::load_dataset(&load_config, Some(&observer))
            })
            .await;

            match loaded {
                Ok(table) => {
                    tracing::info!(rows = table.row_count(), "dataset ready");
                    status_tx.send_replace(LoadStatus::ready(table.row_count()));
                    dataset.set(table).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "dataset load task failed");
                    status_tx.send_replace(LoadStatus::failed(format!("load failed: {e}")));
                }
            }
        });
    }

    tracing::info!(%addr, "observatory server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
