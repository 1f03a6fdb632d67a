//! Observatory REST API Server
//!
//! HTTP/JSON API over the ingested comment dataset: paginated comment
//! queries with filtering and score-descending sort, the distinct-subreddit
//! list, and a loading-status endpoint that reports ingestion progress while
//! the dataset is still being built in the background.

use axum::{http::HeaderValue, routing::get, Router};
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod dataset;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod sample;

pub use config::ServerConfig;
pub use dataset::{DatasetHandle, LoadStatus};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The currently loaded dataset; empty until the background load
    /// finishes.
    pub dataset: DatasetHandle,
    /// Latest load status, fed by the ingestion progress observer.
    pub status: watch::Receiver<LoadStatus>,
}

/// Create the API router with all endpoints.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/reddit/comments", get(handlers::get_comments))
        .route("/reddit/subreddits", get(handlers::get_subreddits))
        .route("/reddit/loading-status", get(handlers::loading_status))
        .layer(cors)
        .with_state(state)
}
