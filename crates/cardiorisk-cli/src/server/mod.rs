//! HTTP surface: the input form, prediction endpoint and health check.
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use cardiorisk_classifiers::predictor::RiskPredictor;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub mod handlers;

/// Shared, read-only predictor handed to every request.
pub type AppState = Arc<RiskPredictor>;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

/// Bind `address` and serve until the process is stopped.
pub async fn serve(state: AppState, address: &str) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    log::info!(
        "[cardiorisk::serve] Listening on http://{}",
        listener.local_addr()?
    );
    axum::serve(listener, router(state))
        .await
        .context("HTTP server stopped")?;
    Ok(())
}
