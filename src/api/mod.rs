//! HTTP surface of the service.
//!
//! A single route, `POST /feed/read`, runs the feed pipeline for the URL in
//! the request body and answers with the legacy text rendering.

use axum::{routing::post, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{Config, Error, Result};

pub mod error_response;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Create the API router.
///
/// # Routes
///
/// - `POST /feed/read` - Read a feed given `{"url": "..."}`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/feed/read", post(routes::read_feed))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves the API until Ctrl+C.
pub async fn start_api_server(config: Arc<Config>) -> Result<()> {
    let bind_address = config.bind_address;
    let state = AppState::new(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(bind_address).await?;
    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
