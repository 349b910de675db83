//! HTTP API for Ice Breaker.
//!
//! ## Endpoints
//!
//! - `GET /` - Static front end
//! - `POST /process` - Summarize a person's LinkedIn profile (form field `name`)
//! - `POST /tweets` - List a person's recent Twitter/X posts (form field `name`)
//! - `GET /api/health` - Health check

mod routes;
pub mod types;

pub use routes::{ApiError, AppState};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::pipeline::IceBreaker;

/// Build the router over an already wired pipeline.
pub fn router(ice_breaker: Arc<IceBreaker>) -> Router {
    let state = AppState { ice_breaker };

    Router::new()
        .route("/", get(routes::index))
        .route("/process", post(routes::process))
        .route("/tweets", post(routes::tweets))
        .route("/api/health", get(routes::health))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let ice_breaker = Arc::new(IceBreaker::from_config(&config)?);
    let app = router(ice_breaker);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
