//! HTTP API
//!
//! JSON surface consumed by the charting and graph-rendering front end.
//! One write endpoint (entry logging) runs the enrichment pipeline; the
//! rest are read-only aggregates safe to call concurrently with writers.

pub mod handlers;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use studymap_core::{Pipeline, Storage};

use state::AppState;

/// Build the axum router with all API routes
pub fn build_router(storage: Arc<Storage>, pipeline: Arc<Pipeline>, port: u16) -> Router {
    let state = AppState::new(storage, pipeline);

    let origins = vec![
        format!("http://127.0.0.1:{}", port)
            .parse::<axum::http::HeaderValue>()
            .expect("valid origin"),
        format!("http://localhost:{}", port)
            .parse::<axum::http::HeaderValue>()
            .expect("valid origin"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        // Entry logging + reads
        .route(
            "/api/entries",
            post(handlers::create_entry).get(handlers::list_entries),
        )
        .route("/api/entries/{id}", get(handlers::get_entry))
        // Blindspots
        .route("/api/blindspots", get(handlers::list_blindspots))
        // Graph & charts
        .route("/api/graph", get(handlers::get_graph))
        .route("/api/analytics", get(handlers::get_analytics))
        // Stats & health
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/health", get(handlers::health_check))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Bind and serve the API until the process is stopped
pub async fn serve(storage: Arc<Storage>, pipeline: Arc<Pipeline>, port: u16) -> anyhow::Result<()> {
    let router = build_router(storage, pipeline, port);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Study Map API listening on http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
