use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::engine::DataEngine;

pub mod routes;

/// Server state
pub struct AppState {
    pub engine: &'static DataEngine,
}

pub async fn start_server(port: u16, engine: &'static DataEngine) -> anyhow::Result<()> {
    let state = Arc::new(AppState { engine });

    let app = Router::new()
        .route("/health", get(routes::get_health))
        .route("/stats", get(routes::get_stats))
        .route("/catalog", get(routes::get_catalog))
        .route("/navigate", post(routes::post_navigate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting dashboard API on {}", addr);
    println!("🌍 Dashboard API running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
