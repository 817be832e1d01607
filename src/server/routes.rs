use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::kpi::{self, Category};
use crate::server::AppState;
use crate::view::{NavEvent, ViewState};

#[derive(Deserialize)]
pub struct CatalogParams {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct NavigateRequest {
    /// Current view; defaults to Home so a frontend can start from nothing.
    #[serde(default)]
    pub state: ViewState,
    pub event: NavEvent,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "engine": state.engine.status(),
    }))
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    // Offline engine degrades to 503; the frontend falls back to its
    // simulated mode.
    let store = state.engine.store().map_err(|e| {
        (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorResponse { error: e.to_string() }))
    })?;

    let stats = store.stats().map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() }))
    })?;

    Ok(Json(serde_json::json!({ "store": stats })))
}

pub async fn get_catalog(
    Query(params): Query<CatalogParams>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let entries = match params.category {
        Some(raw) => {
            let category = Category::from_str(&raw).map_err(|e| {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e.to_string() }))
            })?;
            kpi::catalog()
                .into_iter()
                .filter(|entry| entry.category == category)
                .collect()
        }
        None => kpi::catalog(),
    };

    Ok(Json(serde_json::json!({ "catalog": entries })))
}

pub async fn post_navigate(Json(request): Json<NavigateRequest>) -> Json<serde_json::Value> {
    let next = request.state.apply(request.event);
    Json(serde_json::json!({ "state": next }))
}
