//! Catalog inspection and reload routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use remedy_runtime::CatalogSummary;
use tracing::error;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/catalog/reload", post(reload_catalog))
        .route("/symptoms", get(list_symptoms))
}

/// GET /api/catalog: counts, oracle availability and load time.
async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogSummary> {
    let available = state.pipeline.oracle().is_available();
    Json(state.catalog().summary(available))
}

/// POST /api/catalog/reload: rebuild from disk and swap in atomically.
async fn reload_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let worker = state.clone();
    let result = tokio::task::spawn_blocking(move || worker.reload_catalog()).await;

    match result {
        Ok(Ok(catalog)) => {
            let audit = catalog.audit();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "reloaded",
                    "catalog": catalog.summary(state.pipeline.oracle().is_available()),
                    "unresolved": audit.unresolved,
                })),
            )
        }
        Ok(Err(e)) => {
            error!("Catalog reload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// GET /api/symptoms: the full vocabulary, sorted.
async fn list_symptoms(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let catalog = state.catalog();
    Json(catalog.index().vocabulary().iter().cloned().collect())
}
