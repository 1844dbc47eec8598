//! Prediction routes: form and JSON entry points share one response body.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Form, Json, Router};
use remedy_runtime::PredictionResponse;
use serde::Deserialize;
use tokio::task::JoinError;
use tracing::error;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/predict", post(predict_json))
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub symptoms: Option<String>,
}

/// POST /predict: web form with a single `symptoms` field.
pub async fn predict_form(
    State(state): State<Arc<AppState>>,
    Form(req): Form<PredictRequest>,
) -> Json<PredictionResponse> {
    Json(run_prediction(state, req.symptoms.unwrap_or_default()).await)
}

/// POST /api/predict: `{"symptoms": "..."}`.
async fn predict_json(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictRequest>,
) -> Json<PredictionResponse> {
    Json(run_prediction(state, req.symptoms.unwrap_or_default()).await)
}

/// Run the pipeline off the async executor. A fault inside it becomes a user-facing message.
async fn run_prediction(state: Arc<AppState>, raw: String) -> PredictionResponse {
    let catalog = state.catalog();
    let input = raw.clone();

    let result = tokio::task::spawn_blocking(move || state.pipeline.run(&catalog, &input)).await;

    match result {
        Ok(response) => response,
        Err(e) => {
            let detail = join_error_detail(e);
            error!("Prediction failed for {:?}: {}", raw, detail);
            PredictionResponse::internal_error(&raw, &detail)
        }
    }
}

fn join_error_detail(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "internal fault".to_string()
    }
}
