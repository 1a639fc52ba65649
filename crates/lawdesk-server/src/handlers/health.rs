use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use lawdesk_core::api_types::HealthResponse;

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check requested");

    let response = HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        upstream_endpoint: state.config.upstream_endpoint.clone(),
        model: state.config.model_name.clone(),
        response_mode: state.config.response_mode,
    };

    (StatusCode::OK, Json(response))
}
