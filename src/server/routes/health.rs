use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::app::AppState;

pub const ROOT_BANNER: &str = "Brand Mention Checker API is running";

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    model: String,
}

/// `GET /` liveness banner
pub async fn root_handler() -> &'static str {
    ROOT_BANNER
}

/// Health check endpoint. Does not call the generator.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.service.model().to_string(),
    })
}
