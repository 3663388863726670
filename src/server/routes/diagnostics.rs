use axum::{extract::State, Json};

use crate::domain::model::KeyReport;
use crate::server::app::AppState;

/// `GET /api/test-gemini-key`
///
/// Probes every configured model in order and reports which ones answer.
/// Sends one request per model, so it is slow and spends quota.
pub async fn test_key_handler(State(state): State<AppState>) -> Json<KeyReport> {
    tracing::info!(
        models = state.probe.models().len(),
        "Running API key diagnostic"
    );

    let report = state.probe.key_report(state.api_key_preview.clone()).await;

    tracing::info!(
        final_status = ?report.final_status,
        working_model = ?report.working_model,
        "API key diagnostic finished"
    );
    Json(report)
}
