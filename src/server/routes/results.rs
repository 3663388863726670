use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::results::{summarize, CSV_FILENAME};
use crate::domain::model::{ResultRow, ResultsSummary};
use crate::server::app::AppState;
use crate::server::error::RouteError;

#[derive(Serialize)]
pub struct ResultsResponse {
    summary: ResultsSummary,
    results: Vec<ResultRow>,
}

/// `GET /api/results` - session results, newest first, with totals.
pub async fn list_results_handler(State(state): State<AppState>) -> Json<ResultsResponse> {
    let results = state.results.snapshot().await;
    let summary = summarize(results.iter());
    Json(ResultsResponse { summary, results })
}

/// `GET /api/results/export` - session results as a CSV download.
pub async fn export_results_handler(State(state): State<AppState>) -> Result<Response, RouteError> {
    let csv = state.results.to_csv().await.map_err(RouteError::Export)?;

    tracing::info!("Exporting {} result(s) as CSV", state.results.len().await);

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILENAME),
            ),
        ],
        csv,
    )
        .into_response())
}
