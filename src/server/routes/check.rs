use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::domain::model::{CheckOutcome, CheckRequest, ResultRow};
use crate::server::app::AppState;
use crate::server::error::RouteError;

/// `POST /api/check-brand`
///
/// Unreadable bodies are treated like empty ones and answered with 400.
/// Generator failures come back as a 200 canned outcome flagged `error: true`.
pub async fn check_brand_handler(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckOutcome>, RouteError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Unreadable check-brand body: {}", rejection);
            CheckRequest::default()
        }
    };

    let (prompt, brand) = request.into_parts().ok_or(RouteError::MissingInput)?;

    match state.service.check(&prompt, &brand).await {
        Ok(outcome) => {
            state
                .results
                .record(ResultRow::new(prompt, brand, &outcome))
                .await;
            Ok(Json(outcome))
        }
        Err(e) => {
            let outcome = CheckOutcome::canned_internal_error();
            state
                .results
                .record(ResultRow::new(prompt, brand, &outcome))
                .await;
            Err(RouteError::Internal(e))
        }
    }
}
