use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::model::{CheckOutcome, MISSING_INPUT_MESSAGE};
use crate::utils::error::CheckError;

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Failures a route hands back to the client.
#[derive(Debug)]
pub enum RouteError {
    /// Prompt or brand missing; nothing was sent upstream.
    MissingInput,
    /// Failure inside this process after validation.
    Internal(CheckError),
    Export(CheckError),
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        match self {
            RouteError::MissingInput => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: MISSING_INPUT_MESSAGE.to_string(),
                }),
            )
                .into_response(),
            RouteError::Internal(e) => {
                tracing::error!(
                    error = %e,
                    category = ?e.category(),
                    debug = ?e,
                    "Internal error while checking brand"
                );
                internal_error_response()
            }
            RouteError::Export(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: e.user_friendly_message(),
                }),
            )
                .into_response(),
        }
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(CheckOutcome::canned_internal_error()),
    )
        .into_response()
}

/// Answers a panicking handler with the canned internal-error body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Request handler panicked");
    internal_error_response()
}
