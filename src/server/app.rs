//! Application setup and router configuration.

use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::probe::ModelProbe;
use crate::core::results::ResultsLog;
use crate::core::service::BrandCheckService;
use crate::domain::ports::TextGenerator;
use crate::server::error::panic_response;
use crate::server::routes::{
    check_brand_handler, export_results_handler, health_handler, list_results_handler,
    root_handler, test_key_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BrandCheckService>,
    pub probe: Arc<ModelProbe>,
    pub results: Arc<ResultsLog>,
    pub api_key_preview: String,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        probe: ModelProbe,
        max_results: usize,
        api_key_preview: String,
    ) -> Self {
        Self {
            service: Arc::new(BrandCheckService::new(generator)),
            probe: Arc::new(probe),
            results: Arc::new(ResultsLog::new(max_results)),
            api_key_preview,
        }
    }
}

/// Build the Axum application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - allow any origin, the web client is served separately
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/check-brand", post(check_brand_handler))
        .route("/api/test-gemini-key", get(test_key_handler))
        .route("/api/results", get(list_results_handler))
        .route("/api/results/export", get(export_results_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
