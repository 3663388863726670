#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use brandcheck::domain::ports::{GeneratorFactory, TextGenerator};
use brandcheck::utils::error::{CheckError, Result};
use brandcheck::{build_router, AppState, ModelProbe};
use std::sync::Arc;

/// Always answers with the same text.
pub struct StaticGenerator {
    pub text: String,
}

impl StaticGenerator {
    pub fn new(text: &str) -> Arc<dyn TextGenerator> {
        Arc::new(Self {
            text: text.to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    fn model(&self) -> &str {
        "static-model"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Fails every call the way an unreachable or overloaded API would.
pub struct UnavailableGenerator;

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    fn model(&self) -> &str {
        "unavailable-model"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(CheckError::UpstreamStatusError {
            status: 503,
            message: "The service is currently unavailable.".to_string(),
        })
    }
}

pub struct PanickingGenerator;

#[async_trait]
impl TextGenerator for PanickingGenerator {
    fn model(&self) -> &str {
        "panicking-model"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        panic!("generator bug");
    }
}

/// Models listed in `working` answer "test"; all others return 404.
pub struct StubFactory {
    pub working: Vec<String>,
}

struct StubModel {
    model: String,
    works: bool,
}

#[async_trait]
impl TextGenerator for StubModel {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        if self.works {
            Ok("test".to_string())
        } else {
            Err(CheckError::UpstreamStatusError {
                status: 404,
                message: format!("models/{} is not found", self.model),
            })
        }
    }
}

impl GeneratorFactory for StubFactory {
    fn for_model(&self, model: &str) -> Result<Arc<dyn TextGenerator>> {
        Ok(Arc::new(StubModel {
            model: model.to_string(),
            works: self.working.iter().any(|m| m == model),
        }))
    }
}

pub fn state_with(generator: Arc<dyn TextGenerator>) -> AppState {
    let probe = ModelProbe::new(
        Arc::new(StubFactory {
            working: vec!["gemini-1.5-flash".to_string()],
        }),
        vec!["gemini-2.0-flash".to_string(), "gemini-1.5-flash".to_string()],
    );
    AppState::new(generator, probe, 100, "AIzaSyTEST...".to_string())
}

pub fn app_with(generator: Arc<dyn TextGenerator>) -> (Router, AppState) {
    let state = state_with(generator);
    (build_router(state.clone()), state)
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
