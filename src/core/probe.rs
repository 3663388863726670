use crate::domain::model::{KeyReport, ModelTestResult, ProbeStatus};
use crate::domain::ports::{GeneratorFactory, TextGenerator};
use crate::utils::error::{CheckError, Result};
use std::sync::Arc;

pub const PROBE_PROMPT: &str = "Say \"test\" in one word";

const QUOTA_EXCEEDED: &str = "Quota exceeded (429)";
const MODEL_NOT_FOUND: &str = "Model not found (404)";
const INVALID_API_KEY: &str = "Invalid API key (401)";
const PERMISSION_DENIED: &str = "Permission denied (403)";

/// Tries an explicit, ordered list of models against the generator API.
pub struct ModelProbe {
    factory: Arc<dyn GeneratorFactory>,
    models: Vec<String>,
}

impl ModelProbe {
    pub fn new(factory: Arc<dyn GeneratorFactory>, models: Vec<String>) -> Self {
        Self { factory, models }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Returns the first model that answers the probe prompt.
    pub async fn first_working(&self) -> Result<Arc<dyn TextGenerator>> {
        for model in &self.models {
            tracing::info!("🔄 Trying model: {}", model);
            let generator = self.factory.for_model(model)?;
            match generator.generate(PROBE_PROMPT).await {
                Ok(_) => {
                    tracing::info!("✅ Connected using model: {}", model);
                    return Ok(generator);
                }
                Err(e) => tracing::warn!("Model {} failed: {}", model, e),
            }
        }

        Err(CheckError::NoWorkingModelError {
            tried: self.models.clone(),
        })
    }

    /// Probes every model, in order, and records each outcome.
    pub async fn probe_all(&self) -> Vec<ModelTestResult> {
        let mut results = Vec::with_capacity(self.models.len());

        for model in &self.models {
            let outcome = match self.factory.for_model(model) {
                Ok(generator) => generator.generate(PROBE_PROMPT).await,
                Err(e) => Err(e),
            };

            let result = match outcome {
                Ok(text) => ModelTestResult {
                    model: model.clone(),
                    status: ProbeStatus::Success,
                    error_type: None,
                    response: Some(text.trim().to_string()),
                },
                Err(e) => {
                    tracing::debug!("Probe of {} failed: {}", model, e);
                    ModelTestResult {
                        model: model.clone(),
                        status: ProbeStatus::Failed,
                        error_type: Some(classify_error(&e)),
                        response: None,
                    }
                }
            };
            results.push(result);
        }

        results
    }

    /// Full diagnostic report for the configured key.
    pub async fn key_report(&self, api_key_preview: String) -> KeyReport {
        let models_test = self.probe_all().await;
        build_key_report(api_key_preview, models_test)
    }
}

pub fn classify_error(error: &CheckError) -> String {
    if error.is_timeout() {
        return "Timeout".to_string();
    }

    match (error, error.upstream_status()) {
        (_, Some(404)) => MODEL_NOT_FOUND.to_string(),
        (_, Some(429)) => QUOTA_EXCEEDED.to_string(),
        (_, Some(403)) => PERMISSION_DENIED.to_string(),
        (_, Some(401)) => INVALID_API_KEY.to_string(),
        (_, Some(400)) => "Bad request (400)".to_string(),
        (_, Some(status)) => format!("HTTP {}", status),
        (CheckError::ApiError(_), None) => "Network error".to_string(),
        (CheckError::MalformedResponseError { .. }, None) => "Invalid response".to_string(),
        (_, None) => "Unknown".to_string(),
    }
}

pub fn build_key_report(api_key_preview: String, models_test: Vec<ModelTestResult>) -> KeyReport {
    let working_model = models_test
        .iter()
        .find(|result| result.is_success())
        .map(|result| result.model.clone());

    let (final_status, recommendation) = match &working_model {
        Some(model) => (
            ProbeStatus::Success,
            format!("Your API key is working. Use model: {}", model),
        ),
        None => (ProbeStatus::Failed, failure_recommendation(&models_test)),
    };

    KeyReport {
        api_key_status: "configured".to_string(),
        api_key_preview,
        models_test,
        final_status,
        recommendation,
        working_model,
    }
}

fn failure_recommendation(models_test: &[ModelTestResult]) -> String {
    if models_test.is_empty() {
        return "No models configured to test. Set GEMINI_MODEL or GEMINI_FALLBACK_MODELS."
            .to_string();
    }

    let count = |label: &str| {
        models_test
            .iter()
            .filter(|r| r.error_type.as_deref() == Some(label))
            .count()
    };
    let quota = count(QUOTA_EXCEEDED);
    let not_found = count(MODEL_NOT_FOUND);
    let auth = count(INVALID_API_KEY) + count(PERMISSION_DENIED);

    if quota > 0 {
        "Your API key has no available quota. Make sure the key is activated, or create a new key at https://aistudio.google.com/apikey".to_string()
    } else if not_found == models_test.len() {
        "All models returned 404 Not Found. The key may not have access to the Generative Language API; enable it for the key's project".to_string()
    } else if auth > 0 {
        "The API key was rejected. Create a new key at https://aistudio.google.com/apikey and update GEMINI_API_KEY".to_string()
    } else {
        "No working models found. Check network access to the API endpoint and the server logs"
            .to_string()
    }
}
