use crate::config::GeneratorSettings;
use crate::domain::model::GenerationConfig;
use crate::domain::ports::{GeneratorFactory, TextGenerator};
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| CheckError::MalformedResponseError {
                message: "missing candidates[0].content.parts[0].text".to_string(),
            })
    }
}

/// Builds the `generateContent` URL for `model` below `base_url`.
pub fn model_endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Shared HTTP client honouring the configured per-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    /// Client for `model`, posting to `{base_url}/models/{model}:generateContent?key=...`.
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: &str,
        model: &str,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            client,
            endpoint: model_endpoint(base_url, model),
            api_key: Some(api_key.to_string()),
            model: model.to_string(),
            generation,
        }
    }

    /// Client posting to a fully-formed endpoint URL, used verbatim.
    pub fn with_endpoint(
        client: Client,
        endpoint: &str,
        model: &str,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: None,
            model: model.to_string(),
            generation,
        }
    }

    /// Client for the primary configured model, preferring a full endpoint override.
    pub fn from_settings(client: Client, settings: &GeneratorSettings) -> Self {
        match &settings.api_url {
            Some(api_url) => {
                Self::with_endpoint(client, api_url, &settings.model, settings.generation)
            }
            None => Self::new(
                client,
                &settings.base_url,
                &settings.api_key,
                &settings.model,
                settings.generation,
            ),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.generation,
        };

        tracing::debug!(model = %self.model, "Calling generator API");

        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        // 請求 URL 帶有 key，錯誤訊息不可包含 URL
        let response = request.send().await.map_err(redact)?;
        let status = response.status();
        tracing::debug!("Generator response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(CheckError::UpstreamStatusError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| CheckError::MalformedResponseError {
                    message: e.without_url().to_string(),
                })?;
        let text = body.into_text()?;

        tracing::info!(model = %self.model, chars = text.len(), "Generator response received");
        Ok(text)
    }
}

/// Drops the request URL, which carries the API key, from a transport error.
fn redact(error: reqwest::Error) -> CheckError {
    CheckError::ApiError(error.without_url())
}

/// Produces [`GeminiClient`]s for arbitrary model names, sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct GeminiClientFactory {
    client: Client,
    base_url: String,
    api_key: String,
    generation: GenerationConfig,
}

impl GeminiClientFactory {
    pub fn new(client: Client, settings: &GeneratorSettings) -> Self {
        Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            generation: settings.generation,
        }
    }
}

impl GeneratorFactory for GeminiClientFactory {
    fn for_model(&self, model: &str) -> Result<Arc<dyn TextGenerator>> {
        Ok(Arc::new(GeminiClient::new(
            self.client.clone(),
            &self.base_url,
            &self.api_key,
            model,
            self.generation,
        )))
    }
}
