use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CANNED_UNAVAILABLE_RESPONSE: &str =
    "Service is currently unavailable. This is a canned response.";
pub const CANNED_INTERNAL_ERROR_RESPONSE: &str = "Internal Server Error (Canned Response)";
pub const MISSING_INPUT_MESSAGE: &str = "Prompt and Brand are required";

/// Outcome of scanning one generated text for one brand.
///
/// `position` is only ever set when `mentioned` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub mentioned: bool,
    pub position: Option<u32>,
}

impl DetectionResult {
    pub fn not_found() -> Self {
        Self {
            mentioned: false,
            position: None,
        }
    }

    pub fn found_at(position: u32) -> Self {
        Self {
            mentioned: true,
            position: Some(position),
        }
    }
}

/// A list-marked line and its rank among list-marked lines only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItem<'a> {
    pub rank: u32,
    pub line: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl CheckRequest {
    /// Returns `(prompt, brand)` when both are present and non-blank.
    pub fn into_parts(self) -> Option<(String, String)> {
        let prompt = self.prompt.filter(|p| !p.trim().is_empty())?;
        let brand = self.brand.filter(|b| !b.trim().is_empty())?;
        Some((prompt, brand))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub mentioned: bool,
    pub position: Option<u32>,
    pub raw_response: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl CheckOutcome {
    pub fn from_detection(detection: DetectionResult, raw_response: String) -> Self {
        Self {
            mentioned: detection.mentioned,
            position: detection.position,
            raw_response,
            error: false,
        }
    }

    /// Returned with a success status when the generator could not be used.
    pub fn canned_unavailable() -> Self {
        Self::canned(CANNED_UNAVAILABLE_RESPONSE)
    }

    pub fn canned_internal_error() -> Self {
        Self::canned(CANNED_INTERNAL_ERROR_RESPONSE)
    }

    fn canned(raw_response: &str) -> Self {
        Self {
            mentioned: false,
            position: None,
            raw_response: raw_response.to_string(),
            error: true,
        }
    }
}

/// One accumulated check, as kept in the session log and exported to CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub prompt: String,
    pub brand: String,
    pub mentioned: bool,
    pub position: Option<u32>,
    pub raw_response: String,
    pub error: bool,
    pub checked_at: DateTime<Utc>,
}

impl ResultRow {
    pub fn new(prompt: String, brand: String, outcome: &CheckOutcome) -> Self {
        Self {
            prompt,
            brand,
            mentioned: outcome.mentioned,
            position: outcome.position,
            raw_response: outcome.raw_response.clone(),
            error: outcome.error,
            checked_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub total: usize,
    pub mentions_found: usize,
    pub errors: usize,
    /// Whole-number percentage of rows with a mention.
    pub mention_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTestResult {
    pub model: String,
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl ModelTestResult {
    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}

/// Report served by the key diagnostic endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyReport {
    pub api_key_status: String,
    pub api_key_preview: String,
    pub models_test: Vec<ModelTestResult>,
    pub final_status: ProbeStatus,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_model: Option<String>,
}
