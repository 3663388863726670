use crate::core::detector::detect_mention;
use crate::domain::model::CheckOutcome;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{CheckError, Result};
use std::sync::Arc;

/// Asks the generator one prompt and checks its answer for a brand.
///
/// Generator failures never surface as errors: they become the canned
/// outcome. Only failures inside this process are returned as `Err`.
pub struct BrandCheckService {
    generator: Arc<dyn TextGenerator>,
}

impl BrandCheckService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub async fn check(&self, prompt: &str, brand: &str) -> Result<CheckOutcome> {
        tracing::info!(
            brand,
            prompt_chars = prompt.chars().count(),
            model = self.generator.model(),
            "Checking brand mention"
        );

        let text = match self.generator.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                log_upstream_failure(&e);
                return Ok(CheckOutcome::canned_unavailable());
            }
        };

        // 偵測在 blocking pool 執行，長回應不會佔住 async worker
        let detection = {
            let text = text.clone();
            let brand = brand.to_string();
            tokio::task::spawn_blocking(move || detect_mention(&text, &brand))
                .await
                .map_err(|e| CheckError::InternalError {
                    message: format!("mention detection task failed: {}", e),
                })?
        };

        if detection.mentioned {
            tracing::info!(brand, position = ?detection.position, "Brand is mentioned");
        } else {
            tracing::info!(brand, "Brand is not mentioned");
        }

        Ok(CheckOutcome::from_detection(detection, text))
    }
}

fn log_upstream_failure(error: &CheckError) {
    match error {
        CheckError::UpstreamStatusError { status, message } => tracing::error!(
            kind = "upstream_status",
            status,
            provider_message = %message,
            "Generator API call failed"
        ),
        CheckError::ApiError(e) => {
            let kind = if e.is_timeout() { "timeout" } else { "transport" };
            tracing::error!(
                kind,
                status = ?e.status().map(|s| s.as_u16()),
                error = %e,
                debug = ?e,
                "Generator API call failed"
            )
        }
        other => tracing::error!(
            kind = ?other.category(),
            error = %other,
            debug = ?other,
            "Generator API call failed"
        ),
    }
    tracing::warn!("Returning canned response: {}", error.recovery_suggestion());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CANNED_UNAVAILABLE_RESPONSE;
    use async_trait::async_trait;

    struct FixedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        fn model(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        fn model(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(CheckError::UpstreamStatusError {
                status: 503,
                message: "The model is overloaded".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_check_reports_list_position() {
        let service = BrandCheckService::new(Arc::new(FixedGenerator(
            "1. HubSpot\n2. Salesforce\n3. Zoho",
        )));

        let outcome = service.check("best crm", "Salesforce").await.unwrap();

        assert!(outcome.mentioned);
        assert_eq!(outcome.position, Some(2));
        assert_eq!(outcome.raw_response, "1. HubSpot\n2. Salesforce\n3. Zoho");
        assert!(!outcome.error);
    }

    #[tokio::test]
    async fn test_check_without_mention() {
        let service = BrandCheckService::new(Arc::new(FixedGenerator("Try HubSpot or Zoho.")));

        let outcome = service.check("best crm", "Salesforce").await.unwrap();

        assert!(!outcome.mentioned);
        assert_eq!(outcome.position, None);
        assert!(!outcome.error);
    }

    #[tokio::test]
    async fn test_generator_failure_becomes_canned_outcome() {
        let service = BrandCheckService::new(Arc::new(FailingGenerator));

        let outcome = service.check("best crm", "Salesforce").await.unwrap();

        assert_eq!(outcome, CheckOutcome::canned_unavailable());
        assert_eq!(outcome.raw_response, CANNED_UNAVAILABLE_RESPONSE);
        assert_eq!(service.model(), "failing");
    }
}
