use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns a prompt into generated text using one specific model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Builds generators for named models; used when probing a model list.
pub trait GeneratorFactory: Send + Sync {
    fn for_model(&self, model: &str) -> Result<Arc<dyn TextGenerator>>;
}
