pub mod gemini;
pub mod mock;

use async_trait::async_trait;

use crate::config::{ExtractionConfig, ModelProvider};
use crate::error::ExtractionResult;

/// Trait for opaque text-generation providers: prompt in, free text out.
#[async_trait]
pub trait ModelProviderTrait: Send + Sync {
    async fn complete(&self, prompt: &str) -> ExtractionResult<String>;
}

/// Create a provider instance based on configuration
pub fn create_provider(
    config: &ExtractionConfig,
) -> ExtractionResult<Box<dyn ModelProviderTrait>> {
    match &config.provider {
        ModelProvider::Gemini { .. } => Ok(Box::new(gemini::GeminiProvider::new(config)?)),
        ModelProvider::Mock { .. } => Ok(Box::new(mock::MockModelProvider::new(config))),
    }
}
