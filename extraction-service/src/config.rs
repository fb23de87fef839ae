use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, ExtractionResult};

/// Provider-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelProvider {
    /// Google Gemini generateContent endpoint
    Gemini {
        api_url: String,
        api_key: String,
        model: String,
        temperature: f32,
    },
    /// Fixed-response provider for tests and offline development
    Mock { response: Option<String> },
}

/// Extraction service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    pub provider: ModelProvider,
    pub timeout_secs: u64,
}

impl ExtractionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ExtractionResult<Self> {
        let timeout_secs = std::env::var("EXTRACTION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        let provider = if let Ok(provider_type) = std::env::var("EXTRACTION_PROVIDER") {
            match provider_type.to_lowercase().as_str() {
                "gemini" => Self::gemini_from_env(),
                "mock" => ModelProvider::Mock {
                    response: std::env::var("EXTRACTION_MOCK_RESPONSE").ok(),
                },
                _ => {
                    return Err(ExtractionError::Config(format!(
                        "Unknown extraction provider: {}",
                        provider_type
                    )))
                }
            }
        } else {
            Self::gemini_from_env()
        };

        Ok(Self {
            provider,
            timeout_secs,
        })
    }

    fn gemini_from_env() -> ModelProvider {
        ModelProvider::Gemini {
            api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            temperature: std::env::var("EXTRACTION_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.2),
        }
    }
}
