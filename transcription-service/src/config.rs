use serde::{Deserialize, Serialize};

use crate::error::{TranscriptionError, TranscriptionResult};

/// Provider-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpeechProvider {
    /// OpenAI-compatible Whisper endpoint (self-hosted or remote)
    Whisper {
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
        /// ISO 639-1 hint, e.g. "it"; autodetected when absent
        language: Option<String>,
    },
    /// Fixed-text provider for tests and offline development
    Mock { transcript: Option<String> },
}

/// Transcription service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionConfig {
    pub provider: SpeechProvider,
    pub timeout_secs: u64,
}

impl TranscriptionConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> TranscriptionResult<Self> {
        let timeout_secs = std::env::var("TRANSCRIPTION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);

        let provider = if let Ok(provider_type) = std::env::var("TRANSCRIPTION_PROVIDER") {
            match provider_type.to_lowercase().as_str() {
                "whisper" => Self::whisper_from_env(),
                "mock" => SpeechProvider::Mock {
                    transcript: std::env::var("TRANSCRIPTION_MOCK_TEXT").ok(),
                },
                _ => {
                    return Err(TranscriptionError::Config(format!(
                        "Unknown transcription provider: {}",
                        provider_type
                    )))
                }
            }
        } else {
            Self::whisper_from_env()
        };

        Ok(Self {
            provider,
            timeout_secs,
        })
    }

    fn whisper_from_env() -> SpeechProvider {
        SpeechProvider::Whisper {
            api_url: std::env::var("WHISPER_API_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            api_key: std::env::var("WHISPER_API_KEY").ok(),
            model: std::env::var("WHISPER_MODEL").ok(),
            language: std::env::var("TRANSCRIPTION_LANGUAGE").ok(),
        }
    }
}
