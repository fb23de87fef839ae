use async_trait::async_trait;

use crate::config::{SpeechProvider, TranscriptionConfig};
use crate::error::TranscriptionResult;
use crate::providers::SpeechProviderTrait;
use crate::transcript::Transcript;

const DEFAULT_TRANSCRIPT: &str =
    "Paziente cosciente, parametri stabili, codice verde, trasporto in ospedale.";

/// Returns a fixed transcript, for tests and offline development.
pub struct MockProvider {
    transcript: String,
}

impl MockProvider {
    pub fn new(config: &TranscriptionConfig) -> Self {
        let transcript = match &config.provider {
            SpeechProvider::Mock {
                transcript: Some(text),
            } => text.clone(),
            _ => DEFAULT_TRANSCRIPT.to_string(),
        };
        Self { transcript }
    }
}

#[async_trait]
impl SpeechProviderTrait for MockProvider {
    async fn transcribe(
        &self,
        _audio_data: &[u8],
        _filename: &str,
    ) -> TranscriptionResult<Transcript> {
        Ok(Transcript {
            text: self.transcript.clone(),
            language: Some("it".to_string()),
            provider: "mock".to_string(),
        })
    }
}
