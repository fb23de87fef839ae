use tracing::info;

use crate::config::TranscriptionConfig;
use crate::error::TranscriptionResult;
use crate::providers::{self, SpeechProviderTrait};
use crate::transcript::Transcript;

/// Facade over the configured speech provider.
pub struct TranscriptionService {
    provider: Box<dyn SpeechProviderTrait>,
}

impl TranscriptionService {
    pub fn new(config: &TranscriptionConfig) -> TranscriptionResult<Self> {
        let provider = providers::create_provider(config)?;
        Ok(Self { provider })
    }

    /// Build the service from environment variables
    pub fn from_env() -> TranscriptionResult<Self> {
        Self::new(&TranscriptionConfig::from_env()?)
    }

    pub async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
    ) -> TranscriptionResult<Transcript> {
        let started = std::time::Instant::now();
        let transcript = self.provider.transcribe(audio_data, filename).await?;
        info!(
            bytes = audio_data.len(),
            provider = %transcript.provider,
            elapsed = ?started.elapsed(),
            "audio transcribed"
        );
        Ok(transcript)
    }
}
