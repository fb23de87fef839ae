pub mod mock;
pub mod whisper;

use async_trait::async_trait;

use crate::config::{SpeechProvider, TranscriptionConfig};
use crate::error::TranscriptionResult;
use crate::transcript::Transcript;

/// Trait for speech-to-text providers
#[async_trait]
pub trait SpeechProviderTrait: Send + Sync {
    /// Transcribe audio data to text
    async fn transcribe(&self, audio_data: &[u8], filename: &str)
        -> TranscriptionResult<Transcript>;
}

/// Create a provider instance based on configuration
pub fn create_provider(
    config: &TranscriptionConfig,
) -> TranscriptionResult<Box<dyn SpeechProviderTrait>> {
    match &config.provider {
        SpeechProvider::Whisper { .. } => {
            Ok(Box::new(whisper::WhisperProvider::new(config)?))
        }
        SpeechProvider::Mock { .. } => Ok(Box::new(mock::MockProvider::new(config))),
    }
}
