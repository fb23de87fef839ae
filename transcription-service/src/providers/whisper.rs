/// OpenAI-compatible Whisper provider
///
/// Posts the audio as a multipart upload to a `/v1/audio/transcriptions`
/// endpoint, which self-hosted Whisper servers and the hosted API both
/// expose.
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{SpeechProvider, TranscriptionConfig};
use crate::error::{TranscriptionError, TranscriptionResult};
use crate::providers::SpeechProviderTrait;
use crate::transcript::Transcript;

pub struct WhisperProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
}

impl WhisperProvider {
    pub fn new(config: &TranscriptionConfig) -> TranscriptionResult<Self> {
        let SpeechProvider::Whisper {
            api_url,
            api_key,
            model,
            language,
        } = &config.provider
        else {
            return Err(TranscriptionError::Config(
                "Whisper provider requires whisper configuration".to_string(),
            ));
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.clone(),
            model: model.clone(),
            language: language.clone(),
        })
    }
}

#[async_trait]
impl SpeechProviderTrait for WhisperProvider {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
    ) -> TranscriptionResult<Transcript> {
        let url = format!("{}/v1/audio/transcriptions", self.api_url);

        let part = reqwest::multipart::Part::bytes(audio_data.to_vec())
            .file_name(filename.to_string());
        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(model) = &self.model {
            form = form.text("model", model.clone());
        }
        if let Some(language) = &self.language {
            form = form.text("language", language.clone());
        }

        let mut request = self.client.post(&url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Provider(format!(
                "transcription endpoint returned {}: {}",
                status, error_text
            )));
        }

        let payload: WhisperResponse = response.json().await?;

        Ok(Transcript {
            text: payload.text,
            language: payload.language.or_else(|| self.language.clone()),
            provider: "whisper".to_string(),
        })
    }
}
