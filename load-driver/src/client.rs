//! HTTP client for the triage server's transcribe endpoint.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use report_schema::ClinicalReport;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server rejected the submission: {0}")]
    Rejected(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Client-side mirror of the response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Client-side mirror of the pipeline outcome; fields this driver does not
/// act on are left out and ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub transcript: String,
    pub record: Option<ClinicalReport>,
    pub extraction_error: Option<ExtractionFailure>,
    pub report_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    #[serde(default)]
    pub alert_sent: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionFailure {
    pub error: String,
    pub detail: String,
}

/// Thin wrapper over one shared HTTP connection pool.
#[derive(Clone)]
pub struct TriageClient {
    http: reqwest::Client,
    transcribe_url: String,
}

impl TriageClient {
    pub fn new(endpoint: &str, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            transcribe_url: format!(
                "{}/api/v1/reports/transcribe",
                endpoint.trim_end_matches('/')
            ),
        })
    }

    /// Submit one transcript through the orchestrator endpoint.
    ///
    /// # Errors
    ///
    /// `Network` on transport or timeout failure, `Rejected` when the server
    /// answered with an error envelope.
    pub async fn submit_transcript(
        &self,
        transcript: &str,
        clinician_name: &str,
    ) -> ClientResult<SubmissionOutcome> {
        let form = reqwest::multipart::Form::new()
            .text("transcript", transcript.to_string())
            .text("clinicianName", clinician_name.to_string());

        let response = self
            .http
            .post(&self.transcribe_url)
            .multipart(form)
            .send()
            .await?;

        let envelope: Envelope<SubmissionOutcome> = response.json().await?;
        if !envelope.success {
            return Err(ClientError::Rejected(
                envelope
                    .error
                    .unwrap_or_else(|| "no error detail".to_string()),
            ));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::Rejected("success envelope without data".to_string()))
    }
}
