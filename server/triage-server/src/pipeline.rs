//! Pipeline orchestrator: one submission from audio or transcript to a
//! persisted, possibly alerted, clinical record.
//!
//! The state machine per request is
//! `Received -> Transcribed -> Extracted -> NotifiedOrSkipped -> Persisted`,
//! terminal on the first failure. A transcript obtained before a later stage
//! failed is always returned to the caller; extraction failures travel
//! inline in the outcome rather than failing the whole call.

use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use clinical_store::Clinician;
use extraction_service::ExtractionError;
use report_schema::ClinicalReport;
use transcription_service::TranscriptionError;

use crate::notifier::maybe_notify;
use crate::server::TriageServer;

/// Stage at which a submission terminated early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PipelineStage {
    Transcription,
    Extraction,
    Notification,
    Persistence,
}

/// Terminal state of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TerminalState {
    Completed,
    Failed { stage: PipelineStage },
}

/// Typed extraction failure as surfaced to callers, raw model output
/// attached for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionFailure {
    /// Stable category tag (`modelUnavailable`, `malformedPayload`,
    /// `schemaValidation`).
    pub error: String,
    pub detail: String,
    pub raw_output: Option<String>,
}

impl From<&ExtractionError> for ExtractionFailure {
    fn from(error: &ExtractionError) -> Self {
        Self {
            error: error.category().to_string(),
            detail: error.detail(),
            raw_output: error.raw_output().map(str::to_string),
        }
    }
}

/// Result of one pipeline run.
///
/// `record` and `extraction_error` are mutually exclusive; `report_id` and
/// `patient_id` are set only when persistence succeeded; `alert_sent` is
/// false both for non-critical records and for a critical record whose
/// publish attempt failed (the two are distinguished in logs).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    pub transcript: String,
    pub record: Option<ClinicalReport>,
    pub extraction_error: Option<ExtractionFailure>,
    pub report_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub alert_sent: bool,
    pub state: TerminalState,
}

impl PipelineOutcome {
    fn for_transcript(transcript: String) -> Self {
        Self {
            transcript,
            record: None,
            extraction_error: None,
            report_id: None,
            patient_id: None,
            alert_sent: false,
            state: TerminalState::Completed,
        }
    }
}

/// Failures before a transcript exists; past that point errors travel
/// inside [`PipelineOutcome`].
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("transcription produced an empty transcript")]
    EmptyTranscript,

    #[error("narrative generation failed: {0}")]
    NarrativeGeneration(ExtractionError),

    #[error("audio spool failed: {0}")]
    Spool(#[from] std::io::Error),
}

impl TriageServer {
    /// Run the pipeline from raw audio bytes.
    ///
    /// The audio is staged to a temp file scoped to this call; the RAII
    /// guard removes it on every exit path, success or failure.
    ///
    /// # Errors
    ///
    /// [`PipelineError`] when no transcript could be produced.
    pub async fn run_audio(
        &self,
        audio: &[u8],
        filename: &str,
        clinician: &Clinician,
    ) -> Result<PipelineOutcome, PipelineError> {
        let spool = stage_audio(audio)?;
        let staged = std::fs::read(spool.path())?;

        let transcript = self.transcription.transcribe(&staged, filename).await?;
        drop(spool);

        if transcript.is_empty() {
            return Err(PipelineError::EmptyTranscript);
        }
        Ok(self.run_transcript(transcript.text, clinician).await)
    }

    /// Run the pipeline from an already-produced transcript. Infallible at
    /// the call level: every later failure is reported inside the outcome,
    /// and the transcript is always returned.
    pub async fn run_transcript(&self, transcript: String, clinician: &Clinician) -> PipelineOutcome {
        let mut outcome = PipelineOutcome::for_transcript(transcript);

        let report = match self.extraction.extract(&outcome.transcript).await {
            Ok(report) => report,
            Err(e) => {
                info!(category = e.category(), "extraction failed, transcript still returned");
                outcome.extraction_error = Some(ExtractionFailure::from(&e));
                outcome.state = TerminalState::Failed {
                    stage: PipelineStage::Extraction,
                };
                return outcome;
            }
        };

        // Notification before persistence; the order is not load-bearing,
        // but both must have run (or been explicitly skipped) before the
        // submission is reported complete.
        outcome.alert_sent = maybe_notify(self.alerts.as_deref(), &report).await;

        match self.persist(&report, clinician).await {
            Ok((patient_id, report_id)) => {
                outcome.patient_id = Some(patient_id);
                outcome.report_id = Some(report_id);
            }
            Err(e) => {
                error!(error = %e, "report persistence failed");
                outcome.state = TerminalState::Failed {
                    stage: PipelineStage::Persistence,
                };
            }
        }

        outcome.record = Some(report);
        outcome
    }

    /// Generate a fictional narrative with the extraction model, then run
    /// the standard pipeline on it.
    ///
    /// # Errors
    ///
    /// `NarrativeGeneration` when the model call fails; there is no
    /// transcript to fall back to here.
    pub async fn run_synthetic(
        &self,
        scenario_hint: &str,
        clinician: &Clinician,
    ) -> Result<(String, PipelineOutcome), PipelineError> {
        let narrative = self
            .extraction
            .generate_narrative(scenario_hint)
            .await
            .map_err(PipelineError::NarrativeGeneration)?;
        if narrative.trim().is_empty() {
            return Err(PipelineError::NarrativeGeneration(
                ExtractionError::ModelUnavailable("model returned an empty narrative".to_string()),
            ));
        }

        let outcome = self.run_transcript(narrative.clone(), clinician).await;
        Ok((narrative, outcome))
    }

    async fn persist(
        &self,
        report: &ClinicalReport,
        clinician: &Clinician,
    ) -> clinical_store::StoreResult<(Uuid, Uuid)> {
        let patient_id = self.store.find_or_create_patient(&report.patient).await?;
        let report_id = self.store.save_report(report, patient_id, clinician).await?;
        Ok((patient_id, report_id))
    }
}

fn stage_audio(audio: &[u8]) -> std::io::Result<tempfile::NamedTempFile> {
    let mut spool = tempfile::NamedTempFile::new()?;
    spool.write_all(audio)?;
    spool.flush()?;
    Ok(spool)
}
