use tracing::{debug, info};

use report_schema::ClinicalReport;

use crate::config::ExtractionConfig;
use crate::error::ExtractionResult;
use crate::parse::parse_model_output;
use crate::prompt::{build_extraction_prompt, build_synthetic_narrative_prompt};
use crate::providers::{self, ModelProviderTrait};

/// Facade over the configured generation model.
///
/// One model call per `extract` invocation; retry policy, if any, belongs to
/// the orchestrator.
pub struct ExtractionService {
    provider: Box<dyn ModelProviderTrait>,
}

impl ExtractionService {
    pub fn new(config: &ExtractionConfig) -> ExtractionResult<Self> {
        let provider = providers::create_provider(config)?;
        Ok(Self { provider })
    }

    /// Build the service from environment variables
    pub fn from_env() -> ExtractionResult<Self> {
        Self::new(&ExtractionConfig::from_env()?)
    }

    /// Wraps a caller-supplied provider, the seam used by tests.
    pub fn with_provider(provider: Box<dyn ModelProviderTrait>) -> Self {
        Self { provider }
    }

    /// Turn one transcript into a validated, normalized clinical record.
    ///
    /// # Errors
    ///
    /// `ModelUnavailable` on transport failure, `MalformedPayload` /
    /// `SchemaValidation` (raw output attached) when the model's answer
    /// cannot be accepted. The result is never a partially-valid record.
    pub async fn extract(&self, transcript: &str) -> ExtractionResult<ClinicalReport> {
        let prompt = build_extraction_prompt(transcript);
        let raw = self.provider.complete(&prompt).await?;

        let (report, adjustments) = parse_model_output(&raw)?;
        for note in &adjustments {
            debug!(note = %note, "normalization adjustment");
        }
        info!(
            critical = report.is_critical(),
            adjustments = adjustments.len(),
            "transcript extracted"
        );

        Ok(report)
    }

    /// Ask the model for a fictional emergency narrative (synthetic-report
    /// surface).
    ///
    /// # Errors
    ///
    /// `ModelUnavailable` on transport failure; there is no transcript to
    /// fall back to here.
    pub async fn generate_narrative(&self, scenario_hint: &str) -> ExtractionResult<String> {
        let prompt = build_synthetic_narrative_prompt(scenario_hint);
        let narrative = self.provider.complete(&prompt).await?;
        Ok(narrative.trim().to_string())
    }
}
