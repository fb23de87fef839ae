/// Tests for the extraction boundary
///
/// Tests cover:
/// - JSON isolation (bare, fenced, prose-wrapped, absent)
/// - Typed failure categories with raw output attached
/// - Normalization applied before a record leaves the adapter
/// - Service behavior over provider failures
///
/// Note: providers are exercised through the trait seam; no network involved.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use extraction_service::providers::ModelProviderTrait;
    use extraction_service::{
        parse_model_output, ExtractionConfig, ExtractionError, ExtractionResult,
        ExtractionService, ModelProvider,
    };
    use report_schema::{ExitCode, Sex};

const RED_CODE_RESPONSE: &str = r#"{
  "callInfo": {
    "location": "Piazza Maggiore, Bologna",
    "reportedCondition": "arresto cardiaco",
    "exitCode": { "red": true }
  },
  "patient": { "firstName": "Mario", "lastName": "Rossi", "sex": "M", "age": 45 }
}"#;

struct ScriptedProvider {
    response: ExtractionResult<String>,
}

#[async_trait]
impl ModelProviderTrait for ScriptedProvider {
    async fn complete(&self, _prompt: &str) -> ExtractionResult<String> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(_) => Err(ExtractionError::ModelUnavailable(
                "connection refused".to_string(),
            )),
        }
    }
}

fn service_returning(text: &str) -> ExtractionService {
    ExtractionService::with_provider(Box::new(ScriptedProvider {
        response: Ok(text.to_string()),
    }))
}

// =============================================================================
// UNIT TESTS - JSON ISOLATION
// =============================================================================

#[test]
fn test_parse_accepts_bare_json() {
    let (report, _) = parse_model_output(RED_CODE_RESPONSE).expect("bare JSON must parse");

    assert_eq!(report.patient.first_name.as_deref(), Some("Mario"));
    assert_eq!(report.patient.last_name.as_deref(), Some("Rossi"));
    assert_eq!(report.patient.sex, Sex::M);
    assert_eq!(report.call_info.exit_code.selected(), Some(ExitCode::Red));
}

#[test]
fn test_parse_accepts_fenced_json() {
    let fenced = format!("```json\n{}\n```", RED_CODE_RESPONSE);

    let (report, _) = parse_model_output(&fenced).expect("fenced JSON must parse");

    assert!(report.is_critical());
}

#[test]
fn test_parse_accepts_prose_wrapped_json() {
    let wrapped = format!(
        "Here is the extracted record:\n{}\nLet me know if you need anything else.",
        RED_CODE_RESPONSE
    );

    let (report, _) = parse_model_output(&wrapped).expect("wrapped JSON must parse");

    assert_eq!(report.patient.first_name.as_deref(), Some("Mario"));
}

#[test]
fn test_parse_rejects_pure_prose_with_raw_attached() {
    let prose = "I am sorry, I cannot extract a record from this transcript.";

    let error = parse_model_output(prose).expect_err("prose must be rejected");

    assert!(matches!(error, ExtractionError::MalformedPayload { .. }));
    assert_eq!(error.raw_output(), Some(prose));
    assert_eq!(error.category(), "malformedPayload");
}

#[test]
fn test_parse_rejects_truncated_json() {
    let truncated = r#"{ "patient": { "sex": "M" }"#;

    let error = parse_model_output(truncated).expect_err("truncated JSON must be rejected");

    assert!(matches!(error, ExtractionError::MalformedPayload { .. }));
}

// =============================================================================
// UNIT TESTS - SCHEMA VALIDATION FAILURES
// =============================================================================

#[test]
fn test_parse_rejects_unknown_fields() {
    let raw = r#"{ "patient": { "sex": "M" }, "hallucinated": true }"#;

    let error = parse_model_output(raw).expect_err("unknown field must be rejected");

    assert!(matches!(error, ExtractionError::SchemaValidation { .. }));
    assert_eq!(error.raw_output(), Some(raw));
}

#[test]
fn test_parse_rejects_missing_sex() {
    let raw = r#"{ "patient": { "firstName": "Anna" } }"#;

    let error = parse_model_output(raw).expect_err("missing sex must be rejected");

    assert_eq!(error.category(), "schemaValidation");
}

#[test]
fn test_parse_rejects_out_of_range_saturation() {
    let raw = r#"{ "patient": { "sex": "F" }, "vitals": { "oxygenSaturation": 180 } }"#;

    let error = parse_model_output(raw).expect_err("saturation above 100 must be rejected");

    assert!(matches!(error, ExtractionError::SchemaValidation { .. }));
    assert!(error.detail().contains("oxygenSaturation"));
}

#[test]
fn test_parse_normalizes_before_returning() {
    let raw = r#"{
        "patient": { "sex": "M" },
        "callInfo": { "exitCode": { "green": true, "red": true } },
        "interventions": { "breathing": { "oxygenLitersPerMin": 4.0 } }
    }"#;

    let (report, adjustments) = parse_model_output(raw).expect("record must parse");

    assert_eq!(report.call_info.exit_code.count_set(), 1);
    assert!(report.call_info.exit_code.red);
    assert!(report.interventions.breathing.oxygen_liters_per_min.is_none());
    assert!(adjustments.len() >= 2);
}

// =============================================================================
// UNIT TESTS - SERVICE OVER THE PROVIDER SEAM
// =============================================================================

#[tokio::test]
async fn test_extract_returns_normalized_record() {
    let service = service_returning(RED_CODE_RESPONSE);

    let report = service
        .extract("Paziente Mario Rossi, maschio, 45 anni, codice rosso, arresto cardiaco")
        .await
        .expect("extraction must succeed");

    assert!(report.is_critical());
    assert_eq!(report.patient.age, Some(45));
}

#[tokio::test]
async fn test_extract_surfaces_model_unavailable() {
    let service = ExtractionService::with_provider(Box::new(ScriptedProvider {
        response: Err(ExtractionError::ModelUnavailable(String::new())),
    }));

    let error = service
        .extract("codice verde")
        .await
        .expect_err("transport failure must surface");

    assert_eq!(error.category(), "modelUnavailable");
    assert!(error.raw_output().is_none());
}

#[tokio::test]
async fn test_extract_never_retries_malformed_output() {
    let service = service_returning("non-JSON prose");

    let error = service
        .extract("codice verde")
        .await
        .expect_err("prose must fail extraction");

    assert_eq!(error.raw_output(), Some("non-JSON prose"));
}

#[tokio::test]
async fn test_mock_provider_default_yields_valid_record() {
    let config = ExtractionConfig {
        provider: ModelProvider::Mock { response: None },
        timeout_secs: 5,
    };
    let service = ExtractionService::new(&config).expect("mock service builds");

    let report = service
        .extract("qualsiasi trascrizione")
        .await
        .expect("default mock response must be schema-conformant");

    assert_eq!(report.call_info.exit_code.selected(), Some(ExitCode::Green));
}

#[tokio::test]
async fn test_generate_narrative_trims_output() {
    let service = service_returning("\n  Una chiamata alle 14:30 per caduta.  \n");

    let narrative = service
        .generate_narrative("caduta in bicicletta")
        .await
        .expect("narrative generation must succeed");

    assert_eq!(narrative, "Una chiamata alle 14:30 per caduta.");
}

} // end tests module
