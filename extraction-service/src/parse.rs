//! Boundary parsing of raw model output.
//!
//! The model is asked for a single JSON object but real responses arrive
//! fenced, wrapped in prose, or truncated. The parser extracts the one JSON
//! object it can find, then validates it into the strict schema; anything
//! else becomes a typed error carrying the raw text for audit.

use report_schema::{normalize, validate, ClinicalReport};

use crate::error::{ExtractionError, ExtractionResult};

/// Parse, validate and normalize one raw model response.
///
/// Returns the schema-conformant record together with the normalization
/// adjustment notes, or a typed error. Never panics on hostile input.
///
/// # Errors
///
/// `MalformedPayload` when no parseable JSON object is present;
/// `SchemaValidation` when the JSON violates required-field, type or range
/// constraints. Both carry the raw output.
pub fn parse_model_output(raw: &str) -> ExtractionResult<(ClinicalReport, Vec<String>)> {
    let candidate = isolate_json_object(raw)?;

    let value: serde_json::Value =
        serde_json::from_str(candidate).map_err(|e| ExtractionError::MalformedPayload {
            detail: format!("model output is not well-formed JSON: {}", e),
            raw_output: raw.to_string(),
        })?;

    let mut report: ClinicalReport =
        serde_json::from_value(value).map_err(|e| ExtractionError::SchemaValidation {
            detail: e.to_string(),
            raw_output: raw.to_string(),
        })?;

    validate(&report).map_err(|e| ExtractionError::SchemaValidation {
        detail: e.to_string(),
        raw_output: raw.to_string(),
    })?;

    let adjustments = normalize(&mut report);

    Ok((report, adjustments))
}

/// Cuts the response down to the outermost JSON object, tolerating code
/// fences and surrounding prose.
fn isolate_json_object(raw: &str) -> ExtractionResult<&str> {
    let start = raw.find('{');
    let end = raw.rfind('}');

    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            raw.get(start..=end)
                .ok_or_else(|| ExtractionError::MalformedPayload {
                    detail: "model output contains no JSON object".to_string(),
                    raw_output: raw.to_string(),
                })
        }
        _ => Err(ExtractionError::MalformedPayload {
            detail: "model output contains no JSON object".to_string(),
            raw_output: raw.to_string(),
        }),
    }
}
