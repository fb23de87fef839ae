use crate::error::{SchemaError, SchemaResult};
use crate::report::ClinicalReport;

/// Range rules that serde's type checks cannot express. Required-field and
/// unknown-field violations are already rejected during deserialization.
pub fn validate(report: &ClinicalReport) -> SchemaResult<()> {
    if let Some(saturation) = report.vitals.oxygen_saturation {
        if saturation > 100 {
            return Err(SchemaError::Validation(format!(
                "oxygenSaturation must be within 0-100, got {}",
                saturation
            )));
        }
    }

    if let Some(liters) = report.interventions.breathing.oxygen_liters_per_min {
        if !liters.is_finite() || liters < 0.0 {
            return Err(SchemaError::Validation(format!(
                "oxygenLitersPerMin must be a non-negative number, got {}",
                liters
            )));
        }
    }

    Ok(())
}
