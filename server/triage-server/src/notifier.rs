//! Critical-code detector and best-effort notifier.

use std::time::Duration;

use tracing::{debug, error, info};

use alert_bus::{AlertPublisher, CriticalAlert};
use report_schema::ClinicalReport;

/// Bound on the publish attempt so an unreachable broker cannot hang a
/// pipeline worker past this point.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

const UNKNOWN: &str = "unknown";

/// Publish a critical alert if and only if the record carries the Red exit
/// code. Returns whether a publish attempt succeeded; never fails the
/// caller.
///
/// Exactly one publish attempt is made per call on a critical record, no
/// retry and no queueing: a missed alert is accepted data loss, logged at
/// error level, and must never abort report persistence. No deduplication
/// is performed here; calling twice on the same report may send two alerts.
pub async fn maybe_notify(publisher: Option<&dyn AlertPublisher>, report: &ClinicalReport) -> bool {
    if !report.is_critical() {
        debug!("exit code not red, alert skipped");
        return false;
    }

    let alert = CriticalAlert::new(
        field_or_unknown(report.patient.first_name.as_deref()),
        field_or_unknown(report.patient.last_name.as_deref()),
        field_or_unknown(report.call_info.location.as_deref()),
    );

    let Some(publisher) = publisher else {
        error!(
            patient_first_name = %alert.patient.first_name,
            patient_last_name = %alert.patient.last_name,
            location = %alert.location,
            "critical code but alert channel not configured, alert lost"
        );
        return false;
    };

    match tokio::time::timeout(PUBLISH_TIMEOUT, publisher.publish(&alert)).await {
        Ok(Ok(())) => {
            info!(
                patient_first_name = %alert.patient.first_name,
                patient_last_name = %alert.patient.last_name,
                location = %alert.location,
                "critical alert sent"
            );
            true
        }
        Ok(Err(e)) => {
            error!(
                patient_first_name = %alert.patient.first_name,
                patient_last_name = %alert.patient.last_name,
                location = %alert.location,
                error = %e,
                "critical alert publish failed, alert lost"
            );
            false
        }
        Err(_) => {
            error!(
                patient_first_name = %alert.patient.first_name,
                patient_last_name = %alert.patient.last_name,
                location = %alert.location,
                "critical alert publish timed out, alert lost"
            );
            false
        }
    }
}

fn field_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => UNKNOWN.to_string(),
    }
}
