// Rows and query parameter types of the persistence gateway
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use report_schema::{PatientDetails, Sex};

/// Exact-match identity key for patient deduplication.
///
/// Two reports about the same person must resolve to the same patient row;
/// the match is (first name, last name, birth date), no fuzzy matching.
/// Missing parts participate in the key as NULL and compare equal, which the
/// `patients_identity_key` constraint mirrors with `NULLS NOT DISTINCT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientIdentity {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl PatientIdentity {
    pub fn of(details: &PatientDetails) -> Self {
        Self {
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            birth_date: details.birth_date,
        }
    }
}

/// Stored patient row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sex: String,
    pub age: Option<i32>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub residence: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored report row joined with the identity of the referenced patient.
///
/// The full extracted record lives in `payload` exactly as it left the
/// extraction boundary; the scalar columns exist for the query surface
/// (surname prefix, call-date range, clinician, recency sort).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_first_name: Option<String>,
    pub patient_last_name: Option<String>,
    pub clinician_id: Option<Uuid>,
    pub clinician_name: Option<String>,
    pub call_date: Option<NaiveDate>,
    pub exit_code: String,
    pub deceased: bool,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Owning clinician attribution carried on a stored report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Clinician {
    pub id: Option<Uuid>,
    pub name: Option<String>,
}

/// Filter for the report list query; every field optional, newest first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    /// Case-insensitive prefix match on the patient surname. An exact
    /// surname is a prefix of itself, so one parameter serves both.
    pub last_name_prefix: Option<String>,
    pub clinician_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

impl ReportFilter {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 500;

    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// Aggregates served to statistics consumers; read-only, never mutates data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_reports: i64,
    pub by_exit_code: Vec<ExitCodeCount>,
    pub by_clinician: Vec<ClinicianCount>,
    pub by_call_year: Vec<YearCount>,
    pub interventions: InterventionUsage,
    /// Share of reports marked deceased, 0-100.
    pub deceased_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExitCodeCount {
    pub exit_code: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClinicianCount {
    pub clinician_name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterventionUsage {
    pub oxygen: i64,
    pub ventilation: i64,
    pub intubation: i64,
    pub venous_access: i64,
    pub ecg_monitor: i64,
    pub cervical_collar: i64,
    pub spinal_board: i64,
}

pub(crate) fn sex_code(sex: Sex) -> &'static str {
    sex.as_str()
}
