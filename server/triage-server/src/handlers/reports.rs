//! Report submission and query handlers.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use clinical_store::{Clinician, ReportFilter, StoredReport};

use crate::error::{api_success, ApiError, ApiResponse};
use crate::pipeline::PipelineOutcome;
use crate::server::TriageServer;

/// Scenario seeds for synthetic narratives when the caller gives no hint.
const SCENARIO_HINTS: &[&str] = &[
    "road accident with a motorcyclist",
    "elderly person fallen at home",
    "cardiac arrest in a public place",
    "allergic reaction at a restaurant",
    "workplace injury on a construction site",
    "child with high fever and convulsions",
];

/// Submit one emergency report as audio or transcript.
///
/// Multipart form: either an `audio` file part (staged to a request-scoped
/// temp file) or a `transcript` text part, plus optional `clinicianId` /
/// `clinicianName` attribution parts. The transcript is always returned
/// once transcription succeeded, even when extraction fails.
#[utoipa::path(
    post,
    path = "/api/v1/reports/transcribe",
    tag = "reports",
    responses(
        (status = 200, description = "Pipeline outcome, extraction errors inline", body = PipelineOutcome),
        (status = 400, description = "Neither audio nor transcript provided"),
        (status = 502, description = "Transcription collaborator unavailable")
    )
)]
pub async fn transcribe_report(
    State(server): State<TriageServer>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<PipelineOutcome>>, ApiError> {
    let mut audio: Option<(Vec<u8>, String)> = None;
    let mut transcript: Option<String> = None;
    let mut clinician = Clinician::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("unreadable multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let filename = field
                    .file_name()
                    .unwrap_or("upload.wav")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::validation(format!("unreadable audio part: {}", e))
                })?;
                audio = Some((bytes.to_vec(), filename));
            }
            "transcript" => {
                transcript = Some(field.text().await.map_err(|e| {
                    ApiError::validation(format!("unreadable transcript part: {}", e))
                })?);
            }
            "clinicianId" => {
                let text = field.text().await.map_err(|e| {
                    ApiError::validation(format!("unreadable clinicianId part: {}", e))
                })?;
                clinician.id = Some(Uuid::parse_str(text.trim()).map_err(|_| {
                    ApiError::validation("clinicianId must be a UUID")
                })?);
            }
            "clinicianName" => {
                clinician.name = Some(field.text().await.map_err(|e| {
                    ApiError::validation(format!("unreadable clinicianName part: {}", e))
                })?);
            }
            other => {
                debug!(field = %other, "ignoring unknown multipart field");
            }
        }
    }

    let outcome = if let Some((bytes, filename)) = audio {
        server.run_audio(&bytes, &filename, &clinician).await?
    } else if let Some(text) = transcript.filter(|t| !t.trim().is_empty()) {
        server.run_transcript(text, &clinician).await
    } else {
        return Err(ApiError::validation(
            "either an 'audio' file part or a non-empty 'transcript' part is required",
        ));
    };

    Ok(Json(api_success(outcome)))
}

/// Synthetic report request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SyntheticRequest {
    pub clinician_id: Option<Uuid>,
    pub clinician_name: Option<String>,
    /// Scenario seed for the narrative; a random one is picked when absent.
    pub scenario_hint: Option<String>,
}

/// Synthetic report response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticResponse {
    pub narrative: String,
    pub outcome: PipelineOutcome,
}

/// Generate a fictional emergency narrative with the extraction model and
/// run the standard pipeline on it.
#[utoipa::path(
    post,
    path = "/api/v1/reports/synthetic",
    tag = "reports",
    request_body = SyntheticRequest,
    responses(
        (status = 200, description = "Narrative and pipeline outcome", body = SyntheticResponse),
        (status = 502, description = "Narrative generation failed")
    )
)]
pub async fn synthetic_report(
    State(server): State<TriageServer>,
    Json(request): Json<SyntheticRequest>,
) -> Result<Json<ApiResponse<SyntheticResponse>>, ApiError> {
    let clinician = Clinician {
        id: request.clinician_id,
        name: request.clinician_name,
    };
    let hint = request.scenario_hint.unwrap_or_else(random_scenario_hint);

    let (narrative, outcome) = server.run_synthetic(&hint, &clinician).await?;
    Ok(Json(api_success(SyntheticResponse { narrative, outcome })))
}

fn random_scenario_hint() -> String {
    use rand::seq::SliceRandom;
    SCENARIO_HINTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("road accident")
        .to_string()
}

/// Report list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportListQuery {
    /// Case-insensitive surname prefix
    pub last_name_prefix: Option<String>,
    pub clinician_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

/// List stored reports, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Matching reports, newest first", body = [StoredReport])
    )
)]
pub async fn list_reports(
    State(server): State<TriageServer>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<StoredReport>>>, ApiError> {
    let filter = ReportFilter {
        last_name_prefix: query.last_name_prefix,
        clinician_id: query.clinician_id,
        date_from: query.date_from,
        date_to: query.date_to,
        limit: query.limit,
    };
    let reports = server.store.list_reports(&filter).await?;
    Ok(Json(api_success(reports)))
}

/// Fetch one stored report by id.
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "The report", body = StoredReport),
        (status = 404, description = "No report with this id")
    )
)]
pub async fn get_report(
    State(server): State<TriageServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StoredReport>>, ApiError> {
    match server.store.get_report(id).await? {
        Some(report) => Ok(Json(api_success(report))),
        None => Err(ApiError::not_found(format!("report {}", id))),
    }
}
