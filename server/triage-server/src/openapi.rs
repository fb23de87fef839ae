use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::server::TriageServer;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::health::readiness,
        crate::handlers::reports::transcribe_report,
        crate::handlers::reports::synthetic_report,
        crate::handlers::reports::list_reports,
        crate::handlers::reports::get_report,
        crate::handlers::analytics::analytics_summary,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,
            crate::handlers::health::ReadinessResponse,
            crate::handlers::reports::SyntheticRequest,
            crate::handlers::reports::SyntheticResponse,
            crate::pipeline::PipelineOutcome,
            crate::pipeline::ExtractionFailure,
            crate::pipeline::TerminalState,
            crate::pipeline::PipelineStage,
            report_schema::ClinicalReport,
            report_schema::CallInfo,
            report_schema::ExitCodeFlags,
            report_schema::ExitCode,
            report_schema::Authority,
            report_schema::PatientDetails,
            report_schema::Sex,
            report_schema::DeathInfo,
            report_schema::Vitals,
            report_schema::ConsciousnessFlags,
            report_schema::SkinFlags,
            report_schema::BreathingFlags,
            report_schema::Interventions,
            report_schema::BreathingInterventions,
            report_schema::CirculationInterventions,
            report_schema::ImmobilizationInterventions,
            clinical_store::StoredReport,
            clinical_store::AnalyticsSummary,
            clinical_store::ExitCodeCount,
            clinical_store::ClinicianCount,
            clinical_store::YearCount,
            clinical_store::InterventionUsage,
        )
    ),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "reports", description = "Emergency report submission and queries"),
        (name = "analytics", description = "Read-only report statistics"),
    ),
    info(
        title = "VoiceTriage API",
        version = "0.1.0",
        description = "Spoken emergency-report pipeline: transcription, structured extraction, critical-code alerting and persistence.",
        contact(
            name = "VoiceTriage Team",
            email = "team@voicetriage.dev",
            url = "https://voicetriage.dev"
        ),
        license(
            name = "AGPL-3.0-only",
            url = "https://github.com/voicetriage/voicetriage-engine/blob/main/LICENSE"
        ),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document as JSON
pub fn create_docs_routes() -> Router<TriageServer> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
