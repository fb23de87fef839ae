use axum::extract::State;
use axum::Json;

use clinical_store::AnalyticsSummary;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::TriageServer;

/// Aggregated statistics over stored reports.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/summary",
    tag = "analytics",
    responses(
        (status = 200, description = "Report aggregates", body = AnalyticsSummary)
    )
)]
pub async fn analytics_summary(
    State(server): State<TriageServer>,
) -> Result<Json<ApiResponse<AnalyticsSummary>>, ApiError> {
    let summary = server.store.analytics_summary().await?;
    Ok(Json(api_success(summary)))
}
