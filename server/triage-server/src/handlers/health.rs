use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::TriageServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall health status
    #[schema(example = "healthy")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    #[schema(example = "2026-01-15T10:30:00Z")]
    pub timestamp: String,
    /// API version
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Readiness response with per-collaborator checks
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    /// Overall readiness status
    #[schema(example = "ready")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    pub timestamp: String,
    /// Individual collaborator checks
    pub checks: HashMap<String, String>,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Ok(Json(api_success(response)))
}

/// Readiness probe: pings the database and the alert broker. An unreachable
/// broker degrades readiness but does not fail it, matching the best-effort
/// alert channel.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Readiness state with per-collaborator checks", body = ReadinessResponse)
    )
)]
pub async fn readiness(
    State(server): State<TriageServer>,
) -> Result<Json<ApiResponse<ReadinessResponse>>, ApiError> {
    let mut checks = HashMap::new();

    let database_healthy = server.store.is_healthy().await;
    checks.insert(
        "database".to_string(),
        if database_healthy { "healthy" } else { "unreachable" }.to_string(),
    );

    let alert_status = match &server.alerts {
        Some(publisher) => match publisher.check().await {
            Ok(()) => "healthy",
            Err(_) => "unreachable",
        },
        None => "not configured",
    };
    checks.insert("alert_broker".to_string(), alert_status.to_string());

    let response = ReadinessResponse {
        status: if database_healthy { "ready" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks,
    };
    Ok(Json(api_success(response)))
}
