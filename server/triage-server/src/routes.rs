use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analytics, health, reports};
use crate::openapi;
use crate::server::TriageServer;

/// Route path constants
pub mod paths {
    pub const API_V1: &str = "/api/v1";

    pub mod health {
        pub const HEALTH: &str = "/health";
        pub const READY: &str = "/health/ready";
    }

    pub mod reports {
        pub const TRANSCRIBE: &str = "/reports/transcribe";
        pub const SYNTHETIC: &str = "/reports/synthetic";
        pub const REPORTS: &str = "/reports";
        pub const REPORT_BY_ID: &str = "/reports/:id";
    }

    pub mod analytics {
        pub const SUMMARY: &str = "/analytics/summary";
    }
}

/// Create health check routes
pub fn health_routes() -> Router<TriageServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::READY, get(health::readiness))
}

/// Create report submission and query routes
pub fn report_routes() -> Router<TriageServer> {
    Router::new()
        .route(paths::reports::TRANSCRIBE, post(reports::transcribe_report))
        .route(paths::reports::SYNTHETIC, post(reports::synthetic_report))
        .route(paths::reports::REPORTS, get(reports::list_reports))
        .route(paths::reports::REPORT_BY_ID, get(reports::get_report))
}

/// Create analytics routes
pub fn analytics_routes() -> Router<TriageServer> {
    Router::new().route(paths::analytics::SUMMARY, get(analytics::analytics_summary))
}

/// Create API v1 routes
pub fn api_v1_routes() -> Router<TriageServer> {
    Router::new()
        .merge(report_routes())
        .merge(analytics_routes())
        .merge(openapi::create_docs_routes())
}

/// Create all application routes
pub fn create_routes() -> Router<TriageServer> {
    Router::new()
        // Health routes live at the root, outside the versioned API
        .merge(health_routes())
        .nest(paths::API_V1, api_v1_routes())
}
