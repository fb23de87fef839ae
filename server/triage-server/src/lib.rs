//! VoiceTriage server: pipeline orchestrator and HTTP API.
//!
//! One submission flows transcription -> extraction -> critical-code
//! notification -> persistence, terminal on the first failure, with the
//! transcript always returned to the caller once it exists. Collaborators
//! (speech provider, extraction model, alert broker, store) are injected
//! handles, so the whole pipeline runs against test doubles.

pub mod error;
pub mod handlers;
pub mod notifier;
pub mod openapi;
pub mod pipeline;
pub mod routes;
pub mod server;

// Re-export commonly used types
pub use error::*;
pub use pipeline::{ExtractionFailure, PipelineError, PipelineOutcome, PipelineStage, TerminalState};
pub use server::{ServerConfig, TriageServer};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: TriageServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(server)
}
