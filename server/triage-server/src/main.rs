use tracing::info;
use tracing_subscriber::EnvFilter;

use triage_server::{create_app, TriageServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = TriageServer::from_env().await?;
    let bind_address = server.config.bind_address();
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "VoiceTriage server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
