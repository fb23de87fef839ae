//! Console consumer for the critical-code alert channel.
//!
//! Subscribes to the configured Redis topic and logs one line per alert.
//! Deduplication is deliberately not performed here or anywhere else on
//! this channel.

use alert_bus::{AlertBusConfig, RedisAlertBus};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AlertBusConfig::from_env();
    let bus = RedisAlertBus::connect(&config).await?;
    info!(channel = %config.channel, "alert listener started");

    let handle = bus
        .subscribe(|alert| {
            warn!(
                patient_first_name = %alert.patient.first_name,
                patient_last_name = %alert.patient.last_name,
                location = %alert.location,
                "CRITICAL CODE: {} {} at {}",
                alert.patient.first_name,
                alert.patient.last_name,
                alert.location
            );
        })
        .await?;

    handle.await?;
    Ok(())
}
