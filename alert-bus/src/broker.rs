use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{info, warn};

use crate::alert::CriticalAlert;
use crate::error::AlertResult;

/// Trait for the alert publish seam, so the detector can be exercised with
/// test doubles.
#[async_trait]
pub trait AlertPublisher: Send + Sync {
    /// One publish attempt; no retry, no queueing of missed alerts.
    async fn publish(&self, alert: &CriticalAlert) -> AlertResult<()>;

    /// Broker connectivity check, used by readiness probes.
    async fn check(&self) -> AlertResult<()>;
}

/// Alert channel configuration
#[derive(Debug, Clone)]
pub struct AlertBusConfig {
    pub redis_url: String,
    pub channel: String,
}

impl AlertBusConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            channel: std::env::var("ALERT_CHANNEL")
                .unwrap_or_else(|_| "critical-code".to_string()),
        }
    }
}

/// Redis pub/sub broadcast channel for critical-code alerts.
///
/// Publishing pings the broker first so an unreachable broker fails fast
/// instead of hanging a pipeline worker; delivery stays fire-and-forget
/// with no consumer acknowledgement tracked.
pub struct RedisAlertBus {
    client: redis::Client,
    connection: ConnectionManager,
    channel: String,
}

impl RedisAlertBus {
    pub async fn connect(config: &AlertBusConfig) -> AlertResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client.clone()).await?;
        Ok(Self {
            client,
            connection,
            channel: config.channel.clone(),
        })
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Broker connectivity check
    pub async fn ping(&self) -> AlertResult<()> {
        let mut connection = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut connection).await?;
        Ok(())
    }

    /// Subscribe to the alert channel and hand every decoded alert to
    /// `handler` on a background task. Malformed payloads are logged and
    /// skipped; the loop never dies on bad input.
    pub async fn subscribe<F>(&self, handler: F) -> AlertResult<tokio::task::JoinHandle<()>>
    where
        F: Fn(CriticalAlert) + Send + Sync + 'static,
    {
        let mut pubsub = self.client.get_async_connection().await?.into_pubsub();
        pubsub.subscribe(&self.channel).await?;
        info!(channel = %self.channel, "subscribed to alert channel");

        let channel = self.channel.clone();
        let handle = tokio::spawn(async move {
            let mut messages = pubsub.into_on_message();
            while let Some(message) = messages.next().await {
                let payload: String = match message.get_payload() {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!(channel = %channel, error = %e, "unreadable alert payload, skipped");
                        continue;
                    }
                };
                match serde_json::from_str::<CriticalAlert>(&payload) {
                    Ok(alert) => handler(alert),
                    Err(e) => {
                        warn!(channel = %channel, error = %e, "malformed alert payload, skipped");
                    }
                }
            }
        });

        Ok(handle)
    }
}

#[async_trait]
impl AlertPublisher for RedisAlertBus {
    async fn publish(&self, alert: &CriticalAlert) -> AlertResult<()> {
        self.ping().await?;

        let payload = serde_json::to_string(alert)?;
        let mut connection = self.connection.clone();
        let receivers: i64 = connection.publish(&self.channel, payload).await?;
        info!(
            channel = %self.channel,
            receivers = receivers,
            location = %alert.location,
            "critical alert published"
        );
        Ok(())
    }

    async fn check(&self) -> AlertResult<()> {
        self.ping().await
    }
}
