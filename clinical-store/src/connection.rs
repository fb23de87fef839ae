// Database connection management
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};

/// Idempotent schema bootstrap. The identity constraint needs
/// PostgreSQL 15+ (`NULLS NOT DISTINCT`): missing identity parts must
/// compare equal, or the find-or-create race mitigation breaks for
/// partially identified patients.
const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS patients (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        first_name TEXT,
        last_name TEXT,
        sex TEXT NOT NULL,
        age INTEGER,
        birth_date DATE,
        birth_place TEXT,
        residence TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        CONSTRAINT patients_identity_key
            UNIQUE NULLS NOT DISTINCT (first_name, last_name, birth_date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reports (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        patient_id UUID NOT NULL REFERENCES patients(id),
        clinician_id UUID,
        clinician_name TEXT,
        call_date DATE,
        exit_code TEXT NOT NULL,
        deceased BOOLEAN NOT NULL DEFAULT FALSE,
        payload JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS reports_created_at_idx ON reports (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS reports_clinician_idx ON reports (clinician_id)",
    "CREATE INDEX IF NOT EXISTS reports_call_date_idx ON reports (call_date)",
];

/// Database connection pool wrapper
#[derive(Clone)]
pub struct StorePool {
    pool: Arc<PgPool>,
}

impl StorePool {
    /// Create a new database pool from connection string
    pub async fn new(connection_string: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(50)
            .min_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(connection_string)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!("Database connection pool created successfully");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the tables and indexes this service needs, if absent
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(self.pool.as_ref()).await?;
        }
        info!("Database schema ensured");
        Ok(())
    }

    /// Check if the pool is healthy
    pub async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        }
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
