//! Read-only aggregations over stored reports for statistics consumers.

use sqlx::{PgPool, Row};

use crate::error::StoreResult;
use crate::models::{
    AnalyticsSummary, ClinicianCount, ExitCodeCount, InterventionUsage, YearCount,
};

/// Repository for analytics queries
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self) -> StoreResult<AnalyticsSummary> {
        let totals = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COALESCE(AVG(deceased::int)::float8 * 100.0, 0.0) AS deceased_percentage
            FROM reports
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let by_exit_code = sqlx::query_as::<_, ExitCodeCount>(
            r#"
            SELECT exit_code, COUNT(*) AS count
            FROM reports
            GROUP BY exit_code
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let by_clinician = sqlx::query_as::<_, ClinicianCount>(
            r#"
            SELECT clinician_name, COUNT(*) AS count
            FROM reports
            WHERE clinician_name IS NOT NULL
            GROUP BY clinician_name
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let by_call_year = sqlx::query_as::<_, YearCount>(
            r#"
            SELECT EXTRACT(YEAR FROM call_date)::int AS year, COUNT(*) AS count
            FROM reports
            WHERE call_date IS NOT NULL
            GROUP BY year
            ORDER BY year DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let interventions = sqlx::query_as::<_, InterventionUsage>(
            r#"
            SELECT
              COUNT(*) FILTER (WHERE (payload #>> '{interventions,breathing,oxygen}')::boolean) AS oxygen,
              COUNT(*) FILTER (WHERE (payload #>> '{interventions,breathing,ventilation}')::boolean) AS ventilation,
              COUNT(*) FILTER (WHERE (payload #>> '{interventions,breathing,intubation}')::boolean) AS intubation,
              COUNT(*) FILTER (WHERE (payload #>> '{interventions,circulation,venousAccess}')::boolean) AS venous_access,
              COUNT(*) FILTER (WHERE (payload #>> '{interventions,circulation,ecgMonitor}')::boolean) AS ecg_monitor,
              COUNT(*) FILTER (WHERE (payload #>> '{interventions,immobilization,cervicalCollar}')::boolean) AS cervical_collar,
              COUNT(*) FILTER (WHERE (payload #>> '{interventions,immobilization,spinalBoard}')::boolean) AS spinal_board
            FROM reports
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(AnalyticsSummary {
            total_reports: totals.try_get("total")?,
            by_exit_code,
            by_clinician,
            by_call_year,
            interventions,
            deceased_percentage: totals.try_get("deceased_percentage")?,
        })
    }
}
