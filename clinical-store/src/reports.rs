//! Report repository: insert-only writes plus the downstream query surface.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use report_schema::{ClinicalReport, ExitCode};

use crate::error::StoreResult;
use crate::models::{Clinician, ReportFilter, StoredReport};

/// Repository for clinical report storage
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one report referencing an already-resolved patient id.
    /// Reports are never updated by this pipeline afterwards.
    pub async fn save(
        &self,
        report: &ClinicalReport,
        patient_id: Uuid,
        clinician: &Clinician,
    ) -> StoreResult<Uuid> {
        // The record arrives normalized, so at most one flag is set; an
        // all-false group would have been defaulted to white upstream, but
        // the same fallback keeps the column total either way.
        let exit_code = report
            .call_info
            .exit_code
            .selected()
            .unwrap_or(ExitCode::White);
        let payload = serde_json::to_value(report)?;

        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO reports (patient_id, clinician_id, clinician_name,
                                 call_date, exit_code, deceased, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(patient_id)
        .bind(clinician.id)
        .bind(clinician.name.as_deref())
        .bind(report.call_info.call_date)
        .bind(exit_code.as_str())
        .bind(report.death_info.died)
        .bind(payload)
        .fetch_one(&self.pool)
        .await?;

        info!(
            report_id = %id,
            patient_id = %patient_id,
            exit_code = %exit_code,
            "report stored"
        );
        Ok(id)
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<Option<StoredReport>> {
        let report = sqlx::query_as::<_, StoredReport>(
            r#"
            SELECT r.id, r.patient_id,
                   p.first_name AS patient_first_name,
                   p.last_name AS patient_last_name,
                   r.clinician_id, r.clinician_name, r.call_date,
                   r.exit_code, r.deceased, r.payload, r.created_at
            FROM reports r
            JOIN patients p ON p.id = r.patient_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// List reports newest first, with optional surname-prefix, clinician
    /// and call-date-range filters.
    pub async fn list(&self, filter: &ReportFilter) -> StoreResult<Vec<StoredReport>> {
        let reports = sqlx::query_as::<_, StoredReport>(
            r#"
            SELECT r.id, r.patient_id,
                   p.first_name AS patient_first_name,
                   p.last_name AS patient_last_name,
                   r.clinician_id, r.clinician_name, r.call_date,
                   r.exit_code, r.deceased, r.payload, r.created_at
            FROM reports r
            JOIN patients p ON p.id = r.patient_id
            WHERE ($1::text IS NULL OR p.last_name ILIKE $1 || '%')
              AND ($2::uuid IS NULL OR r.clinician_id = $2)
              AND ($3::date IS NULL OR r.call_date >= $3)
              AND ($4::date IS NULL OR r.call_date <= $4)
            ORDER BY r.created_at DESC
            LIMIT $5
            "#,
        )
        .bind(filter.last_name_prefix.as_deref())
        .bind(filter.clinician_id)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.effective_limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }
}
