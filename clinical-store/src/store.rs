//! The persistence seam handed to the orchestrator.
//!
//! Collaborator handles are passed explicitly (no ambient singletons), so the
//! pipeline can be exercised against a test double that never touches a
//! database.

use async_trait::async_trait;
use uuid::Uuid;

use report_schema::{ClinicalReport, PatientDetails};

use crate::analytics::AnalyticsRepository;
use crate::connection::StorePool;
use crate::error::StoreResult;
use crate::models::{AnalyticsSummary, Clinician, ReportFilter, StoredReport};
use crate::patients::PatientRepository;
use crate::reports::ReportRepository;

/// Persistence gateway contract.
#[async_trait]
pub trait ClinicalStore: Send + Sync {
    /// Resolve a patient identity to an id, creating the row on first sight.
    async fn find_or_create_patient(&self, details: &PatientDetails) -> StoreResult<Uuid>;

    /// Insert one report referencing the patient; never updates.
    async fn save_report(
        &self,
        report: &ClinicalReport,
        patient_id: Uuid,
        clinician: &Clinician,
    ) -> StoreResult<Uuid>;

    async fn get_report(&self, id: Uuid) -> StoreResult<Option<StoredReport>>;

    async fn list_reports(&self, filter: &ReportFilter) -> StoreResult<Vec<StoredReport>>;

    async fn analytics_summary(&self) -> StoreResult<AnalyticsSummary>;

    /// Readiness probe; failures are reported, not raised.
    async fn is_healthy(&self) -> bool;
}

/// PostgreSQL-backed store composing the repositories over one shared pool.
#[derive(Clone)]
pub struct PgClinicalStore {
    pool: StorePool,
    patients: PatientRepository,
    reports: ReportRepository,
    analytics: AnalyticsRepository,
}

impl PgClinicalStore {
    pub fn new(pool: StorePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            patients: PatientRepository::new(pg.clone()),
            reports: ReportRepository::new(pg.clone()),
            analytics: AnalyticsRepository::new(pg),
            pool,
        }
    }

    /// Connect and make sure the schema exists.
    pub async fn connect(connection_string: &str) -> StoreResult<Self> {
        let pool = StorePool::new(connection_string).await?;
        pool.ensure_schema().await?;
        Ok(Self::new(pool))
    }

    pub fn patients(&self) -> &PatientRepository {
        &self.patients
    }

    pub fn reports(&self) -> &ReportRepository {
        &self.reports
    }
}

#[async_trait]
impl ClinicalStore for PgClinicalStore {
    async fn find_or_create_patient(&self, details: &PatientDetails) -> StoreResult<Uuid> {
        self.patients.find_or_create(details).await
    }

    async fn save_report(
        &self,
        report: &ClinicalReport,
        patient_id: Uuid,
        clinician: &Clinician,
    ) -> StoreResult<Uuid> {
        self.reports.save(report, patient_id, clinician).await
    }

    async fn get_report(&self, id: Uuid) -> StoreResult<Option<StoredReport>> {
        self.reports.get(id).await
    }

    async fn list_reports(&self, filter: &ReportFilter) -> StoreResult<Vec<StoredReport>> {
        self.reports.list(filter).await
    }

    async fn analytics_summary(&self) -> StoreResult<AnalyticsSummary> {
        self.analytics.summary().await
    }

    async fn is_healthy(&self) -> bool {
        self.pool.is_healthy().await
    }
}
