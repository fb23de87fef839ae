//! Patient identity repository.
//!
//! Find-or-create is deliberately not a single atomic statement: lookup and
//! insert are separate round trips, and two workers seeing the same unseen
//! identity can both reach the insert. The `patients_identity_key` unique
//! constraint turns the loser's insert into a conflict, which is handled as
//! "already exists, re-fetch" with exactly one retry.

use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use report_schema::PatientDetails;

use crate::error::{StoreError, StoreResult};
use crate::models::{sex_code, PatientIdentity, PatientRecord};

/// Repository for patient identity operations
#[derive(Clone)]
pub struct PatientRepository {
    pool: PgPool,
}

impl PatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the id of the patient matching this identity, creating the row
    /// on first sight. Patients are immutable from this pipeline: a second
    /// report about a known identity never updates the stored row.
    ///
    /// # Errors
    ///
    /// `Conflict` only when the post-conflict re-fetch also finds nothing,
    /// which means something outside this pipeline deleted the row mid-race.
    pub async fn find_or_create(&self, details: &PatientDetails) -> StoreResult<Uuid> {
        let identity = PatientIdentity::of(details);

        if let Some(existing) = self.find(&identity).await? {
            debug!(patient_id = %existing, "patient identity already known");
            return Ok(existing);
        }

        if let Some(created) = self.try_insert(details).await? {
            info!(patient_id = %created, "patient created");
            return Ok(created);
        }

        // Lost the insert race; the winner's row must be visible now.
        match self.find(&identity).await? {
            Some(existing) => {
                debug!(patient_id = %existing, "patient insert conflict, re-fetched");
                Ok(existing)
            }
            None => Err(StoreError::Conflict(
                "patient insert conflicted but identity not found on re-fetch".to_string(),
            )),
        }
    }

    pub async fn get(&self, id: Uuid) -> StoreResult<Option<PatientRecord>> {
        let patient = sqlx::query_as::<_, PatientRecord>(
            r#"
            SELECT id, first_name, last_name, sex, age, birth_date,
                   birth_place, residence, created_at
            FROM patients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    async fn find(&self, identity: &PatientIdentity) -> StoreResult<Option<Uuid>> {
        let id: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM patients
            WHERE first_name IS NOT DISTINCT FROM $1
              AND last_name IS NOT DISTINCT FROM $2
              AND birth_date IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(identity.first_name.as_deref())
        .bind(identity.last_name.as_deref())
        .bind(identity.birth_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(|(id,)| id))
    }

    /// Insert the patient, yielding `None` when a concurrent insert of the
    /// same identity won the race.
    async fn try_insert(&self, details: &PatientDetails) -> StoreResult<Option<Uuid>> {
        let age = details.age.map(i32::from);
        let id: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO patients (first_name, last_name, sex, age, birth_date,
                                  birth_place, residence)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT ON CONSTRAINT patients_identity_key DO NOTHING
            RETURNING id
            "#,
        )
        .bind(details.first_name.as_deref())
        .bind(details.last_name.as_deref())
        .bind(sex_code(details.sex))
        .bind(age)
        .bind(details.birth_date)
        .bind(details.birth_place.as_deref())
        .bind(details.residence.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(|(id,)| id))
    }
}
