//! Persistence gateway for VoiceTriage.
//!
//! Two collections back the pipeline: patients, unique on the
//! (first name, last name, birth date) identity key, and insert-only reports
//! referencing a patient id. The find-or-create race under concurrent
//! submissions is resolved by the identity uniqueness constraint, with an
//! insert conflict treated as "already exists, re-fetch" rather than a
//! failure. The [`ClinicalStore`] trait is the seam the orchestrator and the
//! load driver depend on.

pub mod analytics;
pub mod connection;
pub mod error;
pub mod models;
pub mod patients;
pub mod reports;
pub mod store;

pub use analytics::AnalyticsRepository;
pub use connection::StorePool;
pub use error::*;
pub use models::*;
pub use patients::PatientRepository;
pub use reports::ReportRepository;
pub use store::{ClinicalStore, PgClinicalStore};
