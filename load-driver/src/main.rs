//! Concurrent load driver for the VoiceTriage pipeline.
//!
//! Fires a fixed number of synthetic submissions at a running triage server
//! through a bounded worker pool. Per-task failures are caught and logged;
//! one task never cancels or blocks the others. With `--database-url` set,
//! each successful record is additionally persisted directly, bypassing the
//! server's own write: two independent persistence paths then exist, and
//! both report ids are logged so they are never double-counted.

mod client;
mod narrative;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use clinical_store::{ClinicalStore, Clinician, PgClinicalStore};
use report_schema::ExitCode;

use crate::client::{ClientError, TriageClient};
use crate::narrative::{GeneratedCase, NarrativeGenerator};

#[derive(Parser, Debug)]
#[command(name = "load-driver", version, about = "Parallel synthetic submissions against a triage server")]
struct Args {
    /// Triage server base URL
    #[arg(long, env = "TRIAGE_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    /// Number of submissions to run
    #[arg(long, short = 'n', default_value_t = 20)]
    count: usize,

    /// Worker pool bound
    #[arg(long, short = 'c', default_value_t = 4)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Share of red-code cases, 0-100
    #[arg(long, default_value_t = 25)]
    red_percent: u8,

    /// Seed for reproducible narrative generation
    #[arg(long)]
    seed: Option<u64>,

    /// When set, successful records are persisted directly as well,
    /// exercising the second write path
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Clinician attribution carried on submitted reports
    #[arg(long, default_value = "load-driver")]
    clinician_name: String,
}

#[derive(Debug, Clone, Copy)]
enum CaseOutcome {
    Completed { alert_sent: bool, direct_write: bool },
    ExtractionFailed,
    SubmissionFailed,
}

#[derive(Debug, Default)]
struct RunSummary {
    completed: usize,
    extraction_failed: usize,
    submission_failed: usize,
    alerts_sent: usize,
    direct_writes: usize,
    red_generated: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.concurrency == 0 {
        anyhow::bail!("--concurrency must be at least 1");
    }

    let client = TriageClient::new(&args.endpoint, Duration::from_secs(args.timeout_secs))
        .context("building HTTP client")?;

    let store: Option<Arc<PgClinicalStore>> = match &args.database_url {
        Some(url) => {
            let store = PgClinicalStore::connect(url)
                .await
                .context("connecting the direct-persistence store")?;
            info!("direct persistence enabled, records will be written twice");
            Some(Arc::new(store))
        }
        None => None,
    };

    let generator = NarrativeGenerator::new(args.red_percent);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        endpoint = %args.endpoint,
        count = args.count,
        concurrency = args.concurrency,
        "load run started"
    );

    let semaphore = Arc::new(Semaphore::new(args.concurrency));
    let mut tasks = JoinSet::new();
    let mut summary = RunSummary::default();

    for index in 0..args.count {
        let case = generator.generate(&mut rng);
        if case.severity == ExitCode::Red {
            summary.red_generated = summary.red_generated.saturating_add(1);
        }

        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .context("worker pool semaphore closed")?;
        let client = client.clone();
        let store = store.clone();
        let clinician_name = args.clinician_name.clone();

        tasks.spawn(async move {
            let _permit = permit;
            run_case(&client, store.as_deref(), &case, &clinician_name, index).await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(CaseOutcome::Completed {
                alert_sent,
                direct_write,
            }) => {
                summary.completed = summary.completed.saturating_add(1);
                if alert_sent {
                    summary.alerts_sent = summary.alerts_sent.saturating_add(1);
                }
                if direct_write {
                    summary.direct_writes = summary.direct_writes.saturating_add(1);
                }
            }
            Ok(CaseOutcome::ExtractionFailed) => {
                summary.extraction_failed = summary.extraction_failed.saturating_add(1);
            }
            Ok(CaseOutcome::SubmissionFailed) => {
                summary.submission_failed = summary.submission_failed.saturating_add(1);
            }
            Err(e) => {
                error!(error = %e, "submission task panicked");
                summary.submission_failed = summary.submission_failed.saturating_add(1);
            }
        }
    }

    info!(
        completed = summary.completed,
        extraction_failed = summary.extraction_failed,
        submission_failed = summary.submission_failed,
        alerts_sent = summary.alerts_sent,
        direct_writes = summary.direct_writes,
        red_generated = summary.red_generated,
        "load run finished"
    );

    Ok(())
}

/// One simulated submission; every failure is caught here so the outcome is
/// always reported and no task takes down another.
async fn run_case(
    client: &TriageClient,
    store: Option<&PgClinicalStore>,
    case: &GeneratedCase,
    clinician_name: &str,
    index: usize,
) -> CaseOutcome {
    let outcome = match client
        .submit_transcript(&case.narrative, clinician_name)
        .await
    {
        Ok(outcome) => outcome,
        Err(ClientError::Network(e)) => {
            warn!(case = index, error = %e, "submission transport failure");
            return CaseOutcome::SubmissionFailed;
        }
        Err(ClientError::Rejected(detail)) => {
            warn!(case = index, detail = %detail, "submission rejected");
            return CaseOutcome::SubmissionFailed;
        }
    };

    if let Some(failure) = &outcome.extraction_error {
        info!(
            case = index,
            category = %failure.error,
            detail = %failure.detail,
            "extraction failed, transcript was still returned"
        );
        return CaseOutcome::ExtractionFailed;
    }

    let Some(record) = &outcome.record else {
        warn!(case = index, "completed response carried no record");
        return CaseOutcome::SubmissionFailed;
    };

    let mut direct_write = false;
    if let Some(store) = store {
        match persist_directly(store, record, clinician_name).await {
            Ok((patient_id, direct_report_id)) => {
                direct_write = true;
                info!(
                    case = index,
                    server_report_id = ?outcome.report_id,
                    direct_report_id = %direct_report_id,
                    patient_id = %patient_id,
                    "record persisted on both write paths"
                );
            }
            Err(e) => {
                warn!(case = index, error = %e, "direct persistence failed");
            }
        }
    }

    CaseOutcome::Completed {
        alert_sent: outcome.alert_sent,
        direct_write,
    }
}

async fn persist_directly(
    store: &PgClinicalStore,
    record: &report_schema::ClinicalReport,
    clinician_name: &str,
) -> clinical_store::StoreResult<(uuid::Uuid, uuid::Uuid)> {
    let clinician = Clinician {
        id: None,
        name: Some(format!("{}-direct", clinician_name)),
    };
    let patient_id = store.find_or_create_patient(&record.patient).await?;
    let report_id = store.save_report(record, patient_id, &clinician).await?;
    Ok((patient_id, report_id))
}
