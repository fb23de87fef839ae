/// Tests for the pipeline orchestrator
///
/// Tests cover:
/// - Critical-alert guarantee: one publish attempt per Red-code record
/// - Best-effort alerting: a down broker never blocks persistence
/// - Partial-success transcript guarantee on extraction failure
/// - Identity idempotence under concurrent identical submissions
/// - HTTP surface smoke checks over the app router
///
/// Note: every collaborator is a hand-written double behind its seam trait;
/// no network, database or broker involved.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tower::ServiceExt as _;
    use uuid::Uuid;

    use alert_bus::{AlertError, AlertPublisher, AlertResult, CriticalAlert};
    use clinical_store::{
        AnalyticsSummary, ClinicalStore, Clinician, InterventionUsage, PatientIdentity,
        ReportFilter, StoreResult, StoredReport,
    };
    use extraction_service::{ExtractionConfig, ExtractionService, ModelProvider};
    use report_schema::{ClinicalReport, ExitCode, PatientDetails};
    use transcription_service::{SpeechProvider, TranscriptionConfig, TranscriptionService};
    use triage_server::{create_app, PipelineStage, ServerConfig, TerminalState, TriageServer};

    const RED_CODE_RESPONSE: &str = r#"{
      "callInfo": {
        "callDate": "2026-03-02",
        "location": "Piazza Maggiore, Bologna",
        "reportedCondition": "arresto cardiaco",
        "exitCode": { "red": true }
      },
      "patient": { "firstName": "Mario", "lastName": "Rossi", "sex": "M", "age": 45 }
    }"#;

    const GREEN_CODE_RESPONSE: &str = r#"{
      "callInfo": { "exitCode": { "green": true } },
      "patient": { "firstName": "Anna", "lastName": "Bianchi", "sex": "F" }
    }"#;

    // =========================================================================
    // DOUBLES
    // =========================================================================

    /// Records every publish attempt; optionally fails them all.
    struct ProbePublisher {
        published: Mutex<Vec<CriticalAlert>>,
        attempts: AtomicUsize,
        broker_down: bool,
    }

    impl ProbePublisher {
        fn up() -> Arc<Self> {
            Arc::new(Self {
                published: Mutex::new(Vec::new()),
                attempts: AtomicUsize::new(0),
                broker_down: false,
            })
        }

        fn down() -> Arc<Self> {
            Arc::new(Self {
                published: Mutex::new(Vec::new()),
                attempts: AtomicUsize::new(0),
                broker_down: true,
            })
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        fn published(&self) -> Vec<CriticalAlert> {
            self.published.lock().expect("publisher lock").clone()
        }
    }

    #[async_trait]
    impl AlertPublisher for ProbePublisher {
        async fn publish(&self, alert: &CriticalAlert) -> AlertResult<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.broker_down {
                return Err(AlertError::Config("broker unreachable".to_string()));
            }
            self.published
                .lock()
                .expect("publisher lock")
                .push(alert.clone());
            Ok(())
        }

        async fn check(&self) -> AlertResult<()> {
            if self.broker_down {
                return Err(AlertError::Config("broker unreachable".to_string()));
            }
            Ok(())
        }
    }

    /// In-memory store honoring the identity-idempotence contract.
    #[derive(Default)]
    struct MemoryStore {
        inner: Mutex<MemoryState>,
    }

    #[derive(Default)]
    struct MemoryState {
        patients: HashMap<Uuid, PatientDetails>,
        reports: Vec<(Uuid, Uuid, ClinicalReport, Clinician)>,
    }

    impl MemoryStore {
        fn patient_count(&self) -> usize {
            self.inner.lock().expect("store lock").patients.len()
        }

        fn report_patient_ids(&self) -> Vec<Uuid> {
            self.inner
                .lock()
                .expect("store lock")
                .reports
                .iter()
                .map(|(_, patient_id, _, _)| *patient_id)
                .collect()
        }
    }

    #[async_trait]
    impl ClinicalStore for MemoryStore {
        async fn find_or_create_patient(&self, details: &PatientDetails) -> StoreResult<Uuid> {
            let identity = PatientIdentity::of(details);
            let mut state = self.inner.lock().expect("store lock");
            for (id, known) in &state.patients {
                if PatientIdentity::of(known) == identity {
                    return Ok(*id);
                }
            }
            let id = Uuid::new_v4();
            state.patients.insert(id, details.clone());
            Ok(id)
        }

        async fn save_report(
            &self,
            report: &ClinicalReport,
            patient_id: Uuid,
            clinician: &Clinician,
        ) -> StoreResult<Uuid> {
            let id = Uuid::new_v4();
            self.inner.lock().expect("store lock").reports.push((
                id,
                patient_id,
                report.clone(),
                clinician.clone(),
            ));
            Ok(id)
        }

        async fn get_report(&self, _id: Uuid) -> StoreResult<Option<StoredReport>> {
            Ok(None)
        }

        async fn list_reports(&self, _filter: &ReportFilter) -> StoreResult<Vec<StoredReport>> {
            Ok(Vec::new())
        }

        async fn analytics_summary(&self) -> StoreResult<AnalyticsSummary> {
            let state = self.inner.lock().expect("store lock");
            Ok(AnalyticsSummary {
                total_reports: state.reports.len() as i64,
                by_exit_code: Vec::new(),
                by_clinician: Vec::new(),
                by_call_year: Vec::new(),
                interventions: InterventionUsage::default(),
                deceased_percentage: 0.0,
            })
        }

        async fn is_healthy(&self) -> bool {
            true
        }
    }

    fn server_with(
        model_response: &str,
        store: Arc<MemoryStore>,
        alerts: Option<Arc<ProbePublisher>>,
    ) -> TriageServer {
        let transcription = TranscriptionService::new(&TranscriptionConfig {
            provider: SpeechProvider::Mock { transcript: None },
            timeout_secs: 5,
        })
        .expect("mock transcription must build");

        let extraction = ExtractionService::new(&ExtractionConfig {
            provider: ModelProvider::Mock {
                response: Some(model_response.to_string()),
            },
            timeout_secs: 5,
        })
        .expect("mock extraction must build");

        TriageServer::with_collaborators(
            ServerConfig::default(),
            store,
            Arc::new(transcription),
            Arc::new(extraction),
            alerts.map(|p| p as Arc<dyn AlertPublisher>),
        )
    }

    // =========================================================================
    // PIPELINE TESTS
    // =========================================================================

    #[tokio::test]
    async fn test_red_code_publishes_alert_and_persists() {
        let store = Arc::new(MemoryStore::default());
        let publisher = ProbePublisher::up();
        let server = server_with(RED_CODE_RESPONSE, Arc::clone(&store), Some(Arc::clone(&publisher)));

        let outcome = server
            .run_transcript(
                "Paziente Mario Rossi, maschio, 45 anni, codice rosso, arresto cardiaco"
                    .to_string(),
                &Clinician::default(),
            )
            .await;

        assert_eq!(outcome.state, TerminalState::Completed);
        assert!(outcome.alert_sent);
        assert!(outcome.report_id.is_some());
        assert!(outcome.patient_id.is_some());

        let record = outcome.record.expect("record must be present");
        assert_eq!(record.call_info.exit_code.selected(), Some(ExitCode::Red));

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].patient.first_name, "Mario");
        assert_eq!(published[0].patient.last_name, "Rossi");
        assert_eq!(published[0].location, "Piazza Maggiore, Bologna");
    }

    #[tokio::test]
    async fn test_broker_down_does_not_block_persistence() {
        let store = Arc::new(MemoryStore::default());
        let publisher = ProbePublisher::down();
        let server = server_with(RED_CODE_RESPONSE, Arc::clone(&store), Some(Arc::clone(&publisher)));

        let outcome = server
            .run_transcript("codice rosso".to_string(), &Clinician::default())
            .await;

        // Exactly one publish attempt was made and failed; the report was
        // still persisted and the run completed.
        assert_eq!(publisher.attempts(), 1);
        assert!(!outcome.alert_sent);
        assert!(outcome.report_id.is_some());
        assert_eq!(outcome.state, TerminalState::Completed);
    }

    #[tokio::test]
    async fn test_green_code_skips_alert() {
        let store = Arc::new(MemoryStore::default());
        let publisher = ProbePublisher::up();
        let server = server_with(GREEN_CODE_RESPONSE, store, Some(Arc::clone(&publisher)));

        let outcome = server
            .run_transcript("codice verde".to_string(), &Clinician::default())
            .await;

        assert_eq!(publisher.attempts(), 0);
        assert!(!outcome.alert_sent);
        assert!(outcome.report_id.is_some());
    }

    #[tokio::test]
    async fn test_extraction_failure_still_returns_transcript() {
        let store = Arc::new(MemoryStore::default());
        let server = server_with(
            "I could not find any medical information in this text.",
            Arc::clone(&store),
            Some(ProbePublisher::up()),
        );

        let outcome = server
            .run_transcript("qualcosa di incomprensibile".to_string(), &Clinician::default())
            .await;

        assert_eq!(outcome.transcript, "qualcosa di incomprensibile");
        assert!(outcome.record.is_none());
        assert!(outcome.report_id.is_none());
        assert_eq!(
            outcome.state,
            TerminalState::Failed {
                stage: PipelineStage::Extraction
            }
        );

        let failure = outcome.extraction_error.expect("typed failure expected");
        assert_eq!(failure.error, "malformedPayload");
        assert!(failure
            .raw_output
            .as_deref()
            .expect("raw output attached")
            .contains("medical information"));
        assert_eq!(store.patient_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_identical_identity_creates_one_patient() {
        let store = Arc::new(MemoryStore::default());
        let server = server_with(RED_CODE_RESPONSE, Arc::clone(&store), None);

        let first = {
            let server = server.clone();
            tokio::spawn(async move {
                server
                    .run_transcript("codice rosso".to_string(), &Clinician::default())
                    .await
            })
        };
        let second = {
            let server = server.clone();
            tokio::spawn(async move {
                server
                    .run_transcript("codice rosso".to_string(), &Clinician::default())
                    .await
            })
        };

        let first = first.await.expect("task must not panic");
        let second = second.await.expect("task must not panic");

        assert!(first.report_id.is_some());
        assert!(second.report_id.is_some());
        assert_eq!(store.patient_count(), 1);

        let patient_ids = store.report_patient_ids();
        assert_eq!(patient_ids.len(), 2);
        assert_eq!(patient_ids[0], patient_ids[1]);
    }

    #[tokio::test]
    async fn test_audio_path_runs_full_pipeline() {
        let store = Arc::new(MemoryStore::default());
        let publisher = ProbePublisher::up();
        let server = server_with(RED_CODE_RESPONSE, store, Some(Arc::clone(&publisher)));

        let outcome = server
            .run_audio(b"fake wav bytes", "case.wav", &Clinician::default())
            .await
            .expect("mock transcription must succeed");

        assert!(!outcome.transcript.is_empty());
        assert!(outcome.alert_sent);
        assert_eq!(publisher.attempts(), 1);
    }

    // =========================================================================
    // HTTP SURFACE TESTS
    // =========================================================================

    #[tokio::test]
    async fn test_health_endpoint_responds() {
        let server = server_with(GREEN_CODE_RESPONSE, Arc::new(MemoryStore::default()), None);
        let app = create_app(server);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .expect("request must build"),
            )
            .await
            .expect("app must respond");

        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_report_returns_404() {
        let server = server_with(GREEN_CODE_RESPONSE, Arc::new(MemoryStore::default()), None);
        let app = create_app(server);

        let uri = format!("/api/v1/reports/{}", Uuid::new_v4());
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(axum::body::Body::empty())
                    .expect("request must build"),
            )
            .await
            .expect("app must respond");

        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
