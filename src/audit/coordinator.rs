//! Drives audit runs against the collaborator ports.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use super::tracker::{AuditState, AuditTracker, TriggerId};
use crate::error::{AuditError, AuditResult};
use crate::models::AuditOutcome;
use crate::sources::{ExportReceipt, ExportSink, ProfileSource, RosterSolver};

/// Owns the tracker and the collaborators of a running service.
///
/// Both collaborator requests of a run are issued concurrently; each response
/// is handed to the tracker as soon as it resolves, so a newer run always
/// wins over a slower older one.
pub struct AuditCoordinator {
    tracker: Mutex<AuditTracker>,
    profiles: Arc<dyn ProfileSource>,
    solver: Arc<dyn RosterSolver>,
    exporter: Arc<dyn ExportSink>,
}

impl AuditCoordinator {
    /// Creates a coordinator around an idle tracker.
    pub fn new(
        tracker: AuditTracker,
        profiles: Arc<dyn ProfileSource>,
        solver: Arc<dyn RosterSolver>,
        exporter: Arc<dyn ExportSink>,
    ) -> Self {
        Self {
            tracker: Mutex::new(tracker),
            profiles,
            solver,
            exporter,
        }
    }

    /// Triggers a run and waits for both legs to resolve.
    ///
    /// Returns the trigger and the state afterwards. When a newer run was
    /// triggered in the meantime, the returned state belongs to that run.
    pub async fn run(&self) -> (TriggerId, AuditState) {
        let started = Instant::now();
        let trigger = self.tracker.lock().await.trigger();

        let profile_leg = async {
            let result = self.profiles.fetch_profiles().await;
            self.tracker
                .lock()
                .await
                .resolve_profiles(trigger, result, Utc::now())
        };
        let solver_leg = async {
            let result = self.solver.generate().await;
            self.tracker
                .lock()
                .await
                .resolve_solver(trigger, result, Utc::now())
        };
        tokio::join!(profile_leg, solver_leg);

        let state = self.state().await;
        info!(
            %trigger,
            duration_us = started.elapsed().as_micros() as u64,
            "Audit run finished"
        );
        (trigger, state)
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> AuditState {
        self.tracker.lock().await.state().clone()
    }

    /// Exports the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::NothingToExport`] unless the latest run settled
    /// with a valid roster; otherwise whatever the sink reports.
    pub async fn export_latest(&self) -> AuditResult<ExportReceipt> {
        let outcome: Arc<AuditOutcome> = self
            .state()
            .await
            .outcome()
            .cloned()
            .ok_or(AuditError::NothingToExport)?;
        let snapshot = outcome.snapshot().ok_or(AuditError::NothingToExport)?;
        self.exporter.export(snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::SynthesisContext;
    use crate::models::{
        AuditSnapshot, CYCLE_DAYS, RosterBranding, ShiftAssignmentDay, SolverResponse,
        StaffAnalytics, StaffProfile,
    };
    use crate::synthesis::CycleCalendar;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use chrono_tz::Australia::Melbourne;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProfiles(Vec<StaffProfile>);

    #[async_trait]
    impl ProfileSource for FixedProfiles {
        async fn fetch_profiles(&self) -> AuditResult<Vec<StaffProfile>> {
            Ok(self.0.clone())
        }
    }

    struct FixedSolver(AuditResult<SolverResponse>);

    #[async_trait]
    impl RosterSolver for FixedSolver {
        async fn generate(&self) -> AuditResult<SolverResponse> {
            match &self.0 {
                Ok(response) => Ok(response.clone()),
                Err(_) => Err(AuditError::Transport {
                    collaborator: "roster solver".to_string(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct CountingSink(AtomicUsize);

    #[async_trait]
    impl ExportSink for CountingSink {
        async fn export(&self, snapshot: &AuditSnapshot) -> AuditResult<ExportReceipt> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(ExportReceipt {
                run_id: snapshot.run_id,
                location: "memory".to_string(),
                bytes: 0,
            })
        }
    }

    fn tracker() -> AuditTracker {
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        AuditTracker::new(SynthesisContext::new(
            CycleCalendar::new(start, Melbourne).unwrap(),
            RosterBranding {
                organisation: "Austin Health".to_string(),
                ward: "Ward A".to_string(),
            },
        ))
    }

    fn coordinator(solver: AuditResult<SolverResponse>, sink: Arc<CountingSink>) -> AuditCoordinator {
        AuditCoordinator::new(
            tracker(),
            Arc::new(FixedProfiles(vec![StaffProfile::named("Amy")])),
            Arc::new(FixedSolver(solver)),
            sink,
        )
    }

    fn valid_response() -> SolverResponse {
        let mut roster = vec![ShiftAssignmentDay::default(); CYCLE_DAYS];
        roster[0].nd.push("Amy".to_string());
        SolverResponse::valid(roster, vec![StaffAnalytics::compliant("Amy")])
    }

    #[tokio::test]
    async fn test_run_settles_valid_outcome() {
        let coordinator = coordinator(Ok(valid_response()), Arc::default());
        assert_eq!(coordinator.state().await, AuditState::Idle);

        let (trigger, state) = coordinator.run().await;
        match state {
            AuditState::Settled { trigger: settled, outcome } => {
                assert_eq!(settled, trigger);
                assert_eq!(outcome.snapshot().unwrap().rows.len(), 1);
            }
            other => panic!("Expected settled state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_settles_transport_error() {
        let failure = Err(AuditError::NothingToExport);
        let coordinator = coordinator(failure, Arc::default());
        let (_, state) = coordinator.run().await;
        assert!(matches!(
            state.outcome().map(|o| o.as_ref()),
            Some(AuditOutcome::TransportError { .. })
        ));
    }

    #[tokio::test]
    async fn test_export_requires_valid_snapshot() {
        let sink = Arc::new(CountingSink::default());
        let coordinator = coordinator(
            Ok(SolverResponse::rejected("infeasible", "No roster")),
            Arc::clone(&sink),
        );

        assert!(matches!(
            coordinator.export_latest().await,
            Err(AuditError::NothingToExport)
        ));
        coordinator.run().await;
        assert!(matches!(
            coordinator.export_latest().await,
            Err(AuditError::NothingToExport)
        ));
        assert_eq!(sink.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_export_after_valid_run() {
        let sink = Arc::new(CountingSink::default());
        let coordinator = coordinator(Ok(valid_response()), Arc::clone(&sink));

        let (_, state) = coordinator.run().await;
        let run_id = state.outcome().and_then(|o| o.snapshot()).unwrap().run_id;

        let receipt = coordinator.export_latest().await.unwrap();
        assert_eq!(receipt.run_id, run_id);
        assert_eq!(sink.0.load(Ordering::SeqCst), 1);
    }
}
