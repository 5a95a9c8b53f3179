//! Audit-run lifecycle state machine.
//!
//! `idle → loading → settled`, where a settled run holds one of the three
//! outcome shapes. Every trigger restarts the machine and discards the
//! previous outcome; responses are accepted only for the most recent trigger.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::outcome::{SynthesisContext, build_outcome};
use crate::error::AuditResult;
use crate::models::{AuditOutcome, SolverResponse, StaffProfile};

/// Message shown when a collaborator cannot be reached.
pub const BACKEND_UNREACHABLE: &str = "Backend unreachable";

/// Identifies one trigger of an audit run. Later triggers compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerId(u64);

impl TriggerId {
    /// The raw sequence number.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Externally visible lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum AuditState {
    /// No run has been triggered yet.
    Idle,
    /// A run is waiting for one or both collaborator legs.
    Loading {
        /// The run being waited on.
        trigger: TriggerId,
    },
    /// The latest run has settled.
    Settled {
        /// The run that settled.
        trigger: TriggerId,
        /// Its outcome; replaced wholesale by the next run.
        outcome: Arc<AuditOutcome>,
    },
}

impl AuditState {
    /// The outcome of a settled run.
    pub fn outcome(&self) -> Option<&Arc<AuditOutcome>> {
        match self {
            AuditState::Settled { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

/// What happened to a resolved leg.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The response belongs to an older trigger, or the run already settled.
    Dropped,
    /// Accepted; still waiting for the other leg.
    Waiting,
    /// Accepted and the run settled.
    Settled(Arc<AuditOutcome>),
}

/// Tracks the current audit run and settles it once both legs are in.
#[derive(Debug)]
pub struct AuditTracker {
    context: SynthesisContext,
    last_trigger: u64,
    state: AuditState,
    profiles: Option<Vec<StaffProfile>>,
    response: Option<SolverResponse>,
}

impl AuditTracker {
    /// Creates an idle tracker.
    pub fn new(context: SynthesisContext) -> Self {
        Self {
            context,
            last_trigger: 0,
            state: AuditState::Idle,
            profiles: None,
            response: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AuditState {
        &self.state
    }

    /// Calendar and branding used for synthesis.
    pub fn context(&self) -> &SynthesisContext {
        &self.context
    }

    /// Starts a new run, discarding the previous outcome and any pending leg.
    pub fn trigger(&mut self) -> TriggerId {
        self.last_trigger += 1;
        let trigger = TriggerId(self.last_trigger);
        self.profiles = None;
        self.response = None;
        self.state = AuditState::Loading { trigger };
        debug!(%trigger, "Audit run triggered");
        trigger
    }

    /// Feeds the profile leg of `trigger`.
    pub fn resolve_profiles(
        &mut self,
        trigger: TriggerId,
        result: AuditResult<Vec<StaffProfile>>,
        now: DateTime<Utc>,
    ) -> Resolution {
        if !self.accepts(trigger, "profiles") {
            return Resolution::Dropped;
        }
        match result {
            Ok(profiles) => {
                self.profiles = Some(profiles);
                self.try_settle(trigger, now)
            }
            Err(error) => self.settle_transport_error(trigger, &error),
        }
    }

    /// Feeds the solver leg of `trigger`.
    pub fn resolve_solver(
        &mut self,
        trigger: TriggerId,
        result: AuditResult<SolverResponse>,
        now: DateTime<Utc>,
    ) -> Resolution {
        if !self.accepts(trigger, "solver") {
            return Resolution::Dropped;
        }
        match result {
            Ok(response) => {
                self.response = Some(response);
                self.try_settle(trigger, now)
            }
            Err(error) => self.settle_transport_error(trigger, &error),
        }
    }

    fn accepts(&self, trigger: TriggerId, leg: &str) -> bool {
        match self.state {
            AuditState::Loading { trigger: current } if current == trigger => true,
            _ => {
                debug!(%trigger, leg, state = ?self.state, "Dropping stale response");
                false
            }
        }
    }

    fn try_settle(&mut self, trigger: TriggerId, now: DateTime<Utc>) -> Resolution {
        let (Some(profiles), Some(response)) = (self.profiles.as_ref(), self.response.as_ref())
        else {
            return Resolution::Waiting;
        };

        let outcome = Arc::new(build_outcome(profiles, response, &self.context, now));
        self.settle(trigger, outcome)
    }

    fn settle_transport_error(
        &mut self,
        trigger: TriggerId,
        failure: &crate::error::AuditError,
    ) -> Resolution {
        if failure.is_transport() {
            warn!(%trigger, error = %failure, "Audit run failed to reach a collaborator");
        } else {
            error!(%trigger, error = %failure, "Audit run failed inside a collaborator");
        }
        let outcome = Arc::new(AuditOutcome::TransportError {
            message: BACKEND_UNREACHABLE.to_string(),
        });
        self.settle(trigger, outcome)
    }

    fn settle(&mut self, trigger: TriggerId, outcome: Arc<AuditOutcome>) -> Resolution {
        self.profiles = None;
        self.response = None;
        info!(
            %trigger,
            valid = outcome.snapshot().is_some(),
            "Audit run settled"
        );
        self.state = AuditState::Settled {
            trigger,
            outcome: Arc::clone(&outcome),
        };
        Resolution::Settled(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;
    use crate::models::{CYCLE_DAYS, RosterBranding, ShiftAssignmentDay, StaffAnalytics};
    use crate::synthesis::CycleCalendar;
    use chrono::NaiveDate;
    use chrono_tz::Australia::Melbourne;

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

    fn response_with(name: &str) -> SolverResponse {
        let mut roster = vec![ShiftAssignmentDay::default(); CYCLE_DAYS];
        roster[0].am.push(name.to_string());
        SolverResponse::valid(roster, vec![StaffAnalytics::compliant(name)])
    }

    fn unreachable() -> AuditError {
        AuditError::Transport {
            collaborator: "roster solver".to_string(),
            message: "connection refused".to_string(),
        }
    }

    fn row_names(resolution: &Resolution) -> Vec<String> {
        match resolution {
            Resolution::Settled(outcome) => outcome
                .snapshot()
                .map(|s| s.rows.iter().map(|r| r.name.clone()).collect())
                .unwrap_or_default(),
            other => panic!("Expected a settled run, got {other:?}"),
        }
    }

    #[test]
    fn test_starts_idle() {
        assert_eq!(tracker().state(), &AuditState::Idle);
    }

    #[test]
    fn test_trigger_moves_to_loading() {
        let mut tracker = tracker();
        let first = tracker.trigger();
        let second = tracker.trigger();
        assert!(second > first);
        assert_eq!(tracker.state(), &AuditState::Loading { trigger: second });
    }

    #[test]
    fn test_settles_only_after_both_legs() {
        let mut tracker = tracker();
        let trigger = tracker.trigger();

        let first = tracker.resolve_solver(trigger, Ok(response_with("Amy")), Utc::now());
        assert_eq!(first, Resolution::Waiting);
        assert_eq!(tracker.state(), &AuditState::Loading { trigger });

        let second = tracker.resolve_profiles(trigger, Ok(vec![]), Utc::now());
        assert_eq!(row_names(&second), vec!["Amy"]);
        assert!(tracker.state().outcome().is_some());
    }

    #[test]
    fn test_legs_resolve_in_either_order() {
        let mut tracker = tracker();
        let trigger = tracker.trigger();

        let profiles = vec![StaffProfile::named("Bo")];
        assert_eq!(
            tracker.resolve_profiles(trigger, Ok(profiles), Utc::now()),
            Resolution::Waiting
        );
        let settled = tracker.resolve_solver(trigger, Ok(response_with("Amy")), Utc::now());
        assert_eq!(row_names(&settled), vec!["Amy", "Bo"]);
    }

    #[test]
    fn test_stale_responses_are_dropped() {
        let mut tracker = tracker();
        let stale = tracker.trigger();
        let current = tracker.trigger();

        assert_eq!(
            tracker.resolve_solver(stale, Ok(response_with("Old")), Utc::now()),
            Resolution::Dropped
        );
        assert_eq!(
            tracker.resolve_profiles(stale, Ok(vec![]), Utc::now()),
            Resolution::Dropped
        );

        tracker.resolve_profiles(current, Ok(vec![]), Utc::now());
        let settled = tracker.resolve_solver(current, Ok(response_with("New")), Utc::now());
        assert_eq!(row_names(&settled), vec!["New"]);

        // A late response for the old trigger cannot overwrite the new result.
        assert_eq!(
            tracker.resolve_solver(stale, Ok(response_with("Old")), Utc::now()),
            Resolution::Dropped
        );
        match tracker.state() {
            AuditState::Settled { trigger, .. } => assert_eq!(*trigger, current),
            other => panic!("Expected settled state, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_failure_settles_immediately() {
        let mut tracker = tracker();
        let trigger = tracker.trigger();

        let resolution = tracker.resolve_solver(trigger, Err(unreachable()), Utc::now());
        let expected = AuditOutcome::TransportError {
            message: BACKEND_UNREACHABLE.to_string(),
        };
        assert_eq!(resolution, Resolution::Settled(Arc::new(expected)));

        // The other leg arriving later is ignored.
        assert_eq!(
            tracker.resolve_profiles(trigger, Ok(vec![]), Utc::now()),
            Resolution::Dropped
        );
    }

    #[test]
    fn test_non_transport_failure_also_settles_as_unreachable() {
        let mut tracker = tracker();
        let trigger = tracker.trigger();
        let failure = AuditError::ExportFailed {
            message: "disk full".to_string(),
        };
        assert!(!failure.is_transport());

        let resolution = tracker.resolve_profiles(trigger, Err(failure), Utc::now());
        match resolution {
            Resolution::Settled(outcome) => assert_eq!(
                *outcome,
                AuditOutcome::TransportError {
                    message: BACKEND_UNREACHABLE.to_string(),
                }
            ),
            other => panic!("Expected settled resolution, got {other:?}"),
        }
    }

    #[test]
    fn test_new_trigger_discards_previous_outcome() {
        let mut tracker = tracker();
        let first = tracker.trigger();
        tracker.resolve_profiles(first, Ok(vec![]), Utc::now());
        tracker.resolve_solver(first, Ok(response_with("Amy")), Utc::now());
        assert!(tracker.state().outcome().is_some());

        let second = tracker.trigger();
        assert_eq!(tracker.state(), &AuditState::Loading { trigger: second });
        assert!(tracker.state().outcome().is_none());

        // Legs from the first run never leak into the second.
        assert_eq!(
            tracker.resolve_solver(second, Ok(response_with("Zoe")), Utc::now()),
            Resolution::Waiting
        );
    }

    #[test]
    fn test_state_serialization() {
        let mut tracker = tracker();
        let trigger = tracker.trigger();
        let json = serde_json::to_value(tracker.state()).unwrap();
        assert_eq!(json["state"], "loading");
        assert_eq!(json["trigger"], trigger.value());
    }
}
