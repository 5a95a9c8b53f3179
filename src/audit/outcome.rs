//! Builds the settled outcome of one audit run from both collaborator legs.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{
    AuditOutcome, AuditSnapshot, DEFAULT_NO_SOLUTION_MESSAGE, PENDING_APPROVER, RosterBranding,
    RosterHeader, SolverResponse, StaffProfile,
};
use crate::synthesis::{CycleCalendar, annotate, reconcile_reported, synthesize_rows};

/// Everything a synthesis needs besides the collaborator payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisContext {
    /// The active cycle in its reference timezone.
    pub calendar: CycleCalendar,
    /// Organisation and ward names for the banner.
    pub branding: RosterBranding,
}

impl SynthesisContext {
    /// Creates a context from its parts.
    pub fn new(calendar: CycleCalendar, branding: RosterBranding) -> Self {
        Self { calendar, branding }
    }
}

/// Turns a profile list and a solver response into an audit outcome.
///
/// A response whose status is not `valid` settles as
/// [`AuditOutcome::NoSolution`] and no rows are built. Otherwise a fresh
/// snapshot with its own run id is produced.
///
/// # Arguments
///
/// * `profiles` - The profile list resolved for this run
/// * `response` - The solver response resolved for this run
/// * `context` - Calendar and branding
/// * `now` - Snapshot time; also drives the publication date
pub fn build_outcome(
    profiles: &[StaffProfile],
    response: &SolverResponse,
    context: &SynthesisContext,
    now: DateTime<Utc>,
) -> AuditOutcome {
    if !response.is_valid() {
        let message = response
            .message
            .clone()
            .unwrap_or_else(|| DEFAULT_NO_SOLUTION_MESSAGE.to_string());
        info!(status = ?response.status, %message, "Solver found no roster");
        return AuditOutcome::NoSolution { message };
    }

    let rows = synthesize_rows(profiles, response);
    let (rows, compliance) = annotate(rows, response.analytics());
    reconcile_reported(response.compliance.as_ref(), &compliance);

    let snapshot = AuditSnapshot {
        run_id: Uuid::new_v4(),
        generated_at: now,
        header: build_header(profiles, context, now),
        days: context.calendar.days().to_vec(),
        rows,
        compliance,
    };

    debug!(
        run_id = %snapshot.run_id,
        rows = snapshot.rows.len(),
        overall = ?snapshot.compliance.overall,
        "Audit snapshot built"
    );

    AuditOutcome::Valid(snapshot)
}

/// Builds the roster banner.
pub fn build_header(
    profiles: &[StaffProfile],
    context: &SynthesisContext,
    now: DateTime<Utc>,
) -> RosterHeader {
    RosterHeader {
        organisation: context.branding.organisation.clone(),
        ward: context.branding.ward.clone(),
        title: context.calendar.title(),
        published: context.calendar.publication_label(now),
        approved_by: approver(profiles),
    }
}

/// Name of the first profile whose `role` is Nurse Unit Manager, or the
/// pending marker. The legacy `position` field is not consulted.
pub fn approver(profiles: &[StaffProfile]) -> String {
    profiles
        .iter()
        .find(|profile| {
            profile
                .stated_role()
                .is_some_and(|role| role.is_unit_manager())
        })
        .map(|profile| profile.name.clone())
        .unwrap_or_else(|| PENDING_APPROVER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        OverallCompliance, RowStatus, ShiftAssignmentDay, ShiftCode, StaffAnalytics, CYCLE_DAYS,
    };
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Australia::Melbourne;

    fn context() -> SynthesisContext {
        let start = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        SynthesisContext::new(
            CycleCalendar::new(start, Melbourne).unwrap(),
            RosterBranding {
                organisation: "Austin Health".to_string(),
                ward: "Ward A".to_string(),
            },
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 14, 30, 0).unwrap()
    }

    fn manager(name: &str) -> StaffProfile {
        StaffProfile {
            role: Some("num".to_string()),
            ..StaffProfile::named(name)
        }
    }

    #[test]
    fn test_valid_response_builds_snapshot() {
        let mut roster = vec![ShiftAssignmentDay::default(); CYCLE_DAYS];
        roster[0].am.push("Amy".to_string());
        roster[1].nd.push("Zoe".to_string());
        let response = SolverResponse::valid(
            roster,
            vec![
                StaffAnalytics::compliant("Amy"),
                StaffAnalytics::non_compliant("Zoe", vec![]),
            ],
        );

        let outcome = build_outcome(&[StaffProfile::named("Amy")], &response, &context(), now());
        let snapshot = outcome.snapshot().unwrap();

        assert_eq!(snapshot.days.len(), CYCLE_DAYS);
        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.rows[0].shifts[0], ShiftCode::Day);
        assert_eq!(snapshot.rows[1].status, RowStatus::Review);
        assert_eq!(snapshot.compliance.overall, OverallCompliance::Warn);
        assert_eq!(snapshot.generated_at, now());
    }

    #[test]
    fn test_header() {
        let profiles = vec![StaffProfile::named("Amy"), manager("Nina"), manager("Ola")];
        let header = build_header(&profiles, &context(), now());

        assert_eq!(header.organisation, "Austin Health");
        assert_eq!(header.ward, "Ward A");
        assert_eq!(header.title, "5 Jan – 18 Jan");
        assert_eq!(header.published, "06/01/2025");
        assert_eq!(header.approved_by, "Nina");
    }

    #[test]
    fn test_approver_ignores_legacy_position() {
        let legacy = StaffProfile {
            position: Some("NUM".to_string()),
            ..StaffProfile::named("Olive")
        };
        assert_eq!(approver(&[legacy.clone()]), PENDING_APPROVER);

        let manager = StaffProfile {
            role: Some("num".to_string()),
            ..StaffProfile::named("Nina")
        };
        assert_eq!(approver(&[legacy, manager]), "Nina");
    }

    #[test]
    fn test_approver_pending_without_manager() {
        assert_eq!(approver(&[StaffProfile::named("Amy")]), PENDING_APPROVER);
        assert_eq!(approver(&[]), PENDING_APPROVER);
    }

    #[test]
    fn test_infeasible_response_uses_solver_message() {
        let response = SolverResponse::rejected("infeasible", "Not enough night staff");
        let outcome = build_outcome(&[], &response, &context(), now());
        assert_eq!(
            outcome,
            AuditOutcome::NoSolution {
                message: "Not enough night staff".to_string()
            }
        );
    }

    #[test]
    fn test_infeasible_response_without_message_uses_default() {
        let response = SolverResponse {
            status: Some("infeasible".to_string()),
            ..SolverResponse::default()
        };
        let outcome = build_outcome(&[], &response, &context(), now());
        assert_eq!(
            outcome,
            AuditOutcome::NoSolution {
                message: DEFAULT_NO_SOLUTION_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_each_build_gets_a_fresh_run_id() {
        let response = SolverResponse::valid(vec![], vec![]);
        let first = build_outcome(&[], &response, &context(), now());
        let second = build_outcome(&[], &response, &context(), now());
        assert_ne!(
            first.snapshot().unwrap().run_id,
            second.snapshot().unwrap().run_id
        );
    }
}
