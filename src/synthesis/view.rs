//! Roster matrix synthesis.
//!
//! Joins the three collaborator sources by staff name into one normalized
//! table: every name from profiles, roster blocks or analytics gets exactly
//! one row of 14 shift codes, a resolved role, and a deterministic position.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::{
    CYCLE_DAYS, PublishedRow, Role, RowAnalytics, RowStatus, ShiftAssignmentDay, ShiftBlock,
    ShiftCode, SolverResponse, StaffAnalytics, StaffProfile,
};

/// One row of shift codes per name.
pub type ShiftMatrix = HashMap<String, [ShiftCode; CYCLE_DAYS]>;

/// Builds the ordered published rows for one solver response.
///
/// Rows come back without analytics attached (`RowAnalytics::Missing`); the
/// compliance annotator attaches them. When the solver status is not valid or
/// no roster was returned, the result is empty.
///
/// # Example
///
/// ```
/// use roster_audit::models::{Role, ShiftAssignmentDay, ShiftCode, SolverResponse, StaffProfile};
/// use roster_audit::synthesis::synthesize_rows;
///
/// let mut roster = vec![ShiftAssignmentDay::default(); 14];
/// roster[0].nd.push("Zoe".to_string());
///
/// let response = SolverResponse::valid(roster, vec![]);
/// let rows = synthesize_rows(&[StaffProfile::named("Amy")], &response);
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].name, "Amy");
/// assert_eq!(rows[0].role, Role::Rn);
/// assert_eq!(rows[1].shifts[0], ShiftCode::Night);
/// ```
pub fn synthesize_rows(profiles: &[StaffProfile], response: &SolverResponse) -> Vec<PublishedRow> {
    if !response.is_valid() {
        debug!(status = ?response.status, "Solver status is not valid, no rows synthesized");
        return Vec::new();
    }
    let Some(roster) = response.roster.as_deref() else {
        debug!("Valid solver response without a roster, no rows synthesized");
        return Vec::new();
    };

    let analytics = response.analytics();
    let matrix = build_shift_matrix(profiles, roster, analytics);

    // First profile per name wins; last analytics entry per name wins.
    let mut profile_by_name: HashMap<&str, &StaffProfile> = HashMap::new();
    for profile in profiles {
        profile_by_name.entry(profile.name.as_str()).or_insert(profile);
    }
    let analytics_by_name: HashMap<&str, &StaffAnalytics> = analytics
        .iter()
        .map(|entry| (entry.name.as_str(), entry))
        .collect();

    let mut rows: Vec<PublishedRow> = matrix
        .into_iter()
        .map(|(name, shifts)| {
            let profile = profile_by_name.get(name.as_str()).copied();
            let entry = analytics_by_name.get(name.as_str()).copied();
            let role = resolve_role(entry, profile);
            let email = profile
                .and_then(|p| p.email.clone())
                .unwrap_or_else(|| name.clone());
            PublishedRow {
                name,
                role,
                email,
                shifts,
                analytics: RowAnalytics::Missing,
                status: RowStatus::NoAnalytics,
                review_flags: Vec::new(),
            }
        })
        .collect();

    rows.sort_by(compare_rows);

    debug!(
        rows = rows.len(),
        profiles = profiles.len(),
        analytics = analytics.len(),
        "Roster matrix synthesized"
    );
    rows
}

/// Builds the name-keyed shift matrix.
///
/// The name universe is the union of profile names, analytics names and every
/// name in any roster block. Each name starts at `OFF` on every day; days are
/// applied in order with blocks processed AM, PM, ND, so a name listed in two
/// blocks on one day keeps the later block's code. Roster entries beyond the
/// 14th day are ignored.
pub fn build_shift_matrix(
    profiles: &[StaffProfile],
    roster: &[ShiftAssignmentDay],
    analytics: &[StaffAnalytics],
) -> ShiftMatrix {
    let mut matrix = ShiftMatrix::new();

    let seeded = profiles
        .iter()
        .map(|p| p.name.as_str())
        .chain(analytics.iter().map(|a| a.name.as_str()));
    for name in seeded {
        matrix
            .entry(name.to_string())
            .or_insert([ShiftCode::Off; CYCLE_DAYS]);
    }

    if roster.len() > CYCLE_DAYS {
        warn!(
            days = roster.len(),
            "Solver returned more than {} days, extra days ignored", CYCLE_DAYS
        );
    }

    for (day_index, day) in roster.iter().take(CYCLE_DAYS).enumerate() {
        for block in ShiftBlock::PROCESSING_ORDER {
            let code = block.code();
            for name in day.names(block) {
                let shifts = matrix
                    .entry(name.clone())
                    .or_insert([ShiftCode::Off; CYCLE_DAYS]);
                shifts[day_index] = code;
            }
        }
    }

    matrix
}

/// Resolves a row's role: analytics role, else profile role, else the
/// profile's legacy position, else RN.
pub fn resolve_role(analytics: Option<&StaffAnalytics>, profile: Option<&StaffProfile>) -> Role {
    analytics
        .and_then(|entry| entry.role.as_deref())
        .filter(|role| !role.trim().is_empty())
        .map(Role::parse)
        .or_else(|| profile.and_then(StaffProfile::declared_role))
        .unwrap_or_default()
}

/// Total order for published rows: role precedence, then case-insensitive
/// name, then exact name.
pub fn compare_rows(a: &PublishedRow, b: &PublishedRow) -> Ordering {
    a.role
        .precedence()
        .cmp(&b.role.precedence())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fortnight() -> Vec<ShiftAssignmentDay> {
        vec![ShiftAssignmentDay::default(); CYCLE_DAYS]
    }

    fn profile(name: &str, role: &str) -> StaffProfile {
        StaffProfile {
            role: Some(role.to_string()),
            email: Some(format!("{}@example.org", name.to_lowercase())),
            ..StaffProfile::named(name)
        }
    }

    fn analytics_with_role(name: &str, role: &str) -> StaffAnalytics {
        StaffAnalytics {
            role: Some(role.to_string()),
            ..StaffAnalytics::compliant(name)
        }
    }

    fn names(rows: &[PublishedRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_rows_sorted_by_name_within_role() {
        let profiles = vec![profile("Zoe", "RN"), profile("Amy", "RN")];
        let rows = synthesize_rows(&profiles, &SolverResponse::valid(fortnight(), vec![]));
        assert_eq!(names(&rows), vec!["Amy", "Zoe"]);
    }

    #[test]
    fn test_anum_precedes_rn_regardless_of_name() {
        let profiles = vec![profile("Aaron", "RN"), profile("Zed", "ANUM")];
        let rows = synthesize_rows(&profiles, &SolverResponse::valid(fortnight(), vec![]));
        assert_eq!(names(&rows), vec!["Zed", "Aaron"]);
    }

    #[test]
    fn test_full_role_precedence() {
        let profiles = vec![
            profile("A", "NUM"),
            profile("B", "GNP"),
            profile("C", "EN"),
            profile("D", "RN"),
            profile("E", "CNS"),
            profile("F", "ANUM"),
        ];
        let rows = synthesize_rows(&profiles, &SolverResponse::valid(fortnight(), vec![]));
        assert_eq!(names(&rows), vec!["F", "E", "D", "C", "B", "A"]);
    }

    #[test]
    fn test_name_comparison_ignores_case() {
        let profiles = vec![profile("bob", "RN"), profile("Amy", "RN"), profile("Cy", "RN")];
        let rows = synthesize_rows(&profiles, &SolverResponse::valid(fortnight(), vec![]));
        assert_eq!(names(&rows), vec!["Amy", "bob", "Cy"]);
    }

    #[test]
    fn test_block_codes_are_mapped() {
        let mut roster = fortnight();
        roster[0].am.push("Amy".to_string());
        roster[1].pm.push("Amy".to_string());
        roster[2].nd.push("Amy".to_string());
        let rows = synthesize_rows(&[], &SolverResponse::valid(roster, vec![]));

        assert_eq!(rows.len(), 1);
        let shifts = rows[0].shifts;
        assert_eq!(shifts[0], ShiftCode::Day);
        assert_eq!(shifts[1], ShiftCode::Evening);
        assert_eq!(shifts[2], ShiftCode::Night);
        assert!(shifts[3..].iter().all(|c| *c == ShiftCode::Off));
    }

    #[test]
    fn test_conflicting_blocks_resolve_to_later_block() {
        let mut roster = fortnight();
        roster[4].nd.push("Amy".to_string());
        roster[4].am.push("Amy".to_string());
        let rows = synthesize_rows(&[], &SolverResponse::valid(roster, vec![]));
        assert_eq!(rows[0].shifts[4], ShiftCode::Night);
    }

    #[test]
    fn test_name_universe_is_union_of_sources() {
        let mut roster = fortnight();
        roster[0].am.push("RosterOnly".to_string());
        let analytics = vec![StaffAnalytics::compliant("AnalyticsOnly")];
        let profiles = vec![profile("ProfileOnly", "RN")];

        let rows = synthesize_rows(&profiles, &SolverResponse::valid(roster, analytics));
        assert_eq!(names(&rows), vec!["AnalyticsOnly", "ProfileOnly", "RosterOnly"]);
    }

    #[test]
    fn test_each_name_appears_once() {
        let mut roster = fortnight();
        for day in roster.iter_mut() {
            day.am.push("Amy".to_string());
        }
        let profiles = vec![profile("Amy", "RN"), profile("Amy", "EN")];
        let analytics = vec![StaffAnalytics::compliant("Amy")];

        let rows = synthesize_rows(&profiles, &SolverResponse::valid(roster, analytics));
        assert_eq!(rows.len(), 1);
        assert!(rows[0].shifts.iter().all(|c| *c == ShiftCode::Day));
    }

    #[test]
    fn test_role_precedence_analytics_over_profile() {
        let profiles = vec![profile("Amy", "EN")];
        let analytics = vec![analytics_with_role("Amy", "cns")];
        let rows = synthesize_rows(&profiles, &SolverResponse::valid(fortnight(), analytics));
        assert_eq!(rows[0].role, Role::Cns);
    }

    #[test]
    fn test_role_falls_back_to_legacy_position_then_rn() {
        let legacy = StaffProfile {
            position: Some("gnp".to_string()),
            ..StaffProfile::named("Amy")
        };
        assert_eq!(resolve_role(None, Some(&legacy)), Role::Gnp);
        assert_eq!(resolve_role(None, Some(&StaffProfile::named("Bo"))), Role::Rn);
        assert_eq!(resolve_role(None, None), Role::Rn);
    }

    #[test]
    fn test_blank_analytics_role_falls_through() {
        let entry: StaffAnalytics =
            serde_json::from_str(r#"{"name": "Amy", "role": ""}"#).unwrap();
        let declared = profile("Amy", "en");
        assert_eq!(resolve_role(Some(&entry), Some(&declared)), Role::En);
    }

    #[test]
    fn test_email_defaults_to_name() {
        let mut roster = fortnight();
        roster[0].am.push("Zoe".to_string());
        let rows = synthesize_rows(&[profile("Amy", "RN")], &SolverResponse::valid(roster, vec![]));
        assert_eq!(rows[0].email, "amy@example.org");
        assert_eq!(rows[1].email, "Zoe");
    }

    #[test]
    fn test_rows_start_without_analytics() {
        let analytics = vec![StaffAnalytics::compliant("Amy")];
        let rows = synthesize_rows(&[], &SolverResponse::valid(fortnight(), analytics));
        assert_eq!(rows[0].analytics, RowAnalytics::Missing);
        assert_eq!(rows[0].status, RowStatus::NoAnalytics);
    }

    #[test]
    fn test_invalid_status_yields_no_rows() {
        let profiles = vec![profile("Amy", "RN")];
        let response = SolverResponse::rejected("infeasible", "No feasible roster");
        assert!(synthesize_rows(&profiles, &response).is_empty());
    }

    #[test]
    fn test_missing_roster_yields_no_rows() {
        let response = SolverResponse {
            roster: None,
            ..SolverResponse::valid(vec![], vec![StaffAnalytics::compliant("Amy")])
        };
        assert!(synthesize_rows(&[profile("Amy", "RN")], &response).is_empty());
    }

    #[test]
    fn test_short_roster_pads_with_off() {
        let mut roster = vec![ShiftAssignmentDay::default(); 3];
        roster[2].pm.push("Amy".to_string());
        let rows = synthesize_rows(&[], &SolverResponse::valid(roster, vec![]));
        assert_eq!(rows[0].shifts[2], ShiftCode::Evening);
        assert_eq!(rows[0].shifts.len(), CYCLE_DAYS);
    }

    #[test]
    fn test_extra_roster_days_ignored() {
        let mut roster = vec![ShiftAssignmentDay::default(); CYCLE_DAYS + 1];
        roster[CYCLE_DAYS].am.push("Late".to_string());
        let rows = synthesize_rows(&[], &SolverResponse::valid(roster, vec![]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let mut roster = fortnight();
        roster[0].am.extend(["Zoe".to_string(), "Amy".to_string()]);
        roster[3].nd.push("Bo".to_string());
        let response = SolverResponse::valid(roster, vec![analytics_with_role("Bo", "EN")]);
        let profiles = vec![profile("Amy", "RN"), profile("Zoe", "ANUM")];

        assert_eq!(
            synthesize_rows(&profiles, &response),
            synthesize_rows(&profiles, &response)
        );
    }
}
