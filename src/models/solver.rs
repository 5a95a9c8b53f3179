//! Roster solver response model.
//!
//! The solver payload is treated as structurally untrusted: a missing roster
//! means no roster, missing analytics mean an empty list, and the solver's own
//! compliance block is carried through without being relied upon.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use super::{ShiftAssignmentDay, StaffAnalytics};

/// Status string the solver uses for a feasible roster.
pub const VALID_STATUS: &str = "valid";

/// Compliance block as reported by the solver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportedCompliance {
    /// The solver's overall verdict (e.g. "pass", "attention").
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub overall: Option<String>,
    /// The solver's warning entries, kept opaque.
    #[serde(default)]
    pub warnings: Vec<Value>,
}

/// The response to one roster generation request.
///
/// # Example
///
/// ```
/// use roster_audit::models::SolverResponse;
///
/// let response: SolverResponse = serde_json::from_str(
///     r#"{"status": "infeasible", "message": "No feasible roster with current constraints"}"#,
/// ).unwrap();
/// assert!(!response.is_valid());
/// assert!(response.analytics().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SolverResponse {
    /// Outcome status; only `"valid"` carries a usable roster.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// The fortnight's assignments, one entry per day.
    #[serde(default, deserialize_with = "lenient::roster", skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<ShiftAssignmentDay>>,
    /// Per-staff analytics; entries without a usable name are dropped.
    #[serde(default, deserialize_with = "lenient::analytics", skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Vec<StaffAnalytics>>,
    /// The solver's own compliance summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<ReportedCompliance>,
    /// Human-readable message, usually explaining infeasibility.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SolverResponse {
    /// Builds a valid response from a roster and its analytics.
    pub fn valid(roster: Vec<ShiftAssignmentDay>, analytics: Vec<StaffAnalytics>) -> Self {
        Self {
            status: Some(VALID_STATUS.to_string()),
            roster: Some(roster),
            analytics: Some(analytics),
            compliance: None,
            message: None,
        }
    }

    /// Builds a response for a solver that could not produce a roster.
    pub fn rejected(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Returns true when the solver reports a feasible roster.
    pub fn is_valid(&self) -> bool {
        self.status.as_deref() == Some(VALID_STATUS)
    }

    /// Returns the analytics list, empty when the solver sent none.
    pub fn analytics(&self) -> &[StaffAnalytics] {
        self.analytics.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_valid_response() {
        let json = r#"{
            "status": "valid",
            "roster": [{"day": 1, "AM": ["Amy"], "PM": [], "ND": []}],
            "analytics": [{"name": "Amy", "compliant": true}],
            "compliance": {"overall": "pass", "warnings": []}
        }"#;

        let response: SolverResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_valid());
        assert_eq!(response.roster.as_ref().map(Vec::len), Some(1));
        assert_eq!(response.analytics().len(), 1);
        assert_eq!(
            response.compliance.and_then(|c| c.overall).as_deref(),
            Some("pass")
        );
    }

    #[test]
    fn test_missing_roster_and_analytics() {
        let response: SolverResponse = serde_json::from_str(r#"{"status": "valid"}"#).unwrap();
        assert!(response.is_valid());
        assert!(response.roster.is_none());
        assert!(response.analytics().is_empty());
    }

    #[test]
    fn test_odd_fields_do_not_fail_a_valid_response() {
        let json = r#"{
            "status": "valid",
            "roster": [
                {"day": "1", "AM": ["Amy"], "PM": [], "ND": []},
                null,
                {"day": 3, "ND": ["Zoe"]}
            ],
            "analytics": [
                {"role": "RN", "compliant": true},
                {"name": "   ", "compliant": false},
                {"name": "Amy", "restBreaches": [[2, "N->D", 1]]},
                "Zoe"
            ]
        }"#;

        let response: SolverResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_valid());

        let roster = response.roster.as_ref().unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].day, Some(1));
        assert_eq!(roster[1], ShiftAssignmentDay::default());
        assert_eq!(roster[2].nd, vec!["Zoe"]);

        let analytics = response.analytics();
        assert_eq!(analytics.len(), 1);
        assert_eq!(analytics[0].name, "Amy");
        assert_eq!(analytics[0].rest_breaches.len(), 1);
    }

    #[test]
    fn test_roster_that_is_not_a_list_is_absent() {
        let response: SolverResponse =
            serde_json::from_str(r#"{"status": "valid", "roster": "pending", "analytics": {}}"#)
                .unwrap();
        assert!(response.roster.is_none());
        assert!(response.analytics.is_none());
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let response = SolverResponse::rejected("VALID", "shouting");
        assert!(!response.is_valid());
    }

    #[test]
    fn test_empty_object_is_not_valid() {
        let response: SolverResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.is_valid());
        assert!(response.message.is_none());
    }
}
