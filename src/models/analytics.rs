//! Per-staff fatigue and fairness analytics.
//!
//! Analytics are computed by the solver. This service only carries them into
//! the published view; it never recomputes a score.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// A turnaround breach between two consecutive days: `[dayIndex, "N->D"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestBreach(pub u32, pub String);

/// Solver-reported analytics for one staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffAnalytics {
    /// Staff member's name; joins to profiles and roster blocks.
    pub name: String,
    /// Role as reported by the solver.
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Fatigue score; higher is worse.
    #[serde(default, deserialize_with = "lenient::decimal_or_zero")]
    pub fatigue_score: Decimal,
    /// Number of weekend shifts worked in the cycle.
    #[serde(default, deserialize_with = "lenient::count_or_zero")]
    pub weekend_count: u32,
    /// Longest run of consecutive worked days.
    #[serde(default, deserialize_with = "lenient::count_or_zero")]
    pub max_consecutive: u32,
    /// Whether the solver judged this staff member's roster compliant.
    #[serde(default = "lenient::default_true", deserialize_with = "lenient::flag")]
    pub compliant: bool,
    /// Whether the roster includes two consecutive days off.
    #[serde(default = "lenient::default_true", deserialize_with = "lenient::flag")]
    pub has_two_day_break: bool,
    /// Turnaround breaches in day order.
    #[serde(default, deserialize_with = "lenient::rest_breaches")]
    pub rest_breaches: Vec<RestBreach>,
    /// Reviewer notes in solver order.
    #[serde(default, deserialize_with = "lenient::names")]
    pub notes: Vec<String>,
    /// FTE echoed back by the solver.
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub fte: Option<Decimal>,
    /// Longest run of consecutive days off.
    #[serde(default, deserialize_with = "lenient::count", skip_serializing_if = "Option::is_none")]
    pub longest_off_streak: Option<u32>,
}

impl StaffAnalytics {
    /// Creates a compliant analytics entry with zeroed metrics.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_audit::models::StaffAnalytics;
    ///
    /// let entry = StaffAnalytics::compliant("Amy");
    /// assert!(entry.compliant);
    /// assert!(entry.rest_breaches.is_empty());
    /// ```
    pub fn compliant(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            fatigue_score: Decimal::ZERO,
            weekend_count: 0,
            max_consecutive: 0,
            compliant: true,
            has_two_day_break: true,
            rest_breaches: Vec::new(),
            notes: Vec::new(),
            fte: None,
            longest_off_streak: None,
        }
    }

    /// Creates a non-compliant analytics entry carrying the given notes.
    pub fn non_compliant(name: impl Into<String>, notes: Vec<String>) -> Self {
        Self {
            compliant: false,
            notes,
            ..Self::compliant(name)
        }
    }
}
