//! Published roster models.
//!
//! These are pure derivations of the collaborator inputs: calendar column
//! descriptors and the per-staff rows of the published matrix.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Role, ShiftCode, StaffAnalytics, CYCLE_DAYS};

/// Column descriptor for one day of the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMeta {
    /// Position in the cycle, 0 through 13.
    pub day_index: usize,
    /// Civil date in the reference timezone.
    pub date: NaiveDate,
    /// Header label, e.g. "5 Jan Sun".
    pub label: String,
    /// 0 for the first week, 1 for the second.
    pub week_index: u8,
    /// True on Saturdays and Sundays.
    pub is_weekend: bool,
}

/// Analytics attached to a published row.
///
/// A row with no matching analytics is explicitly marked [`RowAnalytics::Missing`]
/// rather than omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowAnalytics {
    /// The solver supplied analytics for this name.
    Attached(StaffAnalytics),
    /// The solver supplied no analytics for this name.
    Missing,
}

impl RowAnalytics {
    /// Returns the attached analytics, if any.
    pub fn attached(&self) -> Option<&StaffAnalytics> {
        match self {
            RowAnalytics::Attached(entry) => Some(entry),
            RowAnalytics::Missing => None,
        }
    }
}

/// Per-row compliance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Analytics attached and compliant.
    Pass,
    /// Analytics attached and non-compliant.
    Review,
    /// No analytics for this name.
    NoAnalytics,
}

/// A reviewer-facing flag derived from a row's analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flag", rename_all = "snake_case")]
pub enum ReviewFlag {
    /// The roster lacks two consecutive days off.
    NeedsTwoDayBreak,
    /// The roster contains short turnarounds between shifts.
    TurnaroundBreaches {
        /// Number of breaches reported.
        count: usize,
    },
    /// A note reported by the solver.
    Note {
        /// The note text.
        text: String,
    },
}

/// One staff member's line in the published roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRow {
    /// Staff member's name.
    pub name: String,
    /// Resolved role.
    pub role: Role,
    /// Profile email, or the name when no profile supplies one.
    pub email: String,
    /// Shift code for each day of the cycle.
    pub shifts: [ShiftCode; CYCLE_DAYS],
    /// Attached analytics or an explicit missing marker.
    pub analytics: RowAnalytics,
    /// Compliance status derived from `analytics`.
    pub status: RowStatus,
    /// Reviewer flags derived from `analytics`.
    #[serde(default)]
    pub review_flags: Vec<ReviewFlag>,
}

impl PublishedRow {
    /// Number of worked (non-OFF) days.
    pub fn worked_days(&self) -> usize {
        self.shifts.iter().filter(|code| code.is_worked()).count()
    }
}
