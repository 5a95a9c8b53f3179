//! Audit run outcome models.
//!
//! This module contains the [`AuditSnapshot`] produced by a successful
//! synthesis and the [`AuditOutcome`] that wraps it alongside the two
//! failure shapes an audit run can settle into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DayMeta, PublishedRow};

/// Message shown when the solver reports infeasibility without explaining why.
pub const DEFAULT_NO_SOLUTION_MESSAGE: &str = "Adjust FTE, coverage, or locks";

/// Approver shown when no Nurse Unit Manager profile exists.
pub const PENDING_APPROVER: &str = "Pending Assignment";

/// Cycle-wide compliance verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallCompliance {
    /// No analytics entry is non-compliant.
    Pass,
    /// At least one analytics entry is non-compliant.
    Warn,
}

/// Cycle-wide compliance summary derived from the analytics list.
///
/// # Example
///
/// ```
/// use roster_audit::models::{ComplianceSummary, OverallCompliance};
///
/// let summary = ComplianceSummary::pass();
/// assert_eq!(summary.overall, OverallCompliance::Pass);
/// assert!(summary.warnings.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    /// The overall verdict.
    pub overall: OverallCompliance,
    /// Names of non-compliant staff, in analytics order.
    pub warnings: Vec<String>,
}

impl ComplianceSummary {
    /// A passing summary with no warnings.
    pub fn pass() -> Self {
        Self {
            overall: OverallCompliance::Pass,
            warnings: Vec::new(),
        }
    }
}

/// Organisation and ward names printed on the published roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterBranding {
    /// Health service name.
    pub organisation: String,
    /// Ward name.
    pub ward: String,
}

/// Banner details of a published roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterHeader {
    /// Health service name.
    pub organisation: String,
    /// Ward name.
    pub ward: String,
    /// Cycle title, e.g. "5 Jan – 18 Jan".
    pub title: String,
    /// Publication date in the reference timezone, dd/mm/yyyy.
    pub published: String,
    /// Name of the approving Nurse Unit Manager.
    pub approved_by: String,
}

/// An immutable, fully-built published roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSnapshot {
    /// Unique identifier of this synthesis.
    pub run_id: Uuid,
    /// When the snapshot was built.
    pub generated_at: DateTime<Utc>,
    /// Banner details.
    pub header: RosterHeader,
    /// Column descriptors for the 14 days.
    pub days: Vec<DayMeta>,
    /// Published rows in display order.
    pub rows: Vec<PublishedRow>,
    /// Cycle-wide compliance summary.
    pub compliance: ComplianceSummary,
}

/// The settled result of one audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AuditOutcome {
    /// The solver produced a roster and it was synthesized.
    Valid(AuditSnapshot),
    /// The solver reported that no roster satisfies the constraints.
    NoSolution {
        /// Explanation shown to the reviewer.
        message: String,
    },
    /// A collaborator could not be reached.
    TransportError {
        /// Explanation shown to the reviewer.
        message: String,
    },
}

impl AuditOutcome {
    /// Returns the snapshot of a valid outcome.
    pub fn snapshot(&self) -> Option<&AuditSnapshot> {
        match self {
            AuditOutcome::Valid(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
