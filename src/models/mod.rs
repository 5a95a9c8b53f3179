//! Core data models for the roster audit service.
//!
//! Inputs (profiles, solver responses, analytics) mirror the collaborators'
//! JSON shapes; outputs (rows, snapshots, outcomes) are what presentation
//! consumes.

mod analytics;
mod lenient;
mod outcome;
mod profile;
mod published;
mod role;
mod roster;
mod solver;

pub use analytics::{RestBreach, StaffAnalytics};
pub use outcome::{
    AuditOutcome, AuditSnapshot, ComplianceSummary, DEFAULT_NO_SOLUTION_MESSAGE,
    OverallCompliance, PENDING_APPROVER, RosterBranding, RosterHeader,
};
pub use profile::StaffProfile;
pub use published::{DayMeta, PublishedRow, ReviewFlag, RowAnalytics, RowStatus};
pub use role::Role;
pub use roster::{CYCLE_DAYS, ShiftAssignmentDay, ShiftBlock, ShiftCode, WEEK_DAYS};
pub use solver::{ReportedCompliance, SolverResponse, VALID_STATUS};
