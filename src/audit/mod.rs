//! Audit-run lifecycle.
//!
//! A run fetches the profile list and asks the solver for a roster, then
//! settles into exactly one [`AuditOutcome`](crate::models::AuditOutcome).
//! [`AuditTracker`] is the synchronous state machine; [`AuditCoordinator`]
//! drives it against the collaborator ports.

mod coordinator;
mod outcome;
mod tracker;

pub use coordinator::AuditCoordinator;
pub use outcome::{SynthesisContext, approver, build_header, build_outcome};
pub use tracker::{AuditState, AuditTracker, BACKEND_UNREACHABLE, Resolution, TriggerId};
