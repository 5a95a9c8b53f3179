//! Collaborator ports.
//!
//! The audit lifecycle only talks to the outside world through these traits.
//! [`http`] holds the reqwest-backed adapters used in production; tests plug
//! in in-memory implementations.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuditResult;
use crate::models::{AuditSnapshot, SolverResponse, StaffProfile};

pub use http::{HttpExportSink, HttpRosterBackend};

/// Reads the current staff profile list.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetches every submitted profile.
    async fn fetch_profiles(&self) -> AuditResult<Vec<StaffProfile>>;
}

/// Asks the solver for a fresh roster.
#[async_trait]
pub trait RosterSolver: Send + Sync {
    /// Triggers generation and returns the solver's response as reported.
    async fn generate(&self) -> AuditResult<SolverResponse>;
}

/// Receives a published roster for download.
///
/// Nothing returned by an export flows back into the synthesized view.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Exports the roster the snapshot was built from.
    async fn export(&self, snapshot: &AuditSnapshot) -> AuditResult<ExportReceipt>;
}

/// Where an exported roster ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    /// Run id of the exported snapshot.
    pub run_id: Uuid,
    /// Location of the written artifact.
    pub location: String,
    /// Size of the artifact in bytes.
    pub bytes: u64,
}
