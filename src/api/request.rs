//! Request types for the roster audit API.
//!
//! This module defines the JSON request structures for the `/synthesize`
//! endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{SolverResponse, StaffProfile};

/// Request body for the `/synthesize` endpoint.
///
/// Carries both collaborator payloads of one audit run so a caller that
/// already fetched them can get the published view directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// The profile list as returned by the profile source.
    #[serde(default)]
    pub profiles: Vec<StaffProfile>,
    /// The solver response as returned by the roster solver.
    pub result: SolverResponse,
}
