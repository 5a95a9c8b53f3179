//! Reqwest-backed collaborator adapters.
//!
//! These adapters own transport details only: timeouts, HTTP status mapping
//! and JSON decoding. Anything past a well-formed JSON object is left to the
//! synthesis layer.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{ExportReceipt, ExportSink, ProfileSource, RosterSolver};
use crate::error::{AuditError, AuditResult};
use crate::models::{AuditSnapshot, SolverResponse, StaffProfile};

const PROFILE_SOURCE: &str = "profile source";
const ROSTER_SOLVER: &str = "roster solver";
const EXPORT_SINK: &str = "export sink";

const PROFILES_PATH: &str = "profiles";
const GENERATE_PATH: &str = "generate-roster";
const EXPORT_PATH: &str = "export-excel";

/// Status reported for a solver rejection that carries only an error detail.
const REJECTED_STATUS: &str = "error";

/// Profile source and roster solver served by the rostering backend.
#[derive(Debug, Clone)]
pub struct HttpRosterBackend {
    client: Client,
    base_url: Url,
}

impl HttpRosterBackend {
    /// Builds the adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Transport`] when the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> AuditResult<Self> {
        let client = build_client(timeout, "roster backend")?;
        Ok(Self { client, base_url })
    }

    async fn get(&self, path: &str, collaborator: &str) -> AuditResult<(StatusCode, Vec<u8>)> {
        let url = endpoint(&self.base_url, path, collaborator)?;
        debug!(%url, collaborator, "Requesting collaborator");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| map_transport_error(collaborator, error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(collaborator, error))?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl ProfileSource for HttpRosterBackend {
    async fn fetch_profiles(&self) -> AuditResult<Vec<StaffProfile>> {
        let (status, body) = self.get(PROFILES_PATH, PROFILE_SOURCE).await?;
        if !status.is_success() {
            return Err(map_status_error(PROFILE_SOURCE, status, &body));
        }
        decode(PROFILE_SOURCE, &body)
    }
}

#[async_trait]
impl RosterSolver for HttpRosterBackend {
    async fn generate(&self) -> AuditResult<SolverResponse> {
        let (status, body) = self.get(GENERATE_PATH, ROSTER_SOLVER).await?;
        if status.is_success() {
            return decode(ROSTER_SOLVER, &body);
        }

        // The solver explains refusals (e.g. no profiles yet) in a `detail`
        // field; those are infeasibility, not transport failures.
        match error_detail(&body) {
            Some(detail) => Ok(SolverResponse::rejected(REJECTED_STATUS, detail)),
            None => Err(map_status_error(ROSTER_SOLVER, status, &body)),
        }
    }
}

/// Export sink that downloads the backend's spreadsheet into a directory.
#[derive(Debug, Clone)]
pub struct HttpExportSink {
    client: Client,
    base_url: Url,
    directory: PathBuf,
}

impl HttpExportSink {
    /// Builds the sink writing into `directory`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Transport`] when the HTTP client cannot be built.
    pub fn new(base_url: Url, directory: impl Into<PathBuf>, timeout: Duration) -> AuditResult<Self> {
        let client = build_client(timeout, EXPORT_SINK)?;
        Ok(Self {
            client,
            base_url,
            directory: directory.into(),
        })
    }

    /// File name for a snapshot's export.
    pub fn file_name(snapshot: &AuditSnapshot) -> String {
        format!("Roster_Request_{}.xlsx", snapshot.run_id)
    }
}

#[async_trait]
impl ExportSink for HttpExportSink {
    async fn export(&self, snapshot: &AuditSnapshot) -> AuditResult<ExportReceipt> {
        let url = endpoint(&self.base_url, EXPORT_PATH, EXPORT_SINK)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| map_transport_error(EXPORT_SINK, error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(EXPORT_SINK, error))?;
        if !status.is_success() {
            let message = error_detail(&body)
                .unwrap_or_else(|| format!("status {}: {}", status.as_u16(), body_preview(&body)));
            return Err(AuditError::ExportFailed { message });
        }

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|error| AuditError::ExportFailed {
                message: format!("cannot create {}: {error}", self.directory.display()),
            })?;

        let path = self.directory.join(Self::file_name(snapshot));
        tokio::fs::write(&path, &body)
            .await
            .map_err(|error| AuditError::ExportFailed {
                message: format!("cannot write {}: {error}", path.display()),
            })?;

        info!(
            run_id = %snapshot.run_id,
            path = %path.display(),
            bytes = body.len(),
            "Roster exported"
        );

        Ok(ExportReceipt {
            run_id: snapshot.run_id,
            location: path.display().to_string(),
            bytes: body.len() as u64,
        })
    }
}

fn build_client(timeout: Duration, collaborator: &str) -> AuditResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| map_transport_error(collaborator, error))
}

fn endpoint(base_url: &Url, path: &str, collaborator: &str) -> AuditResult<Url> {
    // A base without a trailing slash would have its last segment replaced.
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path).map_err(|error| AuditError::Transport {
        collaborator: collaborator.to_string(),
        message: format!("invalid endpoint '{path}': {error}"),
    })
}

fn decode<T: DeserializeOwned>(collaborator: &str, body: &[u8]) -> AuditResult<T> {
    serde_json::from_slice(body).map_err(|error| AuditError::MalformedPayload {
        collaborator: collaborator.to_string(),
        message: error.to_string(),
    })
}

/// Extracts a `detail` message from a JSON error body.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.trim().to_string()).filter(|d| !d.is_empty()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn map_transport_error(collaborator: &str, error: reqwest::Error) -> AuditError {
    let message = if error.is_timeout() {
        format!("timed out: {error}")
    } else {
        error.to_string()
    };
    AuditError::Transport {
        collaborator: collaborator.to_string(),
        message,
    }
}

fn map_status_error(collaborator: &str, status: StatusCode, body: &[u8]) -> AuditError {
    AuditError::UpstreamStatus {
        collaborator: collaborator.to_string(),
        status: status.as_u16(),
        message: error_detail(body).unwrap_or_else(|| body_preview(body)),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
