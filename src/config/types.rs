//! Configuration types for the roster audit service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

/// Default collaborator request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Organisation and ward names.
    pub roster: RosterSection,
    /// The active rostering cycle.
    pub cycle: CycleSection,
    /// Rostering backend collaborators.
    pub backend: BackendSection,
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerSection,
    /// Logging.
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

/// Names printed on the published roster.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterSection {
    /// Health service name (e.g., "Austin Health").
    pub organisation: String,
    /// Ward name (e.g., "Ward A").
    pub ward: String,
}

/// The active rostering cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct CycleSection {
    /// First day of the fortnight.
    pub start_date: NaiveDate,
    /// IANA timezone all calendar math is pinned to.
    #[serde(default = "default_reference_timezone")]
    pub reference_timezone: String,
}

/// Where the profile store, solver and export live.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSection {
    /// Base URL of the rostering backend.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Directory exported spreadsheets are written into.
    #[serde(default = "default_export_directory")]
    pub export_directory: PathBuf,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySection {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_reference_timezone() -> String {
    "Australia/Melbourne".to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_export_directory() -> PathBuf {
    PathBuf::from("./exports")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}
