//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file and resolving it into typed values.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use reqwest::Url;

use crate::audit::SynthesisContext;
use crate::error::{AuditError, AuditResult};
use crate::models::RosterBranding;
use crate::synthesis::CycleCalendar;

use super::types::AuditConfig;

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "ROSTER_AUDIT_CONFIG";

/// Configuration file used when no override is given.
pub const DEFAULT_CONFIG_PATH: &str = "./config/audit.yaml";

/// Loads and provides access to the service configuration.
///
/// Loading validates everything up front: the reference timezone must be a
/// known IANA zone and the backend URL must parse.
///
/// # Example
///
/// ```no_run
/// use roster_audit::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/audit.yaml").unwrap();
/// println!("Cycle: {}", loader.calendar().title());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AuditConfig,
    calendar: CycleCalendar,
    base_url: Url,
}

impl ConfigLoader {
    /// Loads configuration from the specified file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML file (e.g., "./config/audit.yaml")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML or a malformed backend URL
    /// - The reference timezone is unknown
    pub fn load<P: AsRef<Path>>(path: P) -> AuditResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AuditError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Loads from `ROSTER_AUDIT_CONFIG`, falling back to the default path.
    pub fn load_from_env() -> AuditResult<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Parses configuration from YAML text.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_audit::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_str(r#"
    /// roster:
    ///   organisation: Austin Health
    ///   ward: Ward A
    /// cycle:
    ///   start_date: 2025-01-05
    /// backend:
    ///   base_url: http://localhost:8000
    /// "#).unwrap();
    ///
    /// assert_eq!(loader.calendar().title(), "5 Jan – 18 Jan");
    /// assert_eq!(loader.config().server.port, 3000);
    /// ```
    pub fn from_yaml_str(content: &str) -> AuditResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, path: &str) -> AuditResult<Self> {
        let config: AuditConfig =
            serde_yaml::from_str(content).map_err(|e| AuditError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let zone: Tz = config
            .cycle
            .reference_timezone
            .parse()
            .map_err(|_| AuditError::InvalidTimezone {
                name: config.cycle.reference_timezone.clone(),
            })?;
        let calendar = CycleCalendar::new(config.cycle.start_date, zone)?;

        let base_url =
            Url::parse(&config.backend.base_url).map_err(|e| AuditError::ConfigParseError {
                path: path.to_string(),
                message: format!("backend.base_url: {e}"),
            })?;

        Ok(Self {
            config,
            calendar,
            base_url,
        })
    }

    /// Returns the raw configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Returns the active cycle calendar.
    pub fn calendar(&self) -> &CycleCalendar {
        &self.calendar
    }

    /// Returns the organisation and ward names.
    pub fn branding(&self) -> RosterBranding {
        RosterBranding {
            organisation: self.config.roster.organisation.clone(),
            ward: self.config.roster.ward.clone(),
        }
    }

    /// Returns everything synthesis needs from configuration.
    pub fn synthesis_context(&self) -> SynthesisContext {
        SynthesisContext::new(self.calendar.clone(), self.branding())
    }

    /// Returns the rostering backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the collaborator request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.backend.request_timeout_secs)
    }

    /// Returns the `host:port` the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}
