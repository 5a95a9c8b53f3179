//! Error types for the roster audit service.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that can occur while loading configuration, talking to
//! the external collaborators, or deriving the audit view.

use thiserror::Error;

/// The main error type for the roster audit service.
///
/// Synthesis itself never fails on incomplete data; these errors cover the
/// configuration, collaborator and calendar boundaries around it.
///
/// # Example
///
/// ```
/// use roster_audit::error::AuditError;
///
/// let error = AuditError::ConfigNotFound {
///     path: "/missing/audit.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/audit.yaml");
/// ```
#[derive(Debug, Error)]
pub enum AuditError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The configured reference timezone is not a known IANA zone.
    #[error("Unknown reference timezone: {name}")]
    InvalidTimezone {
        /// The timezone name as written in the configuration.
        name: String,
    },

    /// A calendar day index outside the fortnight was requested.
    #[error("Day index {index} is outside the 14-day cycle")]
    DayIndexOutOfRange {
        /// The offending day index.
        index: usize,
    },

    /// A collaborator could not be reached or did not answer in time.
    #[error("Transport failure talking to {collaborator}: {message}")]
    Transport {
        /// Which collaborator failed (e.g. "profile source").
        collaborator: String,
        /// A description of the transport failure.
        message: String,
    },

    /// A collaborator answered with a non-success HTTP status.
    #[error("{collaborator} responded with status {status}: {message}")]
    UpstreamStatus {
        /// Which collaborator answered.
        collaborator: String,
        /// The HTTP status code returned.
        status: u16,
        /// The error detail reported by the collaborator.
        message: String,
    },

    /// A collaborator answered with a payload that is not a well-formed object.
    #[error("Malformed payload from {collaborator}: {message}")]
    MalformedPayload {
        /// Which collaborator sent the payload.
        collaborator: String,
        /// A description of the decode failure.
        message: String,
    },

    /// Export was requested while no valid roster has been synthesized.
    #[error("No published roster is available to export")]
    NothingToExport,

    /// The export sink failed to write the artifact.
    #[error("Export failed: {message}")]
    ExportFailed {
        /// A description of the export failure.
        message: String,
    },
}

impl AuditError {
    /// Returns true when the error represents a transport-level failure
    /// (unreachable collaborator, non-success status, or undecodable body).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AuditError::Transport { .. }
                | AuditError::UpstreamStatus { .. }
                | AuditError::MalformedPayload { .. }
        )
    }
}

/// A type alias for Results that return AuditError.
pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = AuditError::ConfigNotFound {
            path: "/missing/audit.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/audit.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = AuditError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_timezone_displays_name() {
        let error = AuditError::InvalidTimezone {
            name: "Mars/Olympus".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown reference timezone: Mars/Olympus");
    }

    #[test]
    fn test_day_index_out_of_range_displays_index() {
        let error = AuditError::DayIndexOutOfRange { index: 14 };
        assert_eq!(
            error.to_string(),
            "Day index 14 is outside the 14-day cycle"
        );
    }

    #[test]
    fn test_upstream_status_displays_collaborator_and_status() {
        let error = AuditError::UpstreamStatus {
            collaborator: "roster solver".to_string(),
            status: 400,
            message: "No profiles".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "roster solver responded with status 400: No profiles"
        );
    }

    #[test]
    fn test_transport_classification() {
        let transport = AuditError::Transport {
            collaborator: "profile source".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(transport.is_transport());
        assert!(!AuditError::NothingToExport.is_transport());
        assert!(!AuditError::DayIndexOutOfRange { index: 20 }.is_transport());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<AuditError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_nothing_to_export() -> AuditResult<()> {
            Err(AuditError::NothingToExport)
        }

        fn propagates_error() -> AuditResult<()> {
            returns_nothing_to_export()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
