//! Response types for the roster audit API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API, plus the calendar view body.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::models::DayMeta;
use crate::synthesis::CycleCalendar;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<AuditError> for ApiErrorResponse {
    fn from(error: AuditError) -> Self {
        match error {
            AuditError::ConfigNotFound { .. }
            | AuditError::ConfigParseError { .. }
            | AuditError::InvalidTimezone { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    error.to_string(),
                ),
            },
            AuditError::DayIndexOutOfRange { index } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "DAY_OUT_OF_RANGE",
                    format!("Day index {} is outside the cycle", index),
                    "Day indices run from 0 to 13",
                ),
            },
            AuditError::Transport { .. }
            | AuditError::UpstreamStatus { .. }
            | AuditError::MalformedPayload { .. } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "UPSTREAM_ERROR",
                    "Backend unreachable",
                    error.to_string(),
                ),
            },
            AuditError::NothingToExport => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "NOTHING_TO_EXPORT",
                    error.to_string(),
                    "Run an audit that produces a valid roster before exporting",
                ),
            },
            AuditError::ExportFailed { message } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details("EXPORT_FAILED", "Export failed", message),
            },
        }
    }
}

/// Body of `GET /calendar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    /// Cycle title, e.g. "5 Jan – 18 Jan".
    pub title: String,
    /// First day of the cycle.
    pub start: NaiveDate,
    /// Last day of the cycle.
    pub end: NaiveDate,
    /// Reference timezone name.
    pub timezone: String,
    /// The 14 day descriptors.
    pub days: Vec<DayMeta>,
    /// Cycle day that `now` falls on, absent outside the cycle.
    pub today: Option<usize>,
}

impl CalendarResponse {
    /// Describes `calendar` as seen at `now`.
    pub fn at(calendar: &CycleCalendar, now: DateTime<Utc>) -> Self {
        Self {
            title: calendar.title(),
            start: calendar.start(),
            end: calendar.end(),
            timezone: calendar.zone().name().to_string(),
            days: calendar.days().to_vec(),
            today: calendar.day_index_of(now),
        }
    }
}
