//! HTTP request handlers for the roster audit API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::build_outcome;

use super::request::SynthesisRequest;
use super::response::{ApiError, ApiErrorResponse, CalendarResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/synthesize", post(synthesize_handler))
        .route("/calendar", get(calendar_handler))
        .route("/audit-runs", post(trigger_run_handler))
        .route("/audit-runs/latest", get(latest_run_handler))
        .route("/audit-runs/latest/export", post(export_handler))
        .with_state(state)
}

/// Handler for POST /synthesize.
///
/// Builds the published view from payloads supplied in the body.
async fn synthesize_handler(
    State(state): State<AppState>,
    payload: Result<Json<SynthesisRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing synthesis request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_to_error(correlation_id, rejection);
            return ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error,
            }
            .into_response();
        }
    };

    let start_time = Instant::now();
    let outcome = build_outcome(&request.profiles, &request.result, state.context(), Utc::now());
    info!(
        correlation_id = %correlation_id,
        profiles = request.profiles.len(),
        rows = outcome.snapshot().map_or(0, |s| s.rows.len()),
        duration_us = start_time.elapsed().as_micros() as u64,
        "Synthesis completed"
    );

    json_ok(&outcome)
}

/// Handler for GET /calendar.
async fn calendar_handler(State(state): State<AppState>) -> Response {
    json_ok(&CalendarResponse::at(state.config().calendar(), Utc::now()))
}

/// Handler for POST /audit-runs.
///
/// Triggers a run against the collaborators and answers once it settles.
async fn trigger_run_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let (trigger, run_state) = state.coordinator().run().await;
    info!(correlation_id = %correlation_id, %trigger, "Audit run requested");
    json_ok(&run_state)
}

/// Handler for GET /audit-runs/latest.
async fn latest_run_handler(State(state): State<AppState>) -> Response {
    json_ok(&state.coordinator().state().await)
}

/// Handler for POST /audit-runs/latest/export.
async fn export_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.coordinator().export_latest().await {
        Ok(receipt) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %receipt.run_id,
                location = %receipt.location,
                "Export completed"
            );
            json_ok(&receipt)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Export failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn json_ok<T: serde::Serialize>(body: &T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn rejection_to_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}
