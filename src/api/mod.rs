//! HTTP API module for the roster audit service.
//!
//! This module provides the REST endpoints for synthesizing a published
//! roster, reading the cycle calendar, and driving audit runs.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::SynthesisRequest;
pub use response::{ApiError, ApiErrorResponse, CalendarResponse};
pub use state::AppState;
