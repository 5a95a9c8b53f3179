//! Roster audit service for fortnightly nursing rosters.
//!
//! This crate joins staff profiles, solver roster blocks and per-staff
//! analytics into one published roster matrix, annotates it with compliance
//! state, and labels its 14 days in a fixed reference timezone.

#![warn(missing_docs)]

pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod models;
pub mod sources;
pub mod synthesis;
pub mod telemetry;
