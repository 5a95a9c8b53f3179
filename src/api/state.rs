//! Application state for the roster audit API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::audit::{AuditCoordinator, SynthesisContext};
use crate::config::ConfigLoader;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration, the synthesis context derived from it, and the
/// coordinator owning the audit-run lifecycle.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    context: Arc<SynthesisContext>,
    coordinator: Arc<AuditCoordinator>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(config: ConfigLoader, coordinator: AuditCoordinator) -> Self {
        let context = config.synthesis_context();
        Self {
            config: Arc::new(config),
            context: Arc::new(context),
            coordinator: Arc::new(coordinator),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the calendar and branding used for synthesis.
    pub fn context(&self) -> &SynthesisContext {
        &self.context
    }

    /// Returns the audit-run coordinator.
    pub fn coordinator(&self) -> &AuditCoordinator {
        &self.coordinator
    }
}
