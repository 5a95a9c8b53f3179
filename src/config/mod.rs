//! Configuration loading and management for the roster audit service.
//!
//! This module loads the service configuration from a YAML file: ward
//! branding, the active cycle and its reference timezone, the rostering
//! backend, and the HTTP listener.
//!
//! # Example
//!
//! ```no_run
//! use roster_audit::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/audit.yaml").unwrap();
//! println!("Publishing for {}", config.branding().ward);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_PATH_ENV, ConfigLoader, DEFAULT_CONFIG_PATH};
pub use types::{
    AuditConfig, BackendSection, CycleSection, DEFAULT_REQUEST_TIMEOUT_SECS, RosterSection,
    ServerSection, TelemetrySection,
};
