use std::error::Error;
use std::sync::Arc;

use roster_audit::api::{AppState, create_router};
use roster_audit::audit::{AuditCoordinator, AuditTracker};
use roster_audit::config::ConfigLoader;
use roster_audit::sources::{HttpExportSink, HttpRosterBackend};
use roster_audit::telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ConfigLoader::load_from_env()?;
    telemetry::init(&config.config().telemetry.log_level)?;

    let timeout = config.request_timeout();
    let backend = Arc::new(HttpRosterBackend::new(config.base_url().clone(), timeout)?);
    let exporter = Arc::new(HttpExportSink::new(
        config.base_url().clone(),
        config.config().backend.export_directory.clone(),
        timeout,
    )?);

    let coordinator = AuditCoordinator::new(
        AuditTracker::new(config.synthesis_context()),
        backend.clone(),
        backend,
        exporter,
    );

    let address = config.bind_address();
    info!(
        address = %address,
        backend = %config.base_url(),
        cycle = %config.calendar().title(),
        "Starting roster audit service"
    );

    let router = create_router(AppState::new(config, coordinator));
    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
