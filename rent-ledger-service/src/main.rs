use rent_ledger_service::config::LedgerConfig;
use rent_ledger_service::services::init_metrics;
use rent_ledger_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Metrics recorder must exist before anything is recorded
    init_metrics();

    let config = LedgerConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        "rent-ledger-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to build application");
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    application.run_until_stopped().await
}
