use checkout_frontend::config::get_configuration;
use checkout_frontend::services::{BackendClient, HostedCheckout};
use checkout_frontend::startup::build_router;
use checkout_frontend::AppState;
use dotenvy::dotenv;
use service_core::observability::init_tracing;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "checkout-frontend",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;

    checkout_frontend::services::metrics::init_metrics()?;

    let backend = BackendClient::new(&configuration.backend)?;
    info!(backend = %backend.base_url(), "Using cart backend");

    let state = AppState::new(
        Arc::new(backend),
        Arc::new(HostedCheckout),
        configuration.checkout.clone(),
    );
    let app = build_router(state, &configuration.server.static_dir);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting checkout-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
