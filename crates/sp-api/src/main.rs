//! # shurjoPay Gateway Service
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export SP_ENDPOINT=https://sandbox.shurjopayment.com
//! export SP_USERNAME=sp_sandbox
//! export SP_PASSWORD=...
//! export SP_PREFIX=NOK
//! export SP_RETURN_URL=http://localhost:8080/return
//!
//! # Run the server
//! shurjopay-gateway
//! ```

use sp_api::{routes, state::AppState, telemetry, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Flushes the log file when dropped at the end of main
    let _log_guard = telemetry::init(&config);

    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    info!("Environment: {}", config.environment);

    let state = AppState::new(config)?;
    info!("Payment provider: {}", state.gateway.provider_name());

    let app = routes::create_router(state);

    info!("shurjoPay gateway service starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: POST http://{}/api/v1/checkout", addr);
        info!("Return page: GET http://{}/return?order_id=...", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
