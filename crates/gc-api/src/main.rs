//! # gocardless-service
//!
//! Webhook receiver and reconciliation API for a GoCardless Pro account.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export GOCARDLESS_ACCESS_TOKEN=sandbox_...
//! export GOCARDLESS_ENVIRONMENT=sandbox
//! export GOCARDLESS_WEBHOOK_SECRET=...
//!
//! # Run the server
//! gocardless-service
//! ```

use gc_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Webhooks: {}",
        if state.verifier.is_some() { "enabled" } else { "disabled" }
    );

    let app = routes::create_router(state);

    info!(
        "gocardless-service {} starting on http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Webhook: POST http://{}/webhook/gocardless", addr);
        info!(
            "Reconciliation: GET http://{}/api/v1/payouts/{{id}}/reconciliation",
            addr
        );
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
