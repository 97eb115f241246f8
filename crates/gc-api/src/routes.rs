//! # Routes
//!
//! Axum router configuration for the GoCardless service.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// Routes:
/// - GET  /health - Liveness check
/// - POST /webhook/gocardless - Signed webhook deliveries
/// - GET  /api/v1/payouts/{payout_id}/reconciliation - Payout reconciliation
/// - GET  /api/v1/events/{event_id}?include_resources=true - Single event
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/payouts/{payout_id}/reconciliation",
            get(handlers::reconcile_payout),
        )
        .route("/events/{event_id}", get(handlers::get_event));

    // Webhooks must see the raw body for signature checks
    let webhook_routes = Router::new().route("/gocardless", post(handlers::gocardless_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        .nest("/webhook", webhook_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
