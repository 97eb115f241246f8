//! # Request Handlers
//!
//! Axum request handlers for webhooks, events and payout reconciliation.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use gc_client::{dispatch_webhook_event, SIGNATURE_HEADER};
use gc_core::{reconcile_payout as reconcile, ApiError, Event, PayoutReconciliation};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query parameters for `GET /api/v1/events/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    #[serde(default)]
    pub include_resources: bool,
}

/// Reconciliation report plus its derived net amount
#[derive(Debug, Serialize)]
pub struct ReconciliationResponse {
    #[serde(flatten)]
    pub report: PayoutReconciliation,
    pub net_amount: i64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<gc_core::ErrorDetail>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: Vec::new(),
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn api_error_to_response(err: ApiError) -> HandlerError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    response.details = err.details().to_vec();
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Malformed webhook bodies are the sender's fault, not an upstream failure
fn webhook_error_to_response(err: ApiError) -> HandlerError {
    match err {
        ApiError::Decode(message) => {
            warn!("Rejected malformed webhook: {}", message);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!("Malformed webhook body: {}", message), 400)),
            )
        }
        other => api_error_to_response(other),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "gocardless-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handle a GoCardless webhook delivery
#[instrument(skip(state, headers, body), fields(len = body.len()))]
pub async fn gocardless_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, HandlerError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing Webhook-Signature header", 400)),
            )
        })?;

    let verifier = state.verifier.as_ref().ok_or_else(|| {
        error!("Webhook received but no webhook secret is configured");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Webhooks not configured", 500)),
        )
    })?;

    let events = verifier
        .authenticated_events(&body, signature)
        .map_err(webhook_error_to_response)?;

    info!("Received webhook with {} events", events.len());

    for event in &events {
        dispatch_webhook_event(state.handler.as_ref(), event).map_err(|e| {
            error!("Webhook handler error: {}", e);
            api_error_to_response(e)
        })?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Reconcile a payout against the payments and refunds settled in it
#[instrument(skip(state))]
pub async fn reconcile_payout(
    State(state): State<AppState>,
    Path(payout_id): Path<String>,
) -> Result<Json<ReconciliationResponse>, HandlerError> {
    let report = reconcile(state.gateway.as_ref(), &payout_id)
        .await
        .map_err(|e| {
            warn!("Reconciliation of {} failed: {}", payout_id, e);
            api_error_to_response(e)
        })?;

    let net_amount = report.net_amount();
    Ok(Json(ReconciliationResponse { report, net_amount }))
}

/// Fetch one event, optionally with its linked resources
#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<EventQuery>,
) -> Result<Json<Event>, HandlerError> {
    let event = state
        .gateway
        .get_event(&event_id, query.include_resources)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert!(err.details.is_empty());
    }

    #[test]
    fn test_api_error_conversion() {
        let (status, _) = api_error_to_response(ApiError::SettlementEventNotFound {
            payout_id: "PO1".to_string(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, Json(body)) = api_error_to_response(ApiError::Validation {
            message: "Validation failed".to_string(),
            code: 422,
            errors: vec![gc_core::ErrorDetail::with_reason("invalid_amount")],
        });
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.details.len(), 1);
    }

    #[test]
    fn test_webhook_error_conversion() {
        let (status, Json(body)) =
            webhook_error_to_response(ApiError::Decode("missing field `action`".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 400);

        let (status, _) = webhook_error_to_response(ApiError::WebhookSignatureMismatch);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
