//! # Webhook Handling
//!
//! GoCardless signs each webhook body with HMAC-SHA256 using the endpoint
//! secret and sends the hex digest in the `Webhook-Signature` header. A
//! body carries a batch of events: `{ "events": [ ... ] }`.
//!
//! Always call [`WebhookVerifier::verify`] before trusting the output of
//! [`WebhookVerifier::events`]; parsing does not re-check the signature.

use gc_core::{ApiError, ApiResult, Event};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, info, instrument, warn};

type HmacSha256 = Hmac<Sha256>;

/// Request header carrying the signature
pub const SIGNATURE_HEADER: &str = "Webhook-Signature";

#[derive(Debug, Deserialize)]
struct WebhookBody {
    events: Vec<Event>,
}

/// Verifies and parses webhook deliveries for one endpoint secret
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Check `signature` against the HMAC of the raw `body`.
    ///
    /// A mismatch is an ordinary `false`, not an error.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        let expected = compute_signature(&self.secret, body);
        expected.as_bytes().ct_eq(signature.trim().as_bytes()).into()
    }

    /// Decode the events in a webhook body
    pub fn events(&self, body: &[u8]) -> ApiResult<Vec<Event>> {
        let parsed: WebhookBody = serde_json::from_slice(body)
            .map_err(|e| ApiError::Decode(format!("Invalid webhook body: {}", e)))?;
        Ok(parsed.events)
    }

    /// Verify the signature, then decode the events
    #[instrument(skip(self, body, signature), fields(len = body.len()))]
    pub fn authenticated_events(&self, body: &[u8], signature: &str) -> ApiResult<Vec<Event>> {
        if !self.verify(body, signature) {
            warn!("Rejected webhook with invalid signature");
            return Err(ApiError::WebhookSignatureMismatch);
        }
        let events = self.events(body)?;
        debug!("Verified webhook with {} events", events.len());
        Ok(events)
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

/// Hex-encoded HMAC-SHA256 of `body` keyed with `secret`
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Webhook event handler trait
///
/// Implement this trait to react to events by resource type. Every method
/// defaults to logging the event.
pub trait WebhookHandler: Send + Sync {
    fn on_mandate_event(&self, event: &Event) -> ApiResult<()> {
        info!("Mandate {}: {:?}", event.action, event.link("mandate"));
        Ok(())
    }

    fn on_payment_event(&self, event: &Event) -> ApiResult<()> {
        info!("Payment {}: {:?}", event.action, event.link("payment"));
        Ok(())
    }

    fn on_payout_event(&self, event: &Event) -> ApiResult<()> {
        info!("Payout {}: {:?}", event.action, event.link("payout"));
        Ok(())
    }

    fn on_refund_event(&self, event: &Event) -> ApiResult<()> {
        info!("Refund {}: {:?}", event.action, event.link("refund"));
        Ok(())
    }

    fn on_subscription_event(&self, event: &Event) -> ApiResult<()> {
        info!(
            "Subscription {}: {:?}",
            event.action,
            event.link("subscription")
        );
        Ok(())
    }

    /// Called for resource types without a dedicated method
    fn on_other_event(&self, event: &Event) -> ApiResult<()> {
        debug!(
            "Unhandled webhook event: {} {}",
            event.resource_type, event.action
        );
        Ok(())
    }
}

/// Default no-op webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch one event to the handler method for its resource type
pub fn dispatch_webhook_event(handler: &dyn WebhookHandler, event: &Event) -> ApiResult<()> {
    match event.resource_type.as_str() {
        "mandates" => handler.on_mandate_event(event),
        "payments" => handler.on_payment_event(event),
        "payouts" => handler.on_payout_event(event),
        "refunds" => handler.on_refund_event(event),
        "subscriptions" => handler.on_subscription_event(event),
        _ => handler.on_other_event(event),
    }
}
