//! # gc-client
//!
//! HTTP client for the GoCardless Pro API.
//!
//! This crate provides:
//!
//! 1. **GoCardlessClient** - typed endpoints for creditors, customers,
//!    bank accounts, mandates, payments, refunds, subscriptions, payouts,
//!    redirect flows and events
//!    - Upstream errors classified into `ApiError` variants
//!    - Optional expansion of event links into full resources
//!    - Payout reconciliation from the event stream
//!
//! 2. **WebhookVerifier** - HMAC-SHA256 webhook signature checks and event
//!    extraction
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gc_client::GoCardlessClient;
//! use gc_core::{ApiError, ListOptions};
//!
//! let client = GoCardlessClient::from_env()?;
//!
//! match client.get_payment("PM123").await {
//!     Ok(payment) => println!("{:?}", payment.status),
//!     Err(ApiError::ResourceNotFound { message, .. }) => println!("{}", message),
//!     Err(e) => return Err(e),
//! }
//!
//! let report = client.reconcile_payout("PO123").await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use gc_client::{dispatch_webhook_event, LoggingWebhookHandler, WebhookVerifier};
//!
//! let verifier = WebhookVerifier::new(secret);
//! if verifier.verify(&body, signature) {
//!     for event in verifier.events(&body)? {
//!         dispatch_webhook_event(&LoggingWebhookHandler, &event)?;
//!     }
//! }
//! ```

pub mod classify;
pub mod client;
pub mod config;
pub mod envelope;
pub mod webhook;

// Re-exports
pub use classify::classify_failure;
pub use client::GoCardlessClient;
pub use config::{ClientConfig, Environment};
pub use webhook::{
    compute_signature, dispatch_webhook_event, LoggingWebhookHandler, WebhookHandler,
    WebhookVerifier, SIGNATURE_HEADER,
};
