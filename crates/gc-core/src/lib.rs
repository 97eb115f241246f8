//! # gc-core
//!
//! Core types for the GoCardless Pro client.
//!
//! This crate provides:
//! - `ApiError` for typed upstream failures
//! - Domain entities (`Payment`, `Mandate`, `Payout`, ...) and `Event`
//! - `Gateway` trait the reconciliation logic runs against
//! - `LinkResolver` for hydrating event links into resources
//! - `reconcile_payout` for deriving a payout's payments and refunds
//!
//! ## Example
//!
//! ```rust,ignore
//! use gc_core::{reconcile_payout, ApiError};
//!
//! match reconcile_payout(&client, "PO123").await {
//!     Ok(report) => println!("{} payments", report.payments.len()),
//!     Err(ApiError::SettlementEventNotFound { .. }) => println!("not paid yet"),
//!     Err(e) => return Err(e),
//! }
//! ```

pub mod error;
pub mod event;
pub mod gateway;
pub mod reconcile;
pub mod resource;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use error::{ApiError, ApiResult, ErrorDetail};
pub use event::{Event, LinkResolver};
pub use gateway::{Gateway, ListOptions, SharedGateway};
pub use reconcile::{reconcile_payout, PayoutReconciliation};
pub use resource::{
    BankDetails, BankDetailsLookup, Creditor, CreditorBankAccount, Customer,
    CustomerBankAccount, Links, Mandate, MandatePdf, Metadata, Payment, Payout, RedirectFlow,
    Refund, Resource, ResourceKind, Subscription, UpcomingPayment,
};
