//! # Payout Reconciliation
//!
//! The API has no endpoint for "what is inside this payout". It is derived
//! from the event stream instead:
//!
//! 1. the payout's `paid` event is the settlement event,
//! 2. every payment/refund event settled in the payout names the
//!    settlement event as its `parent_event`,
//! 3. expanding those child events yields the payments and refunds.
//!
//! The calls are sequential and not atomic; a resource changing mid-way can
//! produce an inconsistent report.

use crate::error::{ApiError, ApiResult};
use crate::gateway::{Gateway, ListOptions};
use crate::resource::{Payment, Payout, Refund};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// A payout together with the payments and refunds settled in it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutReconciliation {
    pub payout: Payout,
    pub payments: Vec<Payment>,
    pub refunds: Vec<Refund>,
}

impl PayoutReconciliation {
    /// Sum of payment amounts minus refund amounts, in minor units
    pub fn net_amount(&self) -> i64 {
        let paid: i64 = self.payments.iter().filter_map(|p| p.amount).sum();
        let refunded: i64 = self.refunds.iter().filter_map(|r| r.amount).sum();
        paid - refunded
    }
}

/// Assemble the reconciliation report for `payout_id`.
///
/// Fails with [`ApiError::SettlementEventNotFound`] when the payout has no
/// `paid` event yet. Any fetch failure aborts the whole report.
#[instrument(skip(gateway))]
pub async fn reconcile_payout<G>(gateway: &G, payout_id: &str) -> ApiResult<PayoutReconciliation>
where
    G: Gateway + ?Sized,
{
    let paid_filter = ListOptions::new()
        .with("payout", payout_id)
        .with("action", "paid");

    let settlement = gateway
        .list_events(&paid_filter, false)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::SettlementEventNotFound {
            payout_id: payout_id.to_string(),
        })?;

    let settlement_id = settlement.id.ok_or_else(|| {
        ApiError::Decode(format!("Settlement event for payout {} has no id", payout_id))
    })?;

    debug!("Settlement event for payout {}: {}", payout_id, settlement_id);

    let children = gateway
        .list_events(&ListOptions::new().with("parent_event", &settlement_id), true)
        .await?;

    let mut payments = Vec::new();
    let mut refunds = Vec::new();

    for mut event in children {
        match event.resource_type.as_str() {
            "payments" => match event.take_resource("payment").and_then(|r| r.into_payment()) {
                Some(payment) => payments.push(payment),
                None => warn!("Payment event {:?} has no payment resource", event.id),
            },
            "refunds" => match event.take_resource("refund").and_then(|r| r.into_refund()) {
                Some(refund) => refunds.push(refund),
                None => warn!("Refund event {:?} has no refund resource", event.id),
            },
            _ => {}
        }
    }

    let payout = gateway.get_payout(payout_id).await?;

    info!(
        "Reconciled payout {}: {} payments, {} refunds",
        payout_id,
        payments.len(),
        refunds.len()
    );

    Ok(PayoutReconciliation {
        payout,
        payments,
        refunds,
    })
}
