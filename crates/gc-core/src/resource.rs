//! # Resource Types
//!
//! Domain entities returned by the GoCardless Pro API.
//!
//! Every entity decodes from the record found inside a resource envelope
//! and encodes back to the record sent when creating it. Read-only fields
//! (`id`, `created_at`, `status`, ...) are optional so the same type serves
//! both directions; absent fields are omitted from request bodies.

use crate::event::Event;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Relation name → linked resource id
pub type Links = HashMap<String, String>;

/// Free-form key/value metadata attached by the integrator
pub type Metadata = HashMap<String, String>;

/// Kinds of resource that can be fetched by id.
///
/// This is the static table event links are resolved against: a link's
/// relation name (with any `parent_` prefix removed) maps to at most one
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Creditor,
    CreditorBankAccount,
    Customer,
    CustomerBankAccount,
    Event,
    Mandate,
    Payment,
    Payout,
    Refund,
    RedirectFlow,
    Subscription,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Creditor,
        ResourceKind::CreditorBankAccount,
        ResourceKind::Customer,
        ResourceKind::CustomerBankAccount,
        ResourceKind::Event,
        ResourceKind::Mandate,
        ResourceKind::Payment,
        ResourceKind::Payout,
        ResourceKind::Refund,
        ResourceKind::RedirectFlow,
        ResourceKind::Subscription,
    ];

    /// Singular relation name used in `links`
    pub fn relation(&self) -> &'static str {
        match self {
            ResourceKind::Creditor => "creditor",
            ResourceKind::CreditorBankAccount => "creditor_bank_account",
            ResourceKind::Customer => "customer",
            ResourceKind::CustomerBankAccount => "customer_bank_account",
            ResourceKind::Event => "event",
            ResourceKind::Mandate => "mandate",
            ResourceKind::Payment => "payment",
            ResourceKind::Payout => "payout",
            ResourceKind::Refund => "refund",
            ResourceKind::RedirectFlow => "redirect_flow",
            ResourceKind::Subscription => "subscription",
        }
    }

    /// Collection name used as the endpoint path and envelope key
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Creditor => "creditors",
            ResourceKind::CreditorBankAccount => "creditor_bank_accounts",
            ResourceKind::Customer => "customers",
            ResourceKind::CustomerBankAccount => "customer_bank_accounts",
            ResourceKind::Event => "events",
            ResourceKind::Mandate => "mandates",
            ResourceKind::Payment => "payments",
            ResourceKind::Payout => "payouts",
            ResourceKind::Refund => "refunds",
            ResourceKind::RedirectFlow => "redirect_flows",
            ResourceKind::Subscription => "subscriptions",
        }
    }

    /// Look up a kind by its singular relation name
    pub fn from_relation(relation: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.relation() == relation)
    }
}

/// A fully hydrated resource, as stored in `Event::resources`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Creditor(Creditor),
    CreditorBankAccount(CreditorBankAccount),
    Customer(Customer),
    CustomerBankAccount(CustomerBankAccount),
    Event(Box<Event>),
    Mandate(Mandate),
    Payment(Payment),
    Payout(Payout),
    Refund(Refund),
    RedirectFlow(RedirectFlow),
    Subscription(Subscription),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Creditor(_) => ResourceKind::Creditor,
            Resource::CreditorBankAccount(_) => ResourceKind::CreditorBankAccount,
            Resource::Customer(_) => ResourceKind::Customer,
            Resource::CustomerBankAccount(_) => ResourceKind::CustomerBankAccount,
            Resource::Event(_) => ResourceKind::Event,
            Resource::Mandate(_) => ResourceKind::Mandate,
            Resource::Payment(_) => ResourceKind::Payment,
            Resource::Payout(_) => ResourceKind::Payout,
            Resource::Refund(_) => ResourceKind::Refund,
            Resource::RedirectFlow(_) => ResourceKind::RedirectFlow,
            Resource::Subscription(_) => ResourceKind::Subscription,
        }
    }

    pub fn as_payment(&self) -> Option<&Payment> {
        match self {
            Resource::Payment(payment) => Some(payment),
            _ => None,
        }
    }

    pub fn as_refund(&self) -> Option<&Refund> {
        match self {
            Resource::Refund(refund) => Some(refund),
            _ => None,
        }
    }

    pub fn into_payment(self) -> Option<Payment> {
        match self {
            Resource::Payment(payment) => Some(payment),
            _ => None,
        }
    }

    pub fn into_refund(self) -> Option<Refund> {
        match self {
            Resource::Refund(refund) => Some(refund),
            _ => None,
        }
    }
}

/// Drop `null` members so update bodies only carry fields that are set
fn without_nulls(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        map.retain(|_, v| !v.is_null());
    }
    value
}

// =============================================================================
// Creditors
// =============================================================================

/// The merchant collecting payments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Creditor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

impl Creditor {
    /// Body accepted by `PUT /creditors/{id}`
    pub fn update_body(&self) -> Value {
        without_nulls(json!({
            "name": self.name,
            "address_line1": self.address_line1,
            "address_line2": self.address_line2,
            "address_line3": self.address_line3,
            "city": self.city,
            "region": self.region,
            "postal_code": self.postal_code,
            "country_code": self.country_code,
        }))
    }
}

/// Bank account payouts are sent to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditorBankAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    /// Write-only; the API returns `account_number_ending` instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number_ending: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_as_default_payout_account: Option<bool>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
}

impl Customer {
    /// Body accepted by `PUT /customers/{id}`
    pub fn update_body(&self) -> Value {
        let mut body = without_nulls(json!({
            "email": self.email,
            "given_name": self.given_name,
            "family_name": self.family_name,
            "company_name": self.company_name,
            "address_line1": self.address_line1,
            "address_line2": self.address_line2,
            "address_line3": self.address_line3,
            "city": self.city,
            "region": self.region,
            "postal_code": self.postal_code,
            "country_code": self.country_code,
            "language": self.language,
        }));
        if !self.metadata.is_empty() {
            body["metadata"] = json!(self.metadata);
        }
        body
    }
}

/// Bank account a customer is debited from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerBankAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number_ending: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

// =============================================================================
// Mandates
// =============================================================================

/// Authorisation to debit a customer bank account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mandate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// `bacs`, `sepa_core`, `autogiro`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_possible_charge_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

impl Mandate {
    /// Mandate for an existing customer bank account
    pub fn for_bank_account(creditor_id: &str, customer_bank_account_id: &str) -> Self {
        let mut links = Links::new();
        links.insert("creditor".to_string(), creditor_id.to_string());
        links.insert(
            "customer_bank_account".to_string(),
            customer_bank_account_id.to_string(),
        );
        Self {
            links,
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

/// Temporary URL to a generated mandate PDF
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MandatePdf {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_holder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandate_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

// =============================================================================
// Payments & Refunds
// =============================================================================

/// A single collection against a mandate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Amount in minor units (pence, cents)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_refunded: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

impl Payment {
    pub fn new(amount: i64, currency: impl Into<String>, mandate_id: &str) -> Self {
        let mut links = Links::new();
        links.insert("mandate".to_string(), mandate_id.to_string());
        Self {
            amount: Some(amount),
            currency: Some(currency.into()),
            links,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// Total refunded on the payment after this refund; guards against
    /// accidental duplicate refunds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount_confirmation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

impl Refund {
    /// Refund `amount` of `payment`, confirming the new refunded total
    pub fn for_payment(payment: &Payment, amount: i64) -> Self {
        let mut links = Links::new();
        if let Some(id) = &payment.id {
            links.insert("payment".to_string(), id.clone());
        }
        Self {
            amount: Some(amount),
            total_amount_confirmation: Some(payment.amount_refunded.unwrap_or(0) + amount),
            links,
            ..Default::default()
        }
    }

    /// Body accepted by `PUT /refunds/{id}`
    pub fn update_body(&self) -> Value {
        json!({ "metadata": self.metadata })
    }
}

// =============================================================================
// Payouts
// =============================================================================

/// Transfer of collected funds to a creditor bank account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

// =============================================================================
// Redirect flows
// =============================================================================

/// Hosted page flow that sets up a customer, bank account and mandate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedirectFlow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_redirect_url: Option<String>,
    /// Where to send the customer; returned on create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

impl RedirectFlow {
    pub fn new(
        description: impl Into<String>,
        session_token: impl Into<String>,
        success_redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            description: Some(description.into()),
            session_token: Some(session_token.into()),
            success_redirect_url: Some(success_redirect_url.into()),
            ..Default::default()
        }
    }

    /// Mandate created once the flow is completed
    pub fn mandate_id(&self) -> Option<&str> {
        self.links.get("mandate").map(|s| s.as_str())
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Recurring payments against a mandate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// `weekly`, `monthly` or `yearly`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upcoming_payments: Vec<UpcomingPayment>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,
}

impl Subscription {
    /// Body accepted by `PUT /subscriptions/{id}`
    pub fn update_body(&self) -> Value {
        let mut body = without_nulls(json!({
            "name": self.name,
            "payment_reference": self.payment_reference,
        }));
        if !self.metadata.is_empty() {
            body["metadata"] = json!(self.metadata);
        }
        body
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingPayment {
    pub charge_date: NaiveDate,
    pub amount: i64,
}

// =============================================================================
// Bank details lookups
// =============================================================================

/// Account details to validate, by IBAN or by local details
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BankDetails {
    Iban {
        iban: String,
    },
    Local {
        account_number: String,
        branch_code: String,
        country_code: String,
    },
}

impl From<&CustomerBankAccount> for BankDetails {
    fn from(account: &CustomerBankAccount) -> Self {
        match &account.iban {
            Some(iban) => BankDetails::Iban { iban: iban.clone() },
            None => BankDetails::Local {
                account_number: account.account_number.clone().unwrap_or_default(),
                branch_code: account.branch_code.clone().unwrap_or_default(),
                country_code: account.country_code.clone().unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankDetailsLookup {
    #[serde(default)]
    pub available_debit_schemes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_relation_table() {
        assert_eq!(ResourceKind::from_relation("payment"), Some(ResourceKind::Payment));
        assert_eq!(
            ResourceKind::from_relation("customer_bank_account"),
            Some(ResourceKind::CustomerBankAccount)
        );
        assert_eq!(ResourceKind::from_relation("payments"), None);
        assert_eq!(ResourceKind::from_relation("organisation"), None);

        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_relation(kind.relation()), Some(kind));
        }
    }

    #[test]
    fn test_payment_decodes_api_record() {
        let payment: Payment = serde_json::from_value(json!({
            "id": "PM123",
            "created_at": "2014-05-08T17:01:06.000Z",
            "charge_date": "2014-05-21",
            "amount": 100,
            "amount_refunded": 0,
            "currency": "GBP",
            "status": "paid_out",
            "reference": "WINEBOX001",
            "metadata": { "order_dispatch_date": "2014-05-22" },
            "links": { "mandate": "MD123", "creditor": "CR123", "payout": "PO123" },
            "description": null,
            "unknown_field": true
        }))
        .unwrap();

        assert_eq!(payment.id.as_deref(), Some("PM123"));
        assert_eq!(payment.amount, Some(100));
        assert_eq!(
            payment.charge_date,
            NaiveDate::from_ymd_opt(2014, 5, 21)
        );
        assert_eq!(payment.links["payout"], "PO123");
        assert!(payment.created_at.is_some());
    }

    #[test]
    fn test_new_payment_omits_unset_fields() {
        let payment = Payment::new(1500, "GBP", "MD123");
        let body = serde_json::to_value(&payment).unwrap();

        assert_eq!(
            body,
            json!({ "amount": 1500, "currency": "GBP", "links": { "mandate": "MD123" } })
        );
    }

    #[test]
    fn test_refund_confirms_running_total() {
        let payment = Payment {
            id: Some("PM1".to_string()),
            amount: Some(1000),
            amount_refunded: Some(250),
            ..Default::default()
        };

        let refund = Refund::for_payment(&payment, 100);
        assert_eq!(refund.amount, Some(100));
        assert_eq!(refund.total_amount_confirmation, Some(350));
        assert_eq!(refund.links["payment"], "PM1");
    }

    #[test]
    fn test_update_bodies_skip_unset_fields() {
        let customer = Customer {
            id: Some("CU1".to_string()),
            email: Some("user@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(customer.update_body(), json!({ "email": "user@example.com" }));

        let mut refund = Refund::default();
        refund.metadata.insert("reason".to_string(), "damaged".to_string());
        assert_eq!(refund.update_body(), json!({ "metadata": { "reason": "damaged" } }));
    }

    #[test]
    fn test_bank_details_from_account() {
        let account = CustomerBankAccount {
            account_number: Some("55779911".to_string()),
            branch_code: Some("200000".to_string()),
            country_code: Some("GB".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(BankDetails::from(&account)).unwrap(),
            json!({ "account_number": "55779911", "branch_code": "200000", "country_code": "GB" })
        );

        let account = CustomerBankAccount {
            iban: Some("GB60BARC20000055779911".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(BankDetails::from(&account)).unwrap(),
            json!({ "iban": "GB60BARC20000055779911" })
        );
    }
}
