//! # GoCardless Pro Client
//!
//! Typed access to the GoCardless Pro REST API.
//!
//! Every call sends the version, content-type and bearer headers, decodes
//! the resource envelope on success and runs the error classifier on any
//! non-2xx response.

use crate::classify::classify_failure;
use crate::config::ClientConfig;
use crate::envelope;
use async_trait::async_trait;
use gc_core::{
    reconcile_payout, ApiError, ApiResult, BankDetails, BankDetailsLookup, Creditor,
    CreditorBankAccount, Customer, CustomerBankAccount, Event, Gateway, LinkResolver,
    ListOptions, Mandate, MandatePdf, Payment, Payout, PayoutReconciliation, RedirectFlow,
    Refund, Resource, ResourceKind, Subscription,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

const CREDITORS: &str = "creditors";
const CREDITOR_BANK_ACCOUNTS: &str = "creditor_bank_accounts";
const CUSTOMERS: &str = "customers";
const CUSTOMER_BANK_ACCOUNTS: &str = "customer_bank_accounts";
const EVENTS: &str = "events";
const MANDATES: &str = "mandates";
const MANDATE_PDFS: &str = "mandate_pdfs";
const PAYMENTS: &str = "payments";
const PAYOUTS: &str = "payouts";
const REFUNDS: &str = "refunds";
const REDIRECT_FLOWS: &str = "redirect_flows";
const SUBSCRIPTIONS: &str = "subscriptions";
const BANK_DETAILS_LOOKUPS: &str = "bank_details_lookups";

const VERSION_HEADER: &str = "GoCardless-Version";

/// GoCardless Pro API client
///
/// Holds read-only configuration and a pooled HTTP client; cheap to share
/// behind an `Arc`.
pub struct GoCardlessClient {
    config: ClientConfig,
    client: Client,
    resolver: LinkResolver,
}

impl GoCardlessClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            resolver: LinkResolver::new(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// Builder: replace the table used to expand event links
    pub fn with_resolver(mut self, resolver: LinkResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Creditors
    // =========================================================================

    pub async fn create_creditor(&self, creditor: &Creditor) -> ApiResult<Creditor> {
        self.create(CREDITORS, creditor).await
    }

    pub async fn update_creditor(&self, creditor: &Creditor) -> ApiResult<Creditor> {
        let id = require_id(&creditor.id, "creditor")?;
        self.put(CREDITORS, id, creditor.update_body()).await
    }

    pub async fn list_creditors(&self, options: &ListOptions) -> ApiResult<Vec<Creditor>> {
        self.get(CREDITORS, None, options).await
    }

    pub async fn get_creditor(&self, id: &str) -> ApiResult<Creditor> {
        self.get(CREDITORS, Some(id), &ListOptions::new()).await
    }

    // =========================================================================
    // Creditor bank accounts
    // =========================================================================

    pub async fn create_creditor_bank_account(
        &self,
        account: &CreditorBankAccount,
    ) -> ApiResult<CreditorBankAccount> {
        self.create(CREDITOR_BANK_ACCOUNTS, account).await
    }

    pub async fn list_creditor_bank_accounts(
        &self,
        options: &ListOptions,
    ) -> ApiResult<Vec<CreditorBankAccount>> {
        self.get(CREDITOR_BANK_ACCOUNTS, None, options).await
    }

    pub async fn get_creditor_bank_account(&self, id: &str) -> ApiResult<CreditorBankAccount> {
        self.get(CREDITOR_BANK_ACCOUNTS, Some(id), &ListOptions::new())
            .await
    }

    pub async fn disable_creditor_bank_account(&self, id: &str) -> ApiResult<CreditorBankAccount> {
        self.action(CREDITOR_BANK_ACCOUNTS, id, "disable").await
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub async fn create_customer(&self, customer: &Customer) -> ApiResult<Customer> {
        self.create(CUSTOMERS, customer).await
    }

    pub async fn update_customer(&self, customer: &Customer) -> ApiResult<Customer> {
        let id = require_id(&customer.id, "customer")?;
        self.put(CUSTOMERS, id, customer.update_body()).await
    }

    pub async fn list_customers(&self, options: &ListOptions) -> ApiResult<Vec<Customer>> {
        self.get(CUSTOMERS, None, options).await
    }

    pub async fn get_customer(&self, id: &str) -> ApiResult<Customer> {
        self.get(CUSTOMERS, Some(id), &ListOptions::new()).await
    }

    // =========================================================================
    // Customer bank accounts
    // =========================================================================

    pub async fn create_customer_bank_account(
        &self,
        account: &CustomerBankAccount,
    ) -> ApiResult<CustomerBankAccount> {
        self.create(CUSTOMER_BANK_ACCOUNTS, account).await
    }

    pub async fn list_customer_bank_accounts(
        &self,
        options: &ListOptions,
    ) -> ApiResult<Vec<CustomerBankAccount>> {
        self.get(CUSTOMER_BANK_ACCOUNTS, None, options).await
    }

    pub async fn get_customer_bank_account(&self, id: &str) -> ApiResult<CustomerBankAccount> {
        self.get(CUSTOMER_BANK_ACCOUNTS, Some(id), &ListOptions::new())
            .await
    }

    pub async fn disable_customer_bank_account(&self, id: &str) -> ApiResult<CustomerBankAccount> {
        self.action(CUSTOMER_BANK_ACCOUNTS, id, "disable").await
    }

    // =========================================================================
    // Mandates
    // =========================================================================

    pub async fn create_mandate(&self, mandate: &Mandate) -> ApiResult<Mandate> {
        self.create(MANDATES, mandate).await
    }

    pub async fn list_mandates(&self, options: &ListOptions) -> ApiResult<Vec<Mandate>> {
        self.get(MANDATES, None, options).await
    }

    pub async fn get_mandate(&self, id: &str) -> ApiResult<Mandate> {
        self.get(MANDATES, Some(id), &ListOptions::new()).await
    }

    pub async fn cancel_mandate(&self, id: &str) -> ApiResult<Mandate> {
        self.action(MANDATES, id, "cancel").await
    }

    pub async fn reinstate_mandate(&self, id: &str) -> ApiResult<Mandate> {
        self.action(MANDATES, id, "reinstate").await
    }

    /// Generate a mandate PDF and return its temporary URL
    pub async fn create_mandate_pdf(&self, pdf: &MandatePdf) -> ApiResult<MandatePdf> {
        self.create(MANDATE_PDFS, pdf).await
    }

    // =========================================================================
    // Payments
    // =========================================================================

    pub async fn create_payment(&self, payment: &Payment) -> ApiResult<Payment> {
        self.create(PAYMENTS, payment).await
    }

    pub async fn list_payments(&self, options: &ListOptions) -> ApiResult<Vec<Payment>> {
        self.get(PAYMENTS, None, options).await
    }

    pub async fn get_payment(&self, id: &str) -> ApiResult<Payment> {
        self.get(PAYMENTS, Some(id), &ListOptions::new()).await
    }

    pub async fn cancel_payment(&self, id: &str) -> ApiResult<Payment> {
        self.action(PAYMENTS, id, "cancel").await
    }

    pub async fn retry_payment(&self, id: &str) -> ApiResult<Payment> {
        self.action(PAYMENTS, id, "retry").await
    }

    // =========================================================================
    // Refunds
    // =========================================================================

    pub async fn create_refund(&self, refund: &Refund) -> ApiResult<Refund> {
        self.create(REFUNDS, refund).await
    }

    pub async fn list_refunds(&self, options: &ListOptions) -> ApiResult<Vec<Refund>> {
        self.get(REFUNDS, None, options).await
    }

    pub async fn get_refund(&self, id: &str) -> ApiResult<Refund> {
        self.get(REFUNDS, Some(id), &ListOptions::new()).await
    }

    /// Only refund metadata can be updated
    pub async fn update_refund(&self, refund: &Refund) -> ApiResult<Refund> {
        let id = require_id(&refund.id, "refund")?;
        self.put(REFUNDS, id, refund.update_body()).await
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub async fn create_subscription(&self, subscription: &Subscription) -> ApiResult<Subscription> {
        self.create(SUBSCRIPTIONS, subscription).await
    }

    pub async fn list_subscriptions(&self, options: &ListOptions) -> ApiResult<Vec<Subscription>> {
        self.get(SUBSCRIPTIONS, None, options).await
    }

    pub async fn get_subscription(&self, id: &str) -> ApiResult<Subscription> {
        self.get(SUBSCRIPTIONS, Some(id), &ListOptions::new()).await
    }

    pub async fn update_subscription(&self, subscription: &Subscription) -> ApiResult<Subscription> {
        let id = require_id(&subscription.id, "subscription")?;
        self.put(SUBSCRIPTIONS, id, subscription.update_body())
            .await
    }

    pub async fn cancel_subscription(&self, id: &str) -> ApiResult<Subscription> {
        self.action(SUBSCRIPTIONS, id, "cancel").await
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// List events.
    ///
    /// With `with_resources` every event's links are fetched and stored in
    /// `Event::resources`, one extra request per link.
    #[instrument(skip(self))]
    pub async fn list_events(
        &self,
        options: &ListOptions,
        with_resources: bool,
    ) -> ApiResult<Vec<Event>> {
        let events: Vec<Event> = self.get(EVENTS, None, options).await?;
        if !with_resources {
            return Ok(events);
        }

        let mut expanded = Vec::with_capacity(events.len());
        for event in events {
            expanded.push(self.resolver.expand(self, event).await?);
        }
        Ok(expanded)
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, id: &str, with_resources: bool) -> ApiResult<Event> {
        let event: Event = self.get(EVENTS, Some(id), &ListOptions::new()).await?;
        if with_resources {
            self.resolver.expand(self, event).await
        } else {
            Ok(event)
        }
    }

    // =========================================================================
    // Payouts
    // =========================================================================

    pub async fn list_payouts(&self, options: &ListOptions) -> ApiResult<Vec<Payout>> {
        self.get(PAYOUTS, None, options).await
    }

    pub async fn get_payout(&self, id: &str) -> ApiResult<Payout> {
        self.get(PAYOUTS, Some(id), &ListOptions::new()).await
    }

    /// Payments and refunds settled in a payout, derived from its events
    pub async fn reconcile_payout(&self, id: &str) -> ApiResult<PayoutReconciliation> {
        reconcile_payout(self, id).await
    }

    // =========================================================================
    // Redirect flows
    // =========================================================================

    pub async fn create_redirect_flow(&self, flow: &RedirectFlow) -> ApiResult<RedirectFlow> {
        self.create(REDIRECT_FLOWS, flow).await
    }

    pub async fn get_redirect_flow(&self, id: &str) -> ApiResult<RedirectFlow> {
        self.get(REDIRECT_FLOWS, Some(id), &ListOptions::new()).await
    }

    /// Complete a flow once the customer returns; creates the mandate
    #[instrument(skip(self, session_token))]
    pub async fn complete_redirect_flow(
        &self,
        id: &str,
        session_token: &str,
    ) -> ApiResult<RedirectFlow> {
        let body = json!({ "data": { "session_token": session_token } });
        self.post(REDIRECT_FLOWS, &[id, "actions", "complete"], Some(body))
            .await
    }

    // =========================================================================
    // Bank details lookups
    // =========================================================================

    /// Validate bank details and list the schemes they can be debited with
    pub async fn lookup_bank_details(&self, details: &BankDetails) -> ApiResult<BankDetailsLookup> {
        self.create(BANK_DETAILS_LOOKUPS, details).await
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: Option<&str>,
        options: &ListOptions,
    ) -> ApiResult<T> {
        let body = self
            .send(Method::GET, collection, id.as_slice(), options, None)
            .await?;
        envelope::open(&body, collection)
    }

    async fn create<T, B>(&self, collection: &str, entity: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = envelope::wrap(collection, serde_json::to_value(entity)?);
        self.post(collection, &[], Some(payload)).await
    }

    async fn action<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        action: &str,
    ) -> ApiResult<T> {
        self.post(collection, &[id, "actions", action], None).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        collection: &str,
        path: &[&str],
        payload: Option<Value>,
    ) -> ApiResult<T> {
        let body = self
            .send(Method::POST, collection, path, &ListOptions::new(), payload)
            .await?;
        envelope::open(&body, collection)
    }

    async fn put<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        update: Value,
    ) -> ApiResult<T> {
        let payload = envelope::wrap(collection, update);
        let body = self
            .send(Method::PUT, collection, &[id], &ListOptions::new(), Some(payload))
            .await?;
        envelope::open(&body, collection)
    }

    /// Base URL plus `collection` and `path`, each segment percent-encoded
    fn url(&self, collection: &str, path: &[&str]) -> ApiResult<Url> {
        let base = &self.config.api_base_url;
        let mut url = Url::parse(base)
            .map_err(|e| ApiError::Configuration(format!("Invalid API base URL {}: {}", base, e)))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration(format!("API base URL cannot take a path: {}", base)))?
            .pop_if_empty()
            .push(collection)
            .extend(path);

        Ok(url)
    }

    /// Perform one request and return the raw body of a 2xx response
    async fn send(
        &self,
        method: Method,
        collection: &str,
        path: &[&str],
        options: &ListOptions,
        payload: Option<Value>,
    ) -> ApiResult<String> {
        let url = self.url(collection, path)?;
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(VERSION_HEADER, &self.config.api_version)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.config.auth_header());

        if !options.is_empty() {
            request = request.query(options.params());
        }
        if let Some(payload) = payload {
            request = request.body(serde_json::to_string(&payload)?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let target = request_target(response.url());
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("GoCardless API error: status={}, target={}, body={}", status, target, body);
            return Err(classify_failure(status.as_u16(), &target, &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl Gateway for GoCardlessClient {
    async fn list_events(
        &self,
        options: &ListOptions,
        with_resources: bool,
    ) -> ApiResult<Vec<Event>> {
        GoCardlessClient::list_events(self, options, with_resources).await
    }

    async fn get_event(&self, id: &str, with_resources: bool) -> ApiResult<Event> {
        GoCardlessClient::get_event(self, id, with_resources).await
    }

    async fn get_payout(&self, id: &str) -> ApiResult<Payout> {
        GoCardlessClient::get_payout(self, id).await
    }

    async fn fetch_resource(&self, kind: ResourceKind, id: &str) -> ApiResult<Resource> {
        let resource = match kind {
            ResourceKind::Creditor => Resource::Creditor(self.get_creditor(id).await?),
            ResourceKind::CreditorBankAccount => {
                Resource::CreditorBankAccount(self.get_creditor_bank_account(id).await?)
            }
            ResourceKind::Customer => Resource::Customer(self.get_customer(id).await?),
            ResourceKind::CustomerBankAccount => {
                Resource::CustomerBankAccount(self.get_customer_bank_account(id).await?)
            }
            // Never expanded, or parent_event links would recurse
            ResourceKind::Event => {
                let event: Event = self.get(EVENTS, Some(id), &ListOptions::new()).await?;
                Resource::Event(Box::new(event))
            }
            ResourceKind::Mandate => Resource::Mandate(self.get_mandate(id).await?),
            ResourceKind::Payment => Resource::Payment(self.get_payment(id).await?),
            ResourceKind::Payout => Resource::Payout(GoCardlessClient::get_payout(self, id).await?),
            ResourceKind::Refund => Resource::Refund(self.get_refund(id).await?),
            ResourceKind::RedirectFlow => Resource::RedirectFlow(self.get_redirect_flow(id).await?),
            ResourceKind::Subscription => Resource::Subscription(self.get_subscription(id).await?),
        };
        Ok(resource)
    }
}

/// Path and query of a request URL, e.g. `/payments/PM123?limit=1`
fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

fn require_id<'a>(id: &'a Option<String>, entity: &str) -> ApiResult<&'a str> {
    id.as_deref()
        .ok_or_else(|| ApiError::InvalidRequest(format!("Cannot update a {} without an id", entity)))
}
