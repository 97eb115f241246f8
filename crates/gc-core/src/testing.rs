//! In-memory gateway for unit tests

use crate::error::{ApiError, ApiResult};
use crate::event::{Event, LinkResolver};
use crate::gateway::{Gateway, ListOptions};
use crate::resource::{Payment, Payout, Refund, Resource, ResourceKind};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeGateway {
    events: Vec<Event>,
    payments: HashMap<String, Payment>,
    refunds: HashMap<String, Refund>,
    payouts: HashMap<String, Payout>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payments
            .insert(payment.id.clone().unwrap_or_default(), payment);
        self
    }

    pub fn with_refund(mut self, refund: Refund) -> Self {
        self.refunds.insert(refund.id.clone().unwrap_or_default(), refund);
        self
    }

    pub fn with_payout(mut self, payout: Payout) -> Self {
        self.payouts.insert(payout.id.clone().unwrap_or_default(), payout);
        self
    }

    fn not_found(collection: &str, id: &str) -> ApiError {
        ApiError::ResourceNotFound {
            message: format!("Resource not found at /{}/{}", collection, id),
            code: 404,
        }
    }

    fn matches(event: &Event, options: &ListOptions) -> bool {
        options.params().iter().all(|(key, value)| match key.as_str() {
            "action" => event.action == *value,
            "resource_type" => event.resource_type == *value,
            relation => event.link(relation) == Some(value.as_str()),
        })
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn list_events(
        &self,
        options: &ListOptions,
        with_resources: bool,
    ) -> ApiResult<Vec<Event>> {
        let mut events = Vec::new();
        for event in self.events.iter().filter(|e| Self::matches(e, options)) {
            if with_resources {
                events.push(LinkResolver::new().expand(self, event.clone()).await?);
            } else {
                events.push(event.clone());
            }
        }
        Ok(events)
    }

    async fn get_event(&self, id: &str, with_resources: bool) -> ApiResult<Event> {
        let event = self
            .events
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| Self::not_found("events", id))?;
        if with_resources {
            LinkResolver::new().expand(self, event).await
        } else {
            Ok(event)
        }
    }

    async fn get_payout(&self, id: &str) -> ApiResult<Payout> {
        self.payouts
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found("payouts", id))
    }

    async fn fetch_resource(&self, kind: ResourceKind, id: &str) -> ApiResult<Resource> {
        let found = match kind {
            ResourceKind::Payment => self.payments.get(id).cloned().map(Resource::Payment),
            ResourceKind::Refund => self.refunds.get(id).cloned().map(Resource::Refund),
            ResourceKind::Payout => self.payouts.get(id).cloned().map(Resource::Payout),
            ResourceKind::Event => self
                .events
                .iter()
                .find(|e| e.id.as_deref() == Some(id))
                .cloned()
                .map(|e| Resource::Event(Box::new(e))),
            _ => None,
        };
        found.ok_or_else(|| Self::not_found(kind.collection(), id))
    }
}
