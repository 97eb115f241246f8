//! # Events
//!
//! Events describe asynchronous state changes on other resources. An event
//! only carries the ids of what it concerns (`links`); the [`LinkResolver`]
//! can hydrate those ids into full resources on request.

use crate::error::ApiResult;
use crate::gateway::Gateway;
use crate::resource::{Links, Metadata, Resource, ResourceKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Link relations may point at the event's parent, e.g. `parent_event`
const PARENT_PREFIX: &str = "parent_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// What happened, e.g. `paid`, `confirmed`, `failed`
    pub action: String,

    /// Collection the event concerns, e.g. `payments`, `payouts`
    pub resource_type: String,

    /// Cause and origin of the event
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub links: Links,

    /// Hydrated link targets, keyed by the original relation name.
    /// Only present after resource expansion was requested.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub resources: Option<HashMap<String, Resource>>,
}

impl Event {
    /// Id linked under `relation`
    pub fn link(&self, relation: &str) -> Option<&str> {
        self.links.get(relation).map(|s| s.as_str())
    }

    /// Hydrated resource under `relation`, if expansion ran and resolved it
    pub fn resource(&self, relation: &str) -> Option<&Resource> {
        self.resources.as_ref()?.get(relation)
    }

    /// Remove and return the hydrated resource under `relation`
    pub fn take_resource(&mut self, relation: &str) -> Option<Resource> {
        self.resources.as_mut()?.remove(relation)
    }
}

/// Static table from link relation name to the resource kind it can be
/// fetched as.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    table: HashMap<&'static str, ResourceKind>,
}

impl LinkResolver {
    /// Resolver for every resource kind the client models
    pub fn new() -> Self {
        Self::for_kinds(ResourceKind::ALL)
    }

    /// Resolver restricted to the given kinds
    pub fn for_kinds(kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        Self {
            table: kinds
                .into_iter()
                .map(|kind| (kind.relation(), kind))
                .collect(),
        }
    }

    /// Kind a relation resolves to, after removing a `parent_` prefix
    pub fn kind_for(&self, relation: &str) -> Option<ResourceKind> {
        let name = relation.strip_prefix(PARENT_PREFIX).unwrap_or(relation);
        self.table.get(name).copied()
    }

    /// Populate `event.resources` by fetching every resolvable link.
    ///
    /// Relations without an entry in the table are skipped. Each link costs
    /// one request; fetch failures propagate and discard the partial map.
    pub async fn expand<G>(&self, gateway: &G, mut event: Event) -> ApiResult<Event>
    where
        G: Gateway + ?Sized,
    {
        let mut resources = HashMap::with_capacity(event.links.len());

        for (relation, id) in &event.links {
            let Some(kind) = self.kind_for(relation) else {
                debug!("Skipping unresolvable link: {}={}", relation, id);
                continue;
            };
            let resource = gateway.fetch_resource(kind, id).await?;
            resources.insert(relation.clone(), resource);
        }

        event.resources = Some(resources);
        Ok(event)
    }
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new()
    }
}
