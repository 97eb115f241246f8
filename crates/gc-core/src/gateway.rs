//! # Gateway Trait
//!
//! The seam between the reconciliation logic and the HTTP client.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Gateway (trait)                       │
//! │  ├── list_events()                                          │
//! │  ├── get_event()                                            │
//! │  ├── get_payout()                                           │
//! │  └── fetch_resource()                                       │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!               ┌────────────┴────────────┐
//!               │                         │
//!       ┌───────┴────────┐       ┌────────┴───────┐
//!       │GoCardlessClient│       │  in-memory fake │
//!       │  (gc-client)   │       │    (tests)      │
//!       └────────────────┘       └────────────────┘
//! ```

use crate::error::ApiResult;
use crate::event::Event;
use crate::resource::{Payout, Resource, ResourceKind};
use async_trait::async_trait;
use std::sync::Arc;

/// Query parameters for list endpoints, passed through verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    params: Vec<(String, String)>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a query parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ListOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Operations the event resolver and payout reconciler depend on.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// List events matching `options`.
    ///
    /// When `with_resources` is set every returned event has its links
    /// expanded into `Event::resources`.
    async fn list_events(&self, options: &ListOptions, with_resources: bool)
        -> ApiResult<Vec<Event>>;

    /// Fetch a single event, optionally expanding its links.
    async fn get_event(&self, id: &str, with_resources: bool) -> ApiResult<Event>;

    async fn get_payout(&self, id: &str) -> ApiResult<Payout>;

    /// Fetch any modelled resource by kind and id.
    ///
    /// Events fetched this way are never expanded.
    async fn fetch_resource(&self, kind: ResourceKind, id: &str) -> ApiResult<Resource>;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type SharedGateway = Arc<dyn Gateway>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_preserve_order() {
        let options = ListOptions::new()
            .with("payout", "PO123")
            .with("action", "paid");

        assert_eq!(
            options.params(),
            &[
                ("payout".to_string(), "PO123".to_string()),
                ("action".to_string(), "paid".to_string())
            ]
        );
        assert_eq!(options.get("action"), Some("paid"));
        assert_eq!(options.get("limit"), None);
    }

    #[test]
    fn test_list_options_from_pairs() {
        let options: ListOptions = [("customer", "CU1"), ("limit", "50")].into_iter().collect();
        assert_eq!(options.get("limit"), Some("50"));
        assert!(!options.is_empty());
        assert!(ListOptions::new().is_empty());
    }
}
