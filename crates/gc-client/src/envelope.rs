//! # Resource Envelopes
//!
//! Every request and response body is keyed by the collection name:
//! `{ "payments": { ... } }` or `{ "payments": [ ... ], "meta": { ... } }`.

use gc_core::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Extract and decode the record(s) stored under `collection`
pub fn open<T: DeserializeOwned>(body: &str, collection: &str) -> ApiResult<T> {
    let mut envelope: Map<String, Value> = serde_json::from_str(body)?;

    let payload = envelope.remove(collection).ok_or_else(|| {
        ApiError::Decode(format!("Response has no `{}` envelope", collection))
    })?;

    serde_json::from_value(payload)
        .map_err(|e| ApiError::Decode(format!("Invalid `{}` record: {}", collection, e)))
}

/// Wrap a request payload under `collection`
pub fn wrap(collection: &str, payload: Value) -> Value {
    let mut envelope = Map::with_capacity(1);
    envelope.insert(collection.to_string(), payload);
    Value::Object(envelope)
}
