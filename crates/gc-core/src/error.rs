//! # API Error Types
//!
//! Typed error handling for the GoCardless Pro client.
//! All client operations return `Result<T, ApiError>`.
//!
//! The first six variants are the typed upstream failures the error
//! classifier can produce. `Http` and `Network` are the residual
//! "original transport failure" cases callers must handle generically.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// One entry of the `errors` array inside an upstream error envelope.
///
/// Only `reason`, `field` and `message` are modelled; everything else the
/// API sends (`request_pointer`, `links`, ...) is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorDetail {
    /// Detail carrying only a reason code
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Default::default()
        }
    }
}

/// Core error type for all client operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Access token missing, revoked or lacking permissions
    #[error("Authentication failed ({code}): {message}")]
    Authentication { message: String, code: u16 },

    /// Request body failed field validation
    #[error("Validation failed ({code}): {message}")]
    Validation {
        message: String,
        code: u16,
        errors: Vec<ErrorDetail>,
    },

    /// Resource is in a state that forbids the requested action
    #[error("Invalid state ({code}): {message}")]
    InvalidState {
        message: String,
        code: u16,
        errors: Vec<ErrorDetail>,
    },

    #[error("{message} ({code})")]
    ResourceNotFound { message: String, code: u16 },

    #[error("{message} ({code})")]
    VersionNotFound { message: String, code: u16 },

    /// Request body was not a well formed document
    #[error("Invalid document structure ({code}): {message}")]
    InvalidDocumentStructure { message: String, code: u16 },

    /// Non-2xx response that did not match a known error type/reason
    #[error("HTTP {status} at {target}: {body}")]
    Http {
        status: u16,
        target: String,
        body: String,
    },

    /// Socket, TLS or timeout failure before a response was read
    #[error("Network error: {0}")]
    Network(String),

    /// Request could not be built from the given entity
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response was not a valid resource envelope
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration errors (missing token, invalid environment)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payout has no `paid` event, so it cannot be reconciled yet
    #[error("No paid event found for payout {payout_id}")]
    SettlementEventNotFound { payout_id: String },

    /// Webhook body did not match the claimed signature
    #[error("Webhook signature mismatch")]
    WebhookSignatureMismatch,
}

impl ApiError {
    /// Returns true for the error kinds produced by the error classifier
    pub fn is_typed(&self) -> bool {
        matches!(
            self,
            ApiError::Authentication { .. }
                | ApiError::Validation { .. }
                | ApiError::InvalidState { .. }
                | ApiError::ResourceNotFound { .. }
                | ApiError::VersionNotFound { .. }
                | ApiError::InvalidDocumentStructure { .. }
        )
    }

    /// Field-level details for validation and invalid-state failures
    pub fn details(&self) -> &[ErrorDetail] {
        match self {
            ApiError::Validation { errors, .. } | ApiError::InvalidState { errors, .. } => errors,
            _ => &[],
        }
    }

    /// Upstream code carried by the error, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { code, .. }
            | ApiError::Validation { code, .. }
            | ApiError::InvalidState { code, .. }
            | ApiError::ResourceNotFound { code, .. }
            | ApiError::VersionNotFound { code, .. }
            | ApiError::InvalidDocumentStructure { code, .. } => Some(*code),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if retrying the same request may succeed.
    ///
    /// The client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns the HTTP status code appropriate for surfacing this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Authentication { .. } => 401,
            ApiError::Validation { .. } => 422,
            ApiError::InvalidState { .. } => 409,
            ApiError::ResourceNotFound { .. } => 404,
            ApiError::VersionNotFound { .. } => 400,
            ApiError::InvalidDocumentStructure { .. } => 400,
            ApiError::Http { .. } => 502,
            ApiError::Network(_) => 503,
            ApiError::InvalidRequest(_) => 400,
            ApiError::Decode(_) => 502,
            ApiError::Configuration(_) => 500,
            ApiError::SettlementEventNotFound { .. } => 404,
            ApiError::WebhookSignatureMismatch => 401,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type alias for client operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_errors() {
        assert!(ApiError::Authentication {
            message: "nope".into(),
            code: 401
        }
        .is_typed());
        assert!(!ApiError::Network("timeout".into()).is_typed());
        assert!(!ApiError::Http {
            status: 500,
            target: "/payments".into(),
            body: String::new()
        }
        .is_typed());
    }

    #[test]
    fn test_details_only_for_validation_and_state() {
        let errors = vec![ErrorDetail::with_reason("mandate_is_inactive")];
        let err = ApiError::InvalidState {
            message: "Mandate inactive".into(),
            code: 422,
            errors: errors.clone(),
        };
        assert_eq!(err.details(), errors.as_slice());

        let err = ApiError::ResourceNotFound {
            message: "Resource not found at /payments/PM1".into(),
            code: 404,
        };
        assert!(err.details().is_empty());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ApiError::Network("timeout".into()).is_retryable());
        assert!(ApiError::Http {
            status: 503,
            target: "/payouts".into(),
            body: String::new()
        }
        .is_retryable());
        assert!(!ApiError::Http {
            status: 400,
            target: "/payouts".into(),
            body: String::new()
        }
        .is_retryable());
        assert!(!ApiError::Validation {
            message: "bad".into(),
            code: 422,
            errors: vec![]
        }
        .is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::SettlementEventNotFound {
                payout_id: "PO1".into()
            }
            .status_code(),
            404
        );
        assert_eq!(ApiError::WebhookSignatureMismatch.status_code(), 401);
        assert_eq!(ApiError::Network("reset".into()).status_code(), 503);
    }

    #[test]
    fn test_error_detail_keeps_unmodelled_fields() {
        let detail: ErrorDetail = serde_json::from_value(json!({
            "field": "amount",
            "message": "must be greater than 0",
            "request_pointer": "/payments/amount"
        }))
        .unwrap();

        assert_eq!(detail.field.as_deref(), Some("amount"));
        assert!(detail.reason.is_none());
        assert_eq!(detail.extra["request_pointer"], "/payments/amount");
    }
}
