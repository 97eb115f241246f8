//! # Error Classification
//!
//! Maps a failed response onto the typed [`ApiError`] variants.
//!
//! The upstream error envelope looks like:
//!
//! ```text
//! { "error": { "type": "...", "message": "...", "code": 422, "errors": [ { "reason": "..." } ] } }
//! ```
//!
//! Classification is decided by `type` first and, for `invalid_api_usage`
//! only, by the first entry's `reason`. Anything not recognised comes back
//! as [`ApiError::Http`], the unaltered transport failure.

use gc_core::{ApiError, ErrorDetail};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

/// Classify a non-2xx response.
///
/// * `status` - HTTP status of the response
/// * `target` - request target (path and query) that failed
/// * `body` - raw response body
pub fn classify_failure(status: u16, target: &str, body: &str) -> ApiError {
    let original = || ApiError::Http {
        status,
        target: target.to_string(),
        body: body.to_string(),
    };

    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return original();
    };
    let error = envelope.error;

    match error.kind.as_str() {
        "invalid_state" => ApiError::InvalidState {
            message: error.message,
            code: error.code.unwrap_or(status),
            errors: error.errors,
        },
        "validation_failed" => ApiError::Validation {
            message: error.message,
            code: error.code.unwrap_or(status),
            errors: error.errors,
        },
        "invalid_api_usage" => {
            classify_invalid_api_usage(status, target, error).unwrap_or_else(original)
        }
        _ => original(),
    }
}

/// `None` when the reason is missing or unknown
fn classify_invalid_api_usage(status: u16, target: &str, error: ErrorBody) -> Option<ApiError> {
    let reason = error.errors.first()?.reason.as_deref()?;

    let classified = match reason {
        "resource_not_found" => ApiError::ResourceNotFound {
            message: format!("Resource not found at {}", target),
            code: status,
        },
        "version_not_found" => ApiError::VersionNotFound {
            message: "Version not found".to_string(),
            code: status,
        },
        "invalid_document_structure" => ApiError::InvalidDocumentStructure {
            message: error.message,
            code: status,
        },
        "access_token_not_found" | "insufficient_permissions" => ApiError::Authentication {
            message: error.message,
            code: status,
        },
        _ => return None,
    };

    Some(classified)
}
