//! Gateway Error Types
//!
//! Every failure the backend can hand us collapses into one of these
//! variants before it reaches a view. Views only ever show
//! [`GatewayError::user_message`].

use serde::Deserialize;
use thiserror::Error;

/// Shown for transport failures, where the backend never answered
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again or call us directly.";

/// Errors that can occur when talking to the portal backend
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl GatewayError {
    /// Classify a reqwest transport error
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_connect() {
            GatewayError::Unavailable
        } else {
            GatewayError::Request(e)
        }
    }

    /// Build an API error from a non-2xx status and its raw body.
    ///
    /// Only a string `detail` is kept; validation errors that carry a list
    /// of field problems fall back to the caller's generic message.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .and_then(|d| match d {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            });

        GatewayError::Api { status, detail }
    }

    /// True when the backend was never reached or never answered
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            GatewayError::Unavailable | GatewayError::Timeout | GatewayError::Request(_)
        )
    }

    /// HTTP status, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured `detail` from the backend, if it sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message to display for this failure.
    ///
    /// Backend detail is shown verbatim, transport failures get the generic
    /// message, everything else gets `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if self.is_network() {
            return GENERIC_ERROR_MESSAGE.to_string();
        }

        self.detail().unwrap_or(fallback).to_string()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail_is_kept() {
        let err = GatewayError::from_response(401, r#"{"detail": "Invalid credentials"}"#);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail(), Some("Invalid credentials"));
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[test]
    fn test_list_detail_falls_back() {
        let body = r#"{"detail": [{"loc": ["body", "email"], "msg": "field required"}]}"#;
        let err = GatewayError::from_response(422, body);
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("Failed to submit"), "Failed to submit");
    }

    #[test]
    fn test_unparseable_body_falls_back() {
        let err = GatewayError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.user_message("Failed to submit"), "Failed to submit");
        assert!(!err.is_network());
    }

    #[test]
    fn test_network_errors_use_generic_message() {
        assert_eq!(
            GatewayError::Unavailable.user_message("ignored"),
            GENERIC_ERROR_MESSAGE
        );
        assert_eq!(GatewayError::Timeout.user_message("ignored"), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_decode_error_uses_fallback() {
        let err = GatewayError::Decode("missing field `id`".into());
        assert_eq!(err.user_message("Failed to load"), "Failed to load");
    }
}
