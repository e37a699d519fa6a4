//! Platform boundary types.
//!
//! This module defines the shapes exchanged with the invoking platform:
//! - `Event`: the HTTP-like request handed to the function
//! - `Envelope`: the only output type, always status 200 with CORS headers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Method used by browsers for CORS preflight requests.
pub const PREFLIGHT_METHOD: &str = "OPTIONS";

/// Every envelope is returned with 200, even on failure, so the calling
/// browser does not surface a logical error as a CORS failure.
pub const ENVELOPE_STATUS: u16 = 200;

/// CORS headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "OPTIONS,POST,GET"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

// =============================================================================
// Incoming Event
// =============================================================================

/// Request event as delivered by the platform.
///
/// Only `httpMethod` and `body` are read; any other fields the platform
/// includes (headers, path, request context) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "httpMethod", default)]
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl Event {
    pub fn new(http_method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: http_method.into(),
            body,
        }
    }

    pub fn is_preflight(&self) -> bool {
        self.http_method == PREFLIGHT_METHOD
    }

    /// The body, treating an empty string the same as a missing one.
    pub fn non_empty_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}

// =============================================================================
// Response Envelope
// =============================================================================

/// Uniform response returned on every path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Body of every non-preflight envelope built by [`Envelope::error`].
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl Envelope {
    /// Preflight answer: CORS headers and no body.
    pub fn preflight() -> Self {
        Self {
            status_code: ENVELOPE_STATUS,
            headers: cors_headers(),
            body: None,
        }
    }

    /// Wrap a message as `{"error": message}`.
    pub fn error(message: impl Into<String>) -> Self {
        let body = ErrorBody {
            error: message.into(),
        };
        // Serializing a struct with one String field cannot fail.
        let body = serde_json::to_string(&body).unwrap_or_default();

        Self {
            status_code: ENVELOPE_STATUS,
            headers: cors_headers(),
            body: Some(body),
        }
    }

    /// Pass a body through untouched.
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            status_code: ENVELOPE_STATUS,
            headers: cors_headers(),
            body: Some(body.into()),
        }
    }
}

/// Build the CORS header map.
pub fn cors_headers() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_deserialize_platform_shape() {
        let raw = r#"{
            "httpMethod": "POST",
            "body": "{\"token\":\"abc\"}",
            "headers": {"Content-Type": "application/json"},
            "isBase64Encoded": false
        }"#;

        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.http_method, "POST");
        assert_eq!(event.body.as_deref(), Some(r#"{"token":"abc"}"#));
    }

    #[test]
    fn test_event_null_body() {
        let event: Event = serde_json::from_str(r#"{"httpMethod":"POST","body":null}"#).unwrap();
        assert_eq!(event.body, None);
        assert_eq!(event.non_empty_body(), None);
    }

    #[test]
    fn test_event_empty_body_is_missing() {
        let event = Event::new("POST", Some(String::new()));
        assert_eq!(event.non_empty_body(), None);
    }

    #[test]
    fn test_preflight_is_case_sensitive() {
        assert!(Event::new("OPTIONS", None).is_preflight());
        assert!(!Event::new("options", None).is_preflight());
    }

    #[test]
    fn test_preflight_envelope_omits_body() {
        let json = serde_json::to_value(Envelope::preflight()).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert!(json.get("body").is_none());
        assert_eq!(json["headers"]["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_error_envelope_body() {
        let envelope = Envelope::error("no body");
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body.as_deref(), Some(r#"{"error":"no body"}"#));
    }

    #[test]
    fn test_error_envelope_escapes_json() {
        let envelope = Envelope::error(r#"{"success":true}"#);
        assert_eq!(
            envelope.body.as_deref(),
            Some(r#"{"error":"{\"success\":true}"}"#)
        );
    }

    #[test]
    fn test_cors_headers_exact() {
        let headers = cors_headers();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers["Access-Control-Allow-Methods"], "OPTIONS,POST,GET");
        assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
    }
}
