//! Types for a single verification round trip.

use serde_json::{Number, Value};

/// Failures of the verification step.
///
/// The `Display` text of each variant is what callers see in the `error`
/// field of the response envelope.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The event carried no body, or an empty one.
    #[error("no body")]
    MissingBody,

    /// The body was not valid JSON.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body was the JSON literal `null`, so there is no token to read.
    #[error("cannot read property 'token' of null")]
    NullBody,

    /// Transport failure or non-2xx status from the verifier.
    #[error("verification request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The verifier answered but the payload was empty or falsy.
    #[error("verifier returned no data (HTTP {status})")]
    NoData { status: u16 },
}

// =============================================================================
// Request
// =============================================================================

/// Form fields posted to the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteVerifyRequest {
    /// Values sent as `response`, one pair each. A scalar token gives one
    /// value; an array token gives one per element; an empty array gives none.
    pub tokens: Vec<String>,
    /// Shared secret from configuration
    pub secret: String,
}

impl SiteVerifyRequest {
    /// Request for a single token.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            tokens: vec![token.into()],
            secret: secret.into(),
        }
    }

    /// Build a request from a raw JSON event body.
    ///
    /// Only the `token` field is read. A missing token, or a body that is not
    /// an object, results in an empty `response` value rather than an error.
    pub fn from_body(body: &str, secret: &str) -> Result<Self, VerifyError> {
        let parsed: Value = serde_json::from_str(body)?;

        let tokens = match &parsed {
            Value::Null => return Err(VerifyError::NullBody),
            Value::Object(map) => match map.get("token") {
                Some(Value::Array(items)) => items.iter().map(form_value).collect(),
                Some(token) => vec![form_value(token)],
                None => vec![String::new()],
            },
            _ => vec![String::new()],
        };

        Ok(Self {
            tokens,
            secret: secret.to_string(),
        })
    }

    /// Fields in wire order: every `response` pair, then `secret`.
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        self.tokens
            .iter()
            .map(|t| ("response", t.as_str()))
            .chain(std::iter::once(("secret", self.secret.as_str())))
            .collect()
    }

    /// Total length of the token values, for logging.
    pub fn token_length(&self) -> usize {
        self.tokens.iter().map(String::len).sum()
    }
}

/// Render a JSON value as a form value.
///
/// Strings pass through, numbers and booleans use their JavaScript text, and
/// anything else (null, arrays, objects) becomes empty.
fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => js_number(n).to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Whole-number floats as integers, so `1.0` is written `1`.
fn js_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < I64_LIMIT => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

/// Floats below this magnitude convert to `i64` exactly.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Apply [`js_number`] throughout a value.
fn js_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::Number(js_number(&n)),
        Value::Array(items) => Value::Array(items.into_iter().map(js_numbers).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, js_numbers(v))).collect())
        }
        other => other,
    }
}

// =============================================================================
// Response
// =============================================================================

/// Successful round trip with a non-empty payload.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    /// Verifier payload, shape not fixed (usually `success`, `score`, ...)
    pub data: Value,
}

impl UpstreamResponse {
    /// Whether the payload carries a usable `score`.
    pub fn has_score(&self) -> bool {
        self.data.get("score").map(is_truthy).unwrap_or(false)
    }

    /// Compact JSON text of the payload, keys in the order the verifier sent.
    pub fn data_json(&self) -> String {
        self.data.to_string()
    }
}

/// Interpret a raw response body as verifier data.
///
/// Non-JSON text is kept as a string value. Key order is preserved and
/// whole-number floats become integers. Returns `None` when there is nothing
/// usable: an empty body or a falsy JSON payload.
pub fn parse_data(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }

    let data = serde_json::from_str::<Value>(text)
        .map(js_numbers)
        .unwrap_or_else(|_| Value::String(text.to_string()));

    is_truthy(&data).then_some(data)
}

/// Loose truthiness: `null`, `false`, zero and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
