//! HTTP endpoint handlers.
//!
//! Every verification endpoint answers 200 with the envelope's CORS headers;
//! the outcome is only visible in the body.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::event::{Envelope, Event};
use crate::handler::Handler;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub handler: Handler,
}

impl AppState {
    pub fn new(handler: Handler) -> Self {
        Self { handler }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Verification over plain HTTP
// =============================================================================

/// Verification endpoint for browsers.
///
/// The request method and raw body become the event; the envelope becomes
/// the HTTP response.
pub async fn verify(State(state): State<AppState>, method: Method, body: Bytes) -> Envelope {
    let body = (!body.is_empty()).then(|| String::from_utf8_lossy(&body).into_owned());
    let event = Event::new(method.as_str(), body);

    state.handler.handle(&event).await
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);

        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "envelope_header_invalid"),
            }
        }

        let body = self.body.map(Body::from).unwrap_or_else(Body::empty);

        (status, headers, body).into_response()
    }
}

// =============================================================================
// Platform invocation
// =============================================================================

/// Invocation endpoint taking a platform event as JSON.
///
/// Responds with the envelope itself as JSON, the way the platform would
/// receive it from the function.
pub async fn invoke(State(state): State<AppState>, body: Bytes) -> Json<Envelope> {
    let event: Event = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, body_length = body.len(), "invoke_event_invalid");
            return Json(Envelope::error(format!("invalid event: {}", e)));
        }
    };

    Json(state.handler.handle(&event).await)
}
