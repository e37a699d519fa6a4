//! Web server module hosting the verification handler.
//!
//! This module provides a thin host that:
//! - Converts HTTP requests into `Event`s for the handler
//! - Accepts raw platform events on `/invoke`
//! - Renders each `Envelope` back as the HTTP response
//!
//! All verification logic lives in the handler.

pub mod handlers;

use axum::{
    routing::{any, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, invoke, verify, AppState, HealthResponse};

/// Build the router with all routes and the trace layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/invoke", post(invoke))
        .route("/", any(verify))
        .route("/verify", any(verify))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
