//! Verification handler.
//!
//! The handler never fails outward. Each invocation:
//! 1. Answers CORS preflight requests directly
//! 2. Reads the token from the JSON body
//! 3. Forwards it with the shared secret to the verifier
//! 4. Turns the outcome, good or bad, into an `Envelope`

use std::sync::Arc;

use tracing::{info, warn};

use crate::event::{Envelope, Event};
use crate::verify::{SiteVerifyRequest, UpstreamResponse, Verifier, VerifyError};
use crate::Config;

/// Request handler with its injected dependencies.
#[derive(Clone)]
pub struct Handler {
    verifier: Arc<dyn Verifier>,
    secret: Arc<str>,
    relay_verified_as_success: bool,
}

impl Handler {
    pub fn new(verifier: Arc<dyn Verifier>, secret: impl Into<Arc<str>>) -> Self {
        Self {
            verifier,
            secret: secret.into(),
            relay_verified_as_success: false,
        }
    }

    /// Build a handler from loaded configuration.
    pub fn from_config(config: &Config, verifier: Arc<dyn Verifier>) -> Self {
        Self::new(verifier, config.secret())
            .with_success_relay(config.relay_verified_as_success)
    }

    /// When enabled, a verifier payload that carries a score is returned as
    /// a success envelope instead of being wrapped in `{"error": ...}`.
    pub fn with_success_relay(mut self, enabled: bool) -> Self {
        self.relay_verified_as_success = enabled;
        self
    }

    /// Handle one event. Always returns an envelope.
    pub async fn handle(&self, event: &Event) -> Envelope {
        if event.is_preflight() {
            info!("preflight_handled");
            return Envelope::preflight();
        }

        info!(
            method = %event.http_method,
            body_length = event.body.as_ref().map(|b| b.len()).unwrap_or(0),
            "verify_request_received"
        );

        match self.verify(event).await {
            Ok(upstream) => self.relay(&upstream),
            Err(e) => {
                warn!(error = %e, "verify_request_failed");
                Envelope::error(e.to_string())
            }
        }
    }

    /// The fallible part of an invocation: parse, then call the verifier.
    pub async fn verify(&self, event: &Event) -> Result<UpstreamResponse, VerifyError> {
        let body = event.non_empty_body().ok_or(VerifyError::MissingBody)?;
        let request = SiteVerifyRequest::from_body(body, &self.secret)?;
        self.verifier.site_verify(&request).await
    }

    fn relay(&self, upstream: &UpstreamResponse) -> Envelope {
        let has_score = upstream.has_score();

        info!(
            status_code = upstream.status,
            has_score = has_score,
            relay_as_success = self.relay_verified_as_success,
            "verify_request_relayed"
        );

        if self.relay_verified_as_success && has_score {
            return Envelope::success(upstream.data_json());
        }

        // Verified and unverified payloads alike go back in the error field.
        Envelope::error(upstream.data_json())
    }
}
