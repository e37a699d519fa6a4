//! Verifier module for talking to the reCAPTCHA `siteverify` API.
//!
//! This module provides:
//! - The request/response types exchanged with the verifier
//! - `VerifyError`, the explicit failure type of the verification step
//! - The `Verifier` trait and its reqwest-backed implementation

pub mod http;
pub mod types;

use async_trait::async_trait;

pub use http::{HttpVerifier, RECAPTCHA_VERIFY_URL};
pub use types::{is_truthy, SiteVerifyRequest, UpstreamResponse, VerifyError};

/// Something that can check a token against the verifier.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Submit one verification request. Called at most once per invocation.
    async fn site_verify(
        &self,
        request: &SiteVerifyRequest,
    ) -> Result<UpstreamResponse, VerifyError>;
}
