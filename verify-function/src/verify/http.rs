//! reqwest-backed verifier.

use async_trait::async_trait;
use reqwest::Client;
use tracing;

use super::types::{parse_data, SiteVerifyRequest, UpstreamResponse, VerifyError};
use super::Verifier;

/// Google reCAPTCHA verification endpoint.
pub const RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Posts form-encoded tokens to the verification endpoint.
///
/// The client is shared, so one instance should be built per process and
/// reused across invocations.
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    client: Client,
    url: String,
}

impl HttpVerifier {
    /// Create a verifier targeting the reCAPTCHA endpoint.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url: RECAPTCHA_VERIFY_URL.to_string(),
        }
    }

    /// Override the endpoint, e.g. to point at a mock server.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    async fn site_verify(
        &self,
        request: &SiteVerifyRequest,
    ) -> Result<UpstreamResponse, VerifyError> {
        tracing::info!(
            url = %self.url,
            token_length = request.token_length(),
            response_fields = request.tokens.len(),
            secret_set = !request.secret.is_empty(),
            "site_verify_starting"
        );

        let response = match self
            .client
            .post(&self.url)
            .form(&request.form_fields())
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
        {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_timeout() {
                    tracing::error!(url = %self.url, error = %e, "site_verify_timeout");
                } else if let Some(status) = e.status() {
                    tracing::error!(
                        url = %self.url,
                        status_code = status.as_u16(),
                        error = %e,
                        "site_verify_bad_status"
                    );
                } else {
                    tracing::error!(url = %self.url, error = %e, "site_verify_error");
                }
                return Err(e.into());
            }
        };

        let status = response.status().as_u16();
        let text = response.text().await?;

        match parse_data(&text) {
            Some(data) => {
                tracing::info!(
                    status_code = status,
                    success = ?data.get("success"),
                    score = ?data.get("score"),
                    "site_verify_complete"
                );
                Ok(UpstreamResponse { status, data })
            }
            None => {
                tracing::warn!(
                    status_code = status,
                    body_length = text.len(),
                    "site_verify_no_data"
                );
                Err(VerifyError::NoData { status })
            }
        }
    }
}
