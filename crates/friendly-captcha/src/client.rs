//! Siteverify client: sends one verification request per call and maps the
//! result into a [`VerificationOutcome`].

use reqwest::header::CONTENT_TYPE;
use std::fmt;
use std::time::Duration;

use frc_common::constants::{SDK_NAME, headers};
use frc_common::{VerifyRequest, VerifyResponse};

use crate::config::ClientBuilder;
use crate::outcome::{ClientError, EncodingError, TransportError, VerificationOutcome};
use crate::result::VerifyResult;

/// Value of the SDK identification header
pub fn sdk_header_value() -> String {
    format!("{}@{}", SDK_NAME, env!("CARGO_PKG_VERSION"))
}

/// Client for the Friendly Captcha siteverify API.
///
/// Immutable once built. Cloning is cheap enough to share one client
/// between handlers, and concurrent `verify` calls share nothing but the
/// HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    pub(crate) api_key: String,
    pub(crate) sitekey: Option<String>,
    pub(crate) api_endpoint: String,
    pub(crate) siteverify_url: String,
    pub(crate) strict: bool,
    pub(crate) timeout: Option<Duration>,
    pub(crate) http: reqwest::Client,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    /// Full URL the verification requests are posted to
    pub fn siteverify_url(&self) -> &str {
        &self.siteverify_url
    }

    pub fn sitekey(&self) -> Option<&str> {
        self.sitekey.as_deref()
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Verify a captcha response token.
    ///
    /// Never fails: check [`VerifyResult::should_accept`] to decide what to
    /// do with the submission. Dropping the future aborts the request.
    pub async fn verify(&self, response: &str) -> VerifyResult {
        VerifyResult::new(self.verify_outcome(response).await, self.strict)
    }

    /// Verify a captcha response token and return the raw outcome.
    ///
    /// Sends exactly one request. Empty or malformed tokens are passed
    /// through to the API unchanged.
    pub async fn verify_outcome(&self, response: &str) -> VerificationOutcome {
        let body = VerifyRequest::new(response, self.sitekey.as_deref());

        let body = match serde_json::to_vec(&body) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode siteverify request");
                return VerificationOutcome::Encoding(EncodingError(e));
            }
        };

        let mut request = self
            .http
            .post(&self.siteverify_url)
            .header(CONTENT_TYPE, "application/json")
            .header(headers::X_API_KEY, &self.api_key)
            .header(headers::X_FRC_SDK, sdk_header_value())
            .body(body);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!(url = %self.siteverify_url, "Sending siteverify request");

        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(
                    url = %self.siteverify_url,
                    timeout = e.is_timeout(),
                    connect = e.is_connect(),
                    error = %e,
                    "Siteverify request failed"
                );
                return VerificationOutcome::Transport(TransportError::Send(e));
            }
        };

        let status = resp.status().as_u16();

        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes,
            Err(source) => {
                tracing::warn!(status, error = %source, "Failed to read siteverify response");
                return VerificationOutcome::Transport(TransportError::Body { status, source });
            }
        };

        // Decoded before looking at the status: an unreadable body means the
        // API is not answering intelligibly, whatever the status says.
        let decoded: VerifyResponse = match serde_json::from_slice(&bytes) {
            Ok(decoded) => decoded,
            Err(source) => {
                tracing::warn!(status, error = %source, "Failed to decode siteverify response");
                return VerificationOutcome::Transport(TransportError::Decode { status, source });
            }
        };

        if status != 200 {
            tracing::warn!(
                status,
                error_code = ?decoded.error_code(),
                "Siteverify rejected the request, check your API key and sitekey"
            );
            return VerificationOutcome::Client(ClientError {
                status,
                response: decoded,
            });
        }

        tracing::debug!(
            success = decoded.success,
            error_code = ?decoded.error_code(),
            "Siteverify response received"
        );

        VerificationOutcome::Decoded {
            status,
            response: decoded,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"<redacted>")
            .field("sitekey", &self.sitekey)
            .field("api_endpoint", &self.api_endpoint)
            .field("strict", &self.strict)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
