//! The outcome of a single verification attempt.

use thiserror::Error;

use frc_common::VerifyResponse;

/// What happened when verifying one response token.
///
/// Exactly one shape per attempt. The acceptance policy in
/// [`crate::VerifyResult`] matches on this without inspecting messages.
#[derive(Debug)]
pub enum VerificationOutcome {
    /// HTTP 200 with a decodable body; `response.success` is the verdict.
    ///
    /// Only the client builds this variant, so `status` is always 200.
    #[non_exhaustive]
    Decoded {
        status: u16,
        response: VerifyResponse,
    },

    /// The request could not be completed or the body was not understood
    Transport(TransportError),

    /// The API answered with a non-200 status
    Client(ClientError),

    /// The request body could not be serialized
    Encoding(EncodingError),
}

impl VerificationOutcome {
    /// HTTP status of the response, `None` if no response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Decoded { status, .. } => Some(*status),
            Self::Client(e) => Some(e.status),
            Self::Transport(e) => e.status(),
            Self::Encoding(_) => None,
        }
    }

    /// The decoded response body, if one was obtained
    pub fn response(&self) -> Option<&VerifyResponse> {
        match self {
            Self::Decoded { response, .. } => Some(response),
            Self::Client(e) => Some(&e.response),
            Self::Transport(_) | Self::Encoding(_) => None,
        }
    }

    /// The error behind a failed attempt
    pub fn error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Decoded { .. } => None,
            Self::Transport(e) => Some(e),
            Self::Client(e) => Some(e),
            Self::Encoding(e) => Some(e),
        }
    }
}

/// Talking to the siteverify API failed
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connecting, sending, timeout or cancellation
    #[error("verification request failed talking to Friendly Captcha API: {0}")]
    Send(#[source] reqwest::Error),

    /// The response arrived but its body could not be read
    #[error(
        "verification request failed talking to Friendly Captcha API: reading body [status {status}]: {source}"
    )]
    Body {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not a valid siteverify response
    #[error(
        "verification request failed talking to Friendly Captcha API: decoding body [status {status}]: {source}"
    )]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Send(_) => None,
            Self::Body { status, .. } | Self::Decode { status, .. } => Some(*status),
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Send(e) | Self::Body { source: e, .. } => e.is_timeout(),
            Self::Decode { .. } => false,
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Send(e) if e.is_connect())
    }
}

/// A non-200 response. Usually the API key or sitekey is wrong.
///
/// Notify yourself when this happens; the site is unprotected until it is
/// fixed.
#[derive(Debug, Error)]
#[error(
    "verification request failed due to a client error (check your credentials) [status {status}]: {}",
    describe_error(.response)
)]
pub struct ClientError {
    pub status: u16,
    pub response: VerifyResponse,
}

fn describe_error(response: &VerifyResponse) -> String {
    match &response.error {
        Some(error) => error.to_string(),
        None => "no error details".to_string(),
    }
}

/// The request body could not be created
#[derive(Debug, Error)]
#[error("could not create verification request body: {0}")]
pub struct EncodingError(#[source] pub serde_json::Error);
