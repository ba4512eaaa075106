//! Error codes returned by the siteverify API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code found in the `error` field of a siteverify response.
///
/// Codes this crate does not know about decode into [`ErrorCode::Other`]
/// rather than failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// (401) The X-API-Key header was not set
    AuthRequired,
    /// (401) The API key is invalid
    AuthInvalid,
    /// (400) The sitekey in the request is invalid
    SitekeyInvalid,
    /// (400) The response field is missing from the request
    ResponseMissing,
    /// (200) The response field is invalid
    ResponseInvalid,
    /// (200) The response has expired
    ResponseTimeout,
    /// (200) The response has already been used
    ResponseDuplicate,
    /// (400) Something else is wrong with the request, e.g. an empty body
    BadRequest,
    /// Any code not listed above
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AuthRequired => "auth_required",
            Self::AuthInvalid => "auth_invalid",
            Self::SitekeyInvalid => "sitekey_invalid",
            Self::ResponseMissing => "response_missing",
            Self::ResponseInvalid => "response_invalid",
            Self::ResponseTimeout => "response_timeout",
            Self::ResponseDuplicate => "response_duplicate",
            Self::BadRequest => "bad_request",
            Self::Other(code) => code.as_str(),
        }
    }

    /// Returns the HTTP status the API documents for this code, if known
    pub fn documented_status(&self) -> Option<u16> {
        match self {
            Self::AuthRequired | Self::AuthInvalid => Some(401),
            Self::SitekeyInvalid | Self::ResponseMissing | Self::BadRequest => Some(400),
            Self::ResponseInvalid | Self::ResponseTimeout | Self::ResponseDuplicate => Some(200),
            Self::Other(_) => None,
        }
    }

    /// Returns true if this code points at the integrator's credentials or
    /// request rather than at the end user's solution
    pub fn is_client_side(&self) -> bool {
        matches!(self.documented_status(), Some(400 | 401))
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "auth_required" => Self::AuthRequired,
            "auth_invalid" => Self::AuthInvalid,
            "sitekey_invalid" => Self::SitekeyInvalid,
            "response_missing" => Self::ResponseMissing,
            "response_invalid" => Self::ResponseInvalid,
            "response_timeout" => Self::ResponseTimeout,
            "response_duplicate" => Self::ResponseDuplicate,
            "bad_request" => Self::BadRequest,
            _ => Self::Other(value),
        }
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
