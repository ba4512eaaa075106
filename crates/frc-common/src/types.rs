//! Request and response bodies of the siteverify API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::de::null_as_default;
use crate::error::ErrorCode;
use crate::risk::RiskIntelligenceData;

/// Request body for `POST /api/v2/captcha/siteverify`.
///
/// Callers normally let the client build this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// The response token the user submitted in the `frc-captcha-response` field
    pub response: String,

    /// The sitekey the puzzle must have been generated for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitekey: Option<String>,
}

impl VerifyRequest {
    /// Build a request, dropping an empty sitekey
    pub fn new(response: impl Into<String>, sitekey: Option<&str>) -> Self {
        Self {
            response: response.into(),
            sitekey: sitekey.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }
}

/// Response body of the siteverify API.
///
/// Missing and `null` fields decode to their defaults, so an error body
/// without a `success` field still decodes with `success == false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,

    /// Only present when `success` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<VerifyResponseData>,

    /// Only present when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VerifyResponseError>,
}

impl VerifyResponse {
    pub fn error_code(&self) -> Option<&ErrorCode> {
        self.error.as_ref().map(|e| &e.error_code)
    }
}

/// Information about the challenge that was solved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyResponseChallengeData {
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub origin: String,
}

/// The `data` field of a successful response.
///
/// Risk intelligence is decoded on a best-effort basis: if it does not match
/// [`RiskIntelligenceData`], `risk_intelligence` is `None` while
/// `risk_intelligence_raw` still holds it. The verdict is never lost over it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "WireResponseData")]
pub struct VerifyResponseData {
    /// Unique identifier of this verification event
    pub event_id: String,

    pub challenge: VerifyResponseChallengeData,

    /// Risk intelligence, present when at least one intelligence module is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_intelligence: Option<RiskIntelligenceData>,

    /// `risk_intelligence` exactly as the API sent it, including fields not
    /// modelled by [`RiskIntelligenceData`]
    #[serde(skip_serializing)]
    pub risk_intelligence_raw: Option<Box<RawValue>>,
}

#[derive(Deserialize)]
struct WireResponseData {
    #[serde(default, deserialize_with = "null_as_default")]
    event_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    challenge: VerifyResponseChallengeData,
    #[serde(default)]
    risk_intelligence: Option<Box<RawValue>>,
}

impl From<WireResponseData> for VerifyResponseData {
    fn from(wire: WireResponseData) -> Self {
        let mut data = Self {
            event_id: wire.event_id,
            challenge: wire.challenge,
            risk_intelligence: None,
            risk_intelligence_raw: wire.risk_intelligence,
        };
        data.risk_intelligence = data.parse_risk_intelligence().and_then(Result::ok);
        data
    }
}

impl VerifyResponseData {
    /// Decode the raw risk intelligence again, reporting why it does not fit
    /// [`RiskIntelligenceData`] when `risk_intelligence` came out `None`
    pub fn parse_risk_intelligence(
        &self,
    ) -> Option<Result<RiskIntelligenceData, serde_json::Error>> {
        self.risk_intelligence_raw
            .as_deref()
            .map(|raw| serde_json::from_str(raw.get()))
    }
}

/// The `error` field of an unsuccessful response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyResponseError {
    #[serde(deserialize_with = "null_as_default")]
    pub error_code: ErrorCode,
    #[serde(deserialize_with = "null_as_default")]
    pub detail: String,
}

impl std::fmt::Display for VerifyResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.error_code)
        } else {
            write!(f, "{}: {}", self.error_code, self.detail)
        }
    }
}
