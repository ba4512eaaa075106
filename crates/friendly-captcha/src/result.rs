//! Acceptance policy: turns a verification outcome into an accept/reject
//! decision.

use frc_common::VerifyResponse;

use crate::outcome::VerificationOutcome;

/// The decision derived from one verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptanceDecision {
    /// Let the submission through
    pub should_accept: bool,
    /// A verdict was obtained from the API (HTTP 200, decodable body)
    pub was_able_to_verify: bool,
    /// The API answered with a non-200 status
    pub is_client_error: bool,
    /// The API could not be talked to, or the request could not be built
    pub is_transport_error: bool,
}

/// Result of verifying a captcha response.
///
/// In the simplest case only [`VerifyResult::should_accept`] matters. It is
/// true when the captcha was solved, and also when verification was not
/// possible (API down, wrong API key) unless the client is in strict mode.
#[derive(Debug)]
pub struct VerifyResult {
    outcome: VerificationOutcome,
    strict: bool,
}

impl VerifyResult {
    /// Wrap an outcome returned by [`crate::Client::verify_outcome`].
    ///
    /// [`VerificationOutcome::Decoded`] cannot be built outside this crate,
    /// so a decoded outcome always carries HTTP 200:
    ///
    /// ```compile_fail
    /// use friendly_captcha::wire::VerifyResponse;
    /// use friendly_captcha::{VerificationOutcome, VerifyResult};
    ///
    /// let outcome = VerificationOutcome::Decoded {
    ///     status: 201,
    ///     response: VerifyResponse::default(),
    /// };
    /// VerifyResult::new(outcome, true);
    /// ```
    pub fn new(outcome: VerificationOutcome, strict: bool) -> Self {
        Self { outcome, strict }
    }

    /// Returns true if the submission should be allowed through
    pub fn should_accept(&self) -> bool {
        match &self.outcome {
            VerificationOutcome::Decoded { status, response } => {
                debug_assert_eq!(
                    *status, 200,
                    "decoded siteverify outcome must carry HTTP 200: {:?}",
                    response
                );
                response.success
            }
            // Never lock users out because our own infrastructure is broken.
            VerificationOutcome::Transport(_) | VerificationOutcome::Encoding(_) => !self.strict,
            VerificationOutcome::Client(_) => !self.strict,
        }
    }

    pub fn should_reject(&self) -> bool {
        !self.should_accept()
    }

    /// Returns true if the API returned a verdict. This does not say whether
    /// the captcha was solved, see [`VerifyResult::success`].
    ///
    /// When false, log [`VerifyResult::request_error`] and check
    /// [`VerifyResult::is_client_error`] to see if the configuration needs
    /// fixing.
    pub fn was_able_to_verify(&self) -> bool {
        matches!(self.outcome, VerificationOutcome::Decoded { .. })
    }

    /// Returns true if the API rejected the request itself, e.g. because the
    /// API key is wrong. Fix this as soon as possible.
    pub fn is_client_error(&self) -> bool {
        matches!(self.outcome, VerificationOutcome::Client(_))
    }

    /// Returns true if the API could not be reached, answered with something
    /// unintelligible, or the request could not be built
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self.outcome,
            VerificationOutcome::Transport(_) | VerificationOutcome::Encoding(_)
        )
    }

    /// Returns true if the captcha was verified and solved correctly
    pub fn success(&self) -> bool {
        matches!(&self.outcome, VerificationOutcome::Decoded { response, .. } if response.success)
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn decision(&self) -> AcceptanceDecision {
        AcceptanceDecision {
            should_accept: self.should_accept(),
            was_able_to_verify: self.was_able_to_verify(),
            is_client_error: self.is_client_error(),
            is_transport_error: self.is_transport_error(),
        }
    }

    /// HTTP status of the API response, `None` if there was none
    pub fn status(&self) -> Option<u16> {
        self.outcome.status()
    }

    /// Decoded API response, present for verdicts and client errors
    pub fn response(&self) -> Option<&VerifyResponse> {
        self.outcome.response()
    }

    /// The error that prevented verification, if any
    pub fn request_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.outcome.error()
    }

    pub fn outcome(&self) -> &VerificationOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> VerificationOutcome {
        self.outcome
    }
}
