//! # friendly-captcha
//!
//! Server-side verification of Friendly Captcha responses.
//!
//! The widget puts a response token into the `frc-captcha-response` form
//! field. Pass it to [`Client::verify`] and use [`VerifyResult::should_accept`]
//! to decide what to do with the submission.
//!
//! ```no_run
//! # async fn handle(token: &str) -> Result<(), friendly_captcha::ConfigError> {
//! let client = friendly_captcha::Client::builder()
//!     .api_key("YOUR_API_KEY")
//!     .sitekey("YOUR_SITEKEY")
//!     .build()?;
//!
//! let result = client.verify(token).await;
//! if !result.was_able_to_verify() {
//!     tracing::warn!(error = ?result.request_error(), "captcha not verified");
//! }
//! if result.should_accept() {
//!     // process the form
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - `config` - client options, builder and endpoint resolution
//! - `client` - the siteverify request executor
//! - `outcome` - what happened during one verification attempt
//! - `result` - the acceptance policy

mod client;
mod config;
mod outcome;
mod result;

pub use client::{Client, sdk_header_value};
#[allow(deprecated)]
pub use config::resolve_siteverify_endpoint;
pub use config::{ClientBuilder, ClientConfig, ConfigError, resolve_api_endpoint};
pub use outcome::{ClientError, EncodingError, TransportError, VerificationOutcome};
pub use result::{AcceptanceDecision, VerifyResult};

pub use frc_common::constants::RESPONSE_FORM_FIELD_NAME;
pub use frc_common::{ErrorCode, VerifyRequest, VerifyResponse};

/// Wire types of the siteverify API
pub use frc_common as wire;
