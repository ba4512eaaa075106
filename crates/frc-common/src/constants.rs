//! Shared constants for the Friendly Captcha crates.

/// Hosted API endpoint, routed to the nearest region
pub const GLOBAL_API_ENDPOINT: &str = "https://global.frcapi.com";

/// Hosted API endpoint, pinned to the EU
pub const EU_API_ENDPOINT: &str = "https://eu.frcapi.com";

/// Shorthand accepted in place of [`GLOBAL_API_ENDPOINT`]
pub const GLOBAL_SHORTHAND: &str = "global";

/// Shorthand accepted in place of [`EU_API_ENDPOINT`]
pub const EU_SHORTHAND: &str = "eu";

/// Path of the siteverify operation, appended to the API endpoint
pub const SITEVERIFY_PATH: &str = "/api/v2/captcha/siteverify";

/// The form field the widget puts its response token in by default
pub const RESPONSE_FORM_FIELD_NAME: &str = "frc-captcha-response";

/// SDK identifier sent in the [`headers::X_FRC_SDK`] header
pub const SDK_NAME: &str = "friendly-captcha-rust-sdk";

/// HTTP header names
pub mod headers {
    /// API key header
    pub const X_API_KEY: &str = "X-Api-Key";

    /// SDK name and version header
    pub const X_FRC_SDK: &str = "X-Frc-Sdk";
}
