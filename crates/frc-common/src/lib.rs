//! # frc-common
//!
//! Wire types and constants shared by the Friendly Captcha crates.
//!
//! ## Modules
//! - `types` - siteverify request/response bodies
//! - `risk` - risk intelligence payload carried in successful responses
//! - `error` - error codes returned by the siteverify API
//! - `constants` - endpoints, header names, form field name

pub mod constants;
mod de;
pub mod error;
pub mod risk;
pub mod types;

pub use error::ErrorCode;
pub use risk::*;
pub use types::*;
