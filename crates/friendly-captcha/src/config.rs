//! Client configuration and construction.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use frc_common::constants::{
    EU_API_ENDPOINT, EU_SHORTHAND, GLOBAL_API_ENDPOINT, GLOBAL_SHORTHAND, SITEVERIFY_PATH,
};

use crate::client::Client;

/// Connect timeout of the default HTTP client
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while building a [`Client`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key (or an empty one) was configured
    #[error(
        "you must set your Friendly Captcha API key using `ClientBuilder::api_key()` when creating a new client"
    )]
    MissingApiKey,

    /// An endpoint option was set to the empty string
    #[error("{option} must not be empty")]
    EmptyEndpoint { option: &'static str },

    /// A legacy siteverify endpoint could not be parsed as a URL
    #[error("invalid siteverify endpoint URL {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The default HTTP client could not be created
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Resolve an API endpoint option.
///
/// Accepts the shorthands `"global"` and `"eu"`, or a base URL without path
/// which is used verbatim.
pub fn resolve_api_endpoint(endpoint: &str) -> Result<String, ConfigError> {
    match endpoint {
        GLOBAL_SHORTHAND => Ok(GLOBAL_API_ENDPOINT.to_string()),
        EU_SHORTHAND => Ok(EU_API_ENDPOINT.to_string()),
        "" => Err(ConfigError::EmptyEndpoint {
            option: "api_endpoint",
        }),
        other => Ok(other.to_string()),
    }
}

/// Resolve a legacy siteverify endpoint option.
///
/// Takes a full siteverify URL (or a shorthand) and keeps only
/// `scheme://host[:port]`.
#[deprecated(note = "use `resolve_api_endpoint`; this strips the path from the URL")]
pub fn resolve_siteverify_endpoint(endpoint: &str) -> Result<String, ConfigError> {
    match endpoint {
        "" => Err(ConfigError::EmptyEndpoint {
            option: "siteverify_endpoint",
        }),
        GLOBAL_SHORTHAND | EU_SHORTHAND => resolve_api_endpoint(endpoint),
        other => {
            let invalid = |reason: String| ConfigError::InvalidEndpoint {
                url: other.to_string(),
                reason,
            };

            let url = reqwest::Url::parse(other).map_err(|e| invalid(e.to_string()))?;
            if url.host_str().is_none() {
                return Err(invalid("missing host".to_string()));
            }

            // Url drops a port equal to the scheme default, so the authority
            // is taken from the input as written.
            let host = authority(other).ok_or_else(|| invalid("missing host".to_string()))?;
            resolve_api_endpoint(&format!("{}://{}", url.scheme(), host))
        }
    }
}

/// Host and port of `url` exactly as written, without any userinfo
fn authority(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    (!host.is_empty()).then_some(host)
}

/// Client configuration as read from a config file or the environment
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// API key sent in the X-Api-Key header
    #[serde(default)]
    pub api_key: String,

    /// Sitekey attached to every request (optional)
    #[serde(default)]
    pub sitekey: Option<String>,

    /// "global", "eu" or a base URL
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Reject responses that could not be verified
    #[serde(default)]
    pub strict: bool,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_endpoint() -> String { GLOBAL_SHORTHAND.to_string() }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            sitekey: None,
            api_endpoint: default_api_endpoint(),
            strict: false,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Turn this configuration into a builder, so further options can be applied
    pub fn builder(&self) -> ClientBuilder {
        let mut builder = Client::builder()
            .api_key(&self.api_key)
            .api_endpoint(&self.api_endpoint)
            .strict(self.strict);

        if let Some(sitekey) = &self.sitekey {
            builder = builder.sitekey(sitekey);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
    }

    pub fn build(&self) -> Result<Client, ConfigError> {
        self.builder().build()
    }
}

/// Builder for [`Client`].
///
/// Endpoint options are validated when set, but the error is only reported
/// from [`ClientBuilder::build`]. When several endpoint options are given the
/// last one wins.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    sitekey: Option<String>,
    api_endpoint: Option<Result<String, ConfigError>>,
    strict: bool,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key (required)
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the sitekey sent along with each verification (optional)
    pub fn sitekey(mut self, sitekey: impl Into<String>) -> Self {
        self.sitekey = Some(sitekey.into());
        self
    }

    /// Set the API endpoint: `"global"` (default), `"eu"`, or a base URL
    /// such as `https://global.frcapi.com`
    pub fn api_endpoint(mut self, endpoint: &str) -> Self {
        self.api_endpoint = Some(resolve_api_endpoint(endpoint));
        self
    }

    /// Set the endpoint from a full siteverify URL; the path is discarded
    #[deprecated(note = "use `api_endpoint`")]
    #[allow(deprecated)]
    pub fn siteverify_endpoint(mut self, endpoint: &str) -> Self {
        self.api_endpoint = Some(resolve_siteverify_endpoint(endpoint));
        self
    }

    /// In strict mode only verified responses are accepted. An invalid API
    /// key or an unreachable API then rejects every submission.
    ///
    /// Defaults to `false`.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Abort each verification request after `timeout`
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a caller-provided HTTP client instead of the default one
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Validate the options and create the client. Performs no network I/O.
    pub fn build(self) -> Result<Client, ConfigError> {
        let api_endpoint = match self.api_endpoint {
            Some(endpoint) => endpoint?,
            None => GLOBAL_API_ENDPOINT.to_string(),
        };

        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let http = match self.http_client {
            Some(http) => http,
            None => reqwest::Client::builder()
                .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
                .build()
                .map_err(ConfigError::HttpClient)?,
        };

        let siteverify_url = format!("{}{}", api_endpoint.trim_end_matches('/'), SITEVERIFY_PATH);

        Ok(Client {
            api_key,
            sitekey: self.sitekey.filter(|s| !s.is_empty()),
            api_endpoint,
            siteverify_url,
            strict: self.strict,
            timeout: self.timeout,
            http,
        })
    }
}
