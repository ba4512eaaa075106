//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::AppConfig;
use friendly_captcha::Client;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Verification client, shared by all requests
    pub captcha: Arc<Client>,

    /// Sitekey rendered into the widget
    pub sitekey: String,

    /// Endpoint the widget talks to
    pub widget_endpoint: Option<String>,
}

impl AppState {
    /// Build the verification client from configuration.
    ///
    /// `legacy_siteverify_endpoint` takes precedence over the configured API
    /// endpoint, like the old `FRC_SITEVERIFY_ENDPOINT` variable did.
    #[allow(deprecated)]
    pub fn new(config: &AppConfig, legacy_siteverify_endpoint: Option<&str>) -> Result<Self> {
        let mut builder = config.captcha.builder();

        if let Some(endpoint) = legacy_siteverify_endpoint {
            tracing::warn!("FRC_SITEVERIFY_ENDPOINT is deprecated, use FRC_API_ENDPOINT");
            builder = builder.siteverify_endpoint(endpoint);
        }

        let client = builder
            .build()
            .context("Failed to create Friendly Captcha client")?;

        Ok(Self {
            captcha: Arc::new(client),
            sitekey: config.captcha.sitekey.clone().unwrap_or_default(),
            widget_endpoint: config.widget_endpoint.clone(),
        })
    }
}
