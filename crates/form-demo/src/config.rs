//! Configuration management for form-demo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use friendly_captcha::ClientConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Endpoint the widget talks to, left to the widget's default when unset
    #[serde(default)]
    pub widget_endpoint: Option<String>,

    /// Verification client configuration
    #[serde(default)]
    pub captcha: ClientConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8844".to_string()
}

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            tracing::warn!(path = config_path, "Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI (and environment) overrides
        if let Some(ref api_key) = args.api_key {
            config.captcha.api_key = api_key.clone();
        }
        if let Some(ref sitekey) = args.sitekey {
            config.captcha.sitekey = Some(sitekey.clone());
        }
        if let Some(ref endpoint) = args.api_endpoint {
            config.captcha.api_endpoint = endpoint.clone();
        }
        if let Some(ref endpoint) = args.widget_endpoint {
            config.widget_endpoint = Some(endpoint.clone());
        }
        if args.strict {
            config.captcha.strict = true;
        }
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// The demo needs both keys: the sitekey to render the widget and the API
    /// key to verify its responses.
    pub fn validate(&self) -> Result<()> {
        let has_sitekey = self.captcha.sitekey.as_deref().is_some_and(|s| !s.is_empty());
        if !has_sitekey || self.captcha.api_key.is_empty() {
            anyhow::bail!(
                "Please set FRC_SITEKEY and FRC_APIKEY (or captcha.sitekey and captcha.api_key) to your Friendly Captcha sitekey and API key"
            );
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            widget_endpoint: None,
            captcha: ClientConfig::default(),
        }
    }
}
