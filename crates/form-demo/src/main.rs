//! # form-demo - Friendly Captcha example server
//!
//! Serves a contact form with the Friendly Captcha widget and verifies the
//! submitted response token before "processing" the message.
//!
//! ```text
//! Browser → form-demo → siteverify API
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod page;
mod routes;
mod state;

use config::AppConfig;
use state::AppState;

/// Friendly Captcha form demo
#[derive(Parser, Debug, Default)]
#[command(name = "form-demo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/form-demo.toml")]
    config: String,

    /// Friendly Captcha API key (overrides config)
    #[arg(long, env = "FRC_APIKEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Sitekey of the widget (overrides config)
    #[arg(long, env = "FRC_SITEKEY")]
    sitekey: Option<String>,

    /// API endpoint: "global", "eu" or a base URL (overrides config)
    #[arg(long, env = "FRC_API_ENDPOINT")]
    api_endpoint: Option<String>,

    /// Full siteverify URL, path is discarded (deprecated, use --api-endpoint)
    #[arg(long, env = "FRC_SITEVERIFY_ENDPOINT")]
    siteverify_endpoint: Option<String>,

    /// Endpoint the widget talks to (overrides config)
    #[arg(long, env = "FRC_WIDGET_ENDPOINT")]
    widget_endpoint: Option<String>,

    /// Reject submissions that could not be verified
    #[arg(long, env = "FRC_STRICT")]
    strict: bool,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting form-demo v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(&args.config, &args)?;
    info!(
        endpoint = %config.captcha.api_endpoint,
        strict = config.captcha.strict,
        "Configuration loaded from {}",
        args.config
    );

    let state = AppState::new(&config, args.siteverify_endpoint.as_deref())?;
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("Listening on http://{}", config.listen_addr);

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("form-demo shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
            .context("Failed to install tracing subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .context("Failed to install tracing subscriber")?;
    }

    Ok(())
}
