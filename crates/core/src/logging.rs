//! Structured logging infrastructure for Courier.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize the logging system from the `[logging]` configuration section.
///
/// `config.json` selects the JSON layer for log aggregation. `RUST_LOG`
/// still takes precedence over `config.level`.
///
/// # Example
/// ```no_run
/// use courier_core::{logging, Config};
///
/// let config = Config::default_config();
/// logging::init_with(&config.logging);
/// tracing::info!(service = "courier-node", "Service started");
/// ```
pub fn init_with(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(&config.level));
    if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
