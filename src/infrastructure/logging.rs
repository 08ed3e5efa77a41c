//! Logging system initialization.
//!
//! Console subscriber only; the configured level applies unless `RUST_LOG`
//! overrides it.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::LoggingConfig;

/// Initialize the tracing subscriber from the logging configuration.
///
/// Safe to call once per process; a second call fails because a global
/// subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}
