//! Logging for relay
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! human-readable or a JSON formatting layer.

use relay_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::EnvFilter;

/// Filter used when neither the configuration nor the caller supplies a valid one
pub const FALLBACK_FILTER: &str = "info";

/// Initialize logging from configuration
///
/// The configured `log_filter` takes precedence over `default_filter`.
/// Invalid directives fall back to [`FALLBACK_FILTER`].
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = build_filter(config.map(|c| c.log_filter.as_str()), default_filter);
    let format = config.map(|c| c.format).unwrap_or_default();

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true);
            registry
                .with(json_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
        }
        LogFormat::Text => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false);
            registry
                .with(fmt_layer)
                .try_init()
                .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
        }
    }

    Ok(())
}

/// Resolve the effective filter directive
fn build_filter(configured: Option<&str>, default_filter: &str) -> EnvFilter {
    configured
        .filter(|f| !f.trim().is_empty())
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_new(default_filter).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_FILTER))
}
