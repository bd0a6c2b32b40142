#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod openai;
pub mod telemetry;

use serde::Deserialize;

pub use env::{ConfigError, expand_env};
pub use openai::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level relay configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Responses API connection settings
    pub openai: OpenAiConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
