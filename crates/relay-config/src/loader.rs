use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::parse(&raw)?;
        tracing::debug!(path = %path.display(), model = %config.openai.model, "loaded configuration");

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the model is empty or the base URL is not HTTP(S)
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.openai.model.trim().is_empty() {
            anyhow::bail!("openai.model must not be empty");
        }

        if let Some(ref url) = self.openai.base_url
            && !matches!(url.scheme(), "http" | "https")
        {
            anyhow::bail!("openai.base_url must use http or https, got '{}'", url.scheme());
        }

        Ok(())
    }
}
