use std::path::Path;

use secrecy::ExposeSecret;

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

        let expanded = crate::env::expand_env(&raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream credential is missing or the
    /// upstream base URL is not an HTTP(S) URL
    pub fn validate(&self) -> anyhow::Result<()> {
        match &self.upstream.api_key {
            None => anyhow::bail!("upstream.api_key must be configured"),
            Some(key) if key.expose_secret().trim().is_empty() => {
                anyhow::bail!("upstream.api_key must not be empty");
            }
            Some(_) => {}
        }

        let base_url = self.upstream.base_url();
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("upstream.base_url must be an http(s) URL, got `{base_url}`");
        }

        Ok(())
    }
}
