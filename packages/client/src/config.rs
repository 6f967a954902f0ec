use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Root of the backend, without the `/api/v1` suffix.
    pub base_url: String,
    /// Per-request timeout for the HTTP client.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Defaults, then the optional file at `path`, then
    /// `VOTEPORTAL_CLIENT__*` environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let s = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("VOTEPORTAL_CLIENT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
