use secrecy::SecretString;

use crate::config::helpers::optional_env;
use crate::error::ConfigError;

/// Default endpoint for running glifs.
pub const DEFAULT_RUN_URL: &str = "https://simple-api.glif.app";

/// Default base URL for the glif REST API.
pub const DEFAULT_API_URL: &str = "https://glif.app/api";

/// Upstream glif API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bearer token (`GLIF_API_TOKEN`). Runs and user lookups need it.
    pub token: Option<SecretString>,
    /// Endpoint that executes glifs.
    pub run_url: String,
    /// Base URL for glif, run, user and agent queries.
    pub api_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: None,
            run_url: DEFAULT_RUN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            token: optional_env("GLIF_API_TOKEN")?.map(SecretString::from),
            run_url: optional_env("GLIF_RUN_URL")?
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_RUN_URL.to_string()),
            api_url: optional_env("GLIF_API_URL")?
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}
