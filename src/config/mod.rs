//! Configuration resolved from the environment.
//!
//! `.env` is loaded by the binary before [`Config::from_env`] runs, so every
//! section only ever looks at process environment variables.

mod api;
pub(crate) mod helpers;
mod media;
mod storage;
mod tools;

pub use api::{ApiConfig, DEFAULT_API_URL, DEFAULT_RUN_URL};
pub use helpers::is_truthy;
pub use media::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_MEDIA_BYTES, MediaConfig};
pub use storage::StorageConfig;
pub use tools::{ENV_TOOL_PREFIX, ToolsConfig, ToolsConfigProvider, env_provider, fixed_provider};

use crate::error::ConfigError;

/// Full process configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub media: MediaConfig,
    pub storage: StorageConfig,
    /// Flags as seen at startup. Requests re-read them via [`env_provider`].
    pub tools: ToolsConfig,
}

impl Config {
    /// Resolve every section from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api: ApiConfig::resolve()?,
            media: MediaConfig::resolve()?,
            storage: StorageConfig::resolve()?,
            tools: ToolsConfig::from_env(),
        })
    }
}
