use std::time::Duration;

use crate::config::helpers::parse_optional_env;
use crate::error::ConfigError;

/// Default ceiling for a single media download (10 MiB).
pub const DEFAULT_MAX_MEDIA_BYTES: u64 = 10 * 1024 * 1024;

/// Default wall-clock limit for a single media download.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Limits applied by the secure media fetcher.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Largest body the fetcher will buffer.
    pub max_bytes: u64,
    /// Hard timeout for the whole request, body included.
    pub timeout: Duration,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_MEDIA_BYTES,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl MediaConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        let max_bytes = parse_optional_env("MEDIA_MAX_BYTES", DEFAULT_MAX_MEDIA_BYTES)?;
        if max_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MEDIA_MAX_BYTES".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        let timeout_secs =
            parse_optional_env("MEDIA_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT.as_secs())?;

        Ok(Self {
            max_bytes,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
