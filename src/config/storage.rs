use std::path::PathBuf;

use crate::bootstrap::glif_base_dir;
use crate::config::helpers::optional_env;
use crate::error::ConfigError;

/// Where saved tool bindings live on disk.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON file holding saved bindings (default: ~/.glif-mcp/saved-tools.json).
    pub tools_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tools_path: default_tools_path(),
        }
    }
}

fn default_tools_path() -> PathBuf {
    glif_base_dir().join("saved-tools.json")
}

impl StorageConfig {
    pub(crate) fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            tools_path: optional_env("GLIF_TOOLS_PATH")?
                .map(PathBuf::from)
                .unwrap_or_else(default_tools_path),
        })
    }
}
