use std::sync::Arc;

use crate::config::helpers::{optional_env, parse_flag_env};
use crate::tools::store::parse_id_list;

/// Prefix for tools synthesized from `GLIF_IDS`.
pub const ENV_TOOL_PREFIX: &str = "glif_";

/// Feature flags that decide which tool groups are visible.
///
/// Re-read on every listing and dispatch through a [`ToolsConfigProvider`],
/// so toggling the environment of a long-running process takes effect on the
/// next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    /// Search, featured and user tools (`IGNORE_DISCOVERY_TOOLS` turns off).
    pub discovery: bool,
    /// Save/remove/list tools for saved bindings (`IGNORE_METASKILL_TOOLS` turns off).
    pub metaskill: bool,
    /// Saved bindings as tools (`IGNORE_SAVED_GLIFS` turns off).
    pub saved_tools: bool,
    /// Agent tools (`AGENT_TOOLS` turns on).
    pub agents: bool,
    /// Glif ids exposed as `glif_<id>` tools (`GLIF_IDS`).
    pub glif_ids: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            discovery: true,
            metaskill: true,
            saved_tools: true,
            agents: false,
            glif_ids: Vec::new(),
        }
    }
}

impl ToolsConfig {
    /// Read flags from the process environment.
    ///
    /// Never fails: malformed flags read as off, an unreadable id list as empty.
    pub fn from_env() -> Self {
        Self {
            discovery: !parse_flag_env("IGNORE_DISCOVERY_TOOLS"),
            metaskill: !parse_flag_env("IGNORE_METASKILL_TOOLS"),
            saved_tools: !parse_flag_env("IGNORE_SAVED_GLIFS"),
            agents: parse_flag_env("AGENT_TOOLS"),
            glif_ids: optional_env("GLIF_IDS")
                .ok()
                .flatten()
                .map(|raw| parse_id_list(&raw))
                .unwrap_or_default(),
        }
    }
}

/// Source of the current [`ToolsConfig`], injected once at startup.
pub type ToolsConfigProvider = Arc<dyn Fn() -> ToolsConfig + Send + Sync>;

/// Provider that re-reads the environment on every call.
pub fn env_provider() -> ToolsConfigProvider {
    Arc::new(ToolsConfig::from_env)
}

/// Provider that always returns the same snapshot.
pub fn fixed_provider(config: ToolsConfig) -> ToolsConfigProvider {
    Arc::new(move || config.clone())
}
