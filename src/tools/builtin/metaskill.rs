//! Tools that manage saved glif bindings from inside a conversation.
//!
//! A saved binding shows up as its own tool on the next `tools/list`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::GlifApi;
use crate::media::ContentBlock;
use crate::tools::builtin::format;
use crate::tools::store::{SavedBinding, SavedToolStore};
use crate::tools::tool::{Tool, ToolError, parse_params, require_str};

// ── save_glif_as_tool ───────────────────────────────────────────────────

pub struct SaveGlifAsToolTool {
    api: Arc<dyn GlifApi>,
    store: Arc<SavedToolStore>,
}

impl SaveGlifAsToolTool {
    pub fn new(api: Arc<dyn GlifApi>, store: Arc<SavedToolStore>) -> Self {
        Self { api, store }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveParams {
    id: String,
    #[serde(default)]
    tool_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl Tool for SaveGlifAsToolTool {
    fn name(&self) -> &str {
        "save_glif_as_tool"
    }

    fn description(&self) -> &str {
        "Save a glif as a named tool. Saving under an existing tool name replaces it."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The glif id to save"
                },
                "toolName": {
                    "type": "string",
                    "description": "Tool name; letters, digits, '_' and '-' (defaults to the glif name)"
                },
                "name": {
                    "type": "string",
                    "description": "Display name (defaults to the glif name)"
                },
                "description": {
                    "type": "string",
                    "description": "What the tool does (defaults to the glif description)"
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let params: SaveParams = parse_params(params)?;
        let id = params.id.trim().to_string();
        let mut name = non_empty(params.name);
        let mut description = non_empty(params.description);

        // Fill gaps from upstream; an unreachable API is not fatal.
        if name.is_none() || description.is_none() {
            match self.api.get_details(&id).await {
                Ok(details) => {
                    name = name.or(non_empty(Some(details.glif.name)));
                    description = description.or(non_empty(details.glif.description));
                }
                Err(e) => tracing::warn!(glif_id = %id, "Could not fetch glif details: {}", e),
            }
        }

        let name = name.unwrap_or_else(|| id.clone());
        let tool_name = non_empty(params.tool_name).unwrap_or_else(|| name.clone());
        let binding = SavedBinding::new(&id, tool_name, name, description.unwrap_or_default());
        let saved = self.store.save(binding).await?;

        Ok(vec![ContentBlock::text(format!(
            "Saved glif {} as tool \"{}\". It is available as a tool now.",
            saved.id, saved.tool_name
        ))])
    }
}

// ── remove_glif_tool ────────────────────────────────────────────────────

pub struct RemoveGlifToolTool {
    store: Arc<SavedToolStore>,
}

impl RemoveGlifToolTool {
    pub fn new(store: Arc<SavedToolStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for RemoveGlifToolTool {
    fn name(&self) -> &str {
        "remove_glif_tool"
    }

    fn description(&self) -> &str {
        "Remove a saved glif tool by its tool name."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "toolName": {
                    "type": "string",
                    "description": "Name of the saved tool to remove"
                }
            },
            "required": ["toolName"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let tool_name = require_str(&params, "toolName")?;
        let text = if self.store.remove(tool_name).await? {
            format!("Removed saved tool \"{tool_name}\"")
        } else {
            format!("No saved tool named \"{tool_name}\"")
        };
        Ok(vec![ContentBlock::text(text)])
    }
}

// ── remove_all_glif_tools ───────────────────────────────────────────────

pub struct RemoveAllGlifToolsTool {
    store: Arc<SavedToolStore>,
}

impl RemoveAllGlifToolsTool {
    pub fn new(store: Arc<SavedToolStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for RemoveAllGlifToolsTool {
    fn name(&self) -> &str {
        "remove_all_glif_tools"
    }

    fn description(&self) -> &str {
        "Remove every saved glif tool."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let count = self.store.remove_all().await?;
        Ok(vec![ContentBlock::text(format!(
            "Removed {count} saved glif tool(s)"
        ))])
    }
}

// ── list_saved_glif_tools ───────────────────────────────────────────────

pub struct ListSavedGlifToolsTool {
    store: Arc<SavedToolStore>,
}

impl ListSavedGlifToolsTool {
    pub fn new(store: Arc<SavedToolStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ListSavedGlifToolsTool {
    fn name(&self) -> &str {
        "list_saved_glif_tools"
    }

    fn description(&self) -> &str {
        "List saved glif tools with the glif each one runs."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let bindings = self.store.get_all().await;
        Ok(vec![ContentBlock::text(format::saved_bindings(&bindings))])
    }
}
