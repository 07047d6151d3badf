//! Agent browsing tools. Off unless `AGENT_TOOLS` is set.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::GlifApi;
use crate::media::ContentBlock;
use crate::tools::builtin::format;
use crate::tools::tool::{Tool, ToolError, parse_params, require_str};

// ── list_agents ─────────────────────────────────────────────────────────

pub struct ListAgentsTool {
    api: Arc<dyn GlifApi>,
}

impl ListAgentsTool {
    pub fn new(api: Arc<dyn GlifApi>) -> Self {
        Self { api }
    }
}

#[derive(Deserialize)]
struct ListAgentsParams {
    #[serde(default)]
    search: Option<String>,
}

#[async_trait]
impl Tool for ListAgentsTool {
    fn name(&self) -> &str {
        "list_agents"
    }

    fn description(&self) -> &str {
        "List agents, optionally filtered by a search string."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "search": {
                    "type": "string",
                    "description": "Optional text to filter agents by"
                }
            }
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let params: ListAgentsParams = parse_params(params)?;
        let query = params.search.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let agents = self.api.list_agents(query).await?;
        Ok(vec![ContentBlock::text(format::agent_list(&agents))])
    }
}

// ── load_agent ──────────────────────────────────────────────────────────

pub struct LoadAgentTool {
    api: Arc<dyn GlifApi>,
}

impl LoadAgentTool {
    pub fn new(api: Arc<dyn GlifApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for LoadAgentTool {
    fn name(&self) -> &str {
        "load_agent"
    }

    fn description(&self) -> &str {
        "Load an agent's personality and the glifs it can use. Adopt the personality and call its glifs with run_glif."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The agent id"
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let id = require_str(&params, "id")?;
        let agent = self.api.get_agent(id).await?;
        Ok(vec![ContentBlock::text(format::agent(&agent))])
    }
}
