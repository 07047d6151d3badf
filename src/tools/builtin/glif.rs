//! Always-available tools: run a glif and describe one.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::media::ContentBlock;
use crate::tools::builtin::format;
use crate::tools::runner::GlifRunner;
use crate::tools::tool::{Tool, ToolError, parse_params, require_str};

// ── run_glif ────────────────────────────────────────────────────────────

pub struct RunGlifTool {
    runner: Arc<GlifRunner>,
}

impl RunGlifTool {
    pub fn new(runner: Arc<GlifRunner>) -> Self {
        Self { runner }
    }
}

#[derive(Deserialize)]
struct RunParams {
    id: String,
    #[serde(default)]
    inputs: Vec<String>,
}

#[async_trait]
impl Tool for RunGlifTool {
    fn name(&self) -> &str {
        "run_glif"
    }

    fn description(&self) -> &str {
        "Run a glif by id with positional string inputs. Image and audio results are returned inline."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The glif id"
                },
                "inputs": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Inputs in the order the glif declares them"
                }
            },
            "required": ["id", "inputs"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let params: RunParams = parse_params(params)?;
        self.runner.run(&params.id, &params.inputs).await
    }
}

// ── glif_info ───────────────────────────────────────────────────────────

pub struct GlifInfoTool {
    runner: Arc<GlifRunner>,
}

impl GlifInfoTool {
    pub fn new(runner: Arc<GlifRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Tool for GlifInfoTool {
    fn name(&self) -> &str {
        "glif_info"
    }

    fn description(&self) -> &str {
        "Show a glif's description, expected inputs, and recent runs."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The glif id"
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let id = require_str(&params, "id")?;
        let details = self.runner.api().get_details(id).await?;
        Ok(vec![ContentBlock::text(format::glif_details(&details))])
    }
}
