//! Tools synthesized from saved bindings and `GLIF_IDS`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::Glif;
use crate::config::ENV_TOOL_PREFIX;
use crate::media::ContentBlock;
use crate::tools::runner::GlifRunner;
use crate::tools::sanitize::sanitize_tool_name;
use crate::tools::store::SavedBinding;
use crate::tools::tool::{Tool, ToolError, parse_params};

/// A tool that runs one fixed glif. Its only parameter is the input list.
pub struct BoundGlifTool {
    name: String,
    description: String,
    glif_id: String,
    runner: Arc<GlifRunner>,
}

#[derive(Deserialize)]
struct BoundParams {
    #[serde(default)]
    inputs: Vec<String>,
}

impl BoundGlifTool {
    /// Tool for a saved binding, named by its stored tool name.
    pub fn saved(binding: &SavedBinding, runner: Arc<GlifRunner>) -> Self {
        let description = if binding.description.trim().is_empty() {
            format!("Run the saved glif \"{}\" ({})", binding.name, binding.id)
        } else {
            binding.description.clone()
        };
        Self {
            name: binding.tool_name.clone(),
            description,
            glif_id: binding.id.clone(),
            runner,
        }
    }

    /// Tool named `glif_<id>` for an id listed in the environment.
    ///
    /// `glif` is the upstream record when it could be fetched; without it the
    /// description is generic.
    pub fn from_env_id(id: &str, glif: Option<&Glif>, runner: Arc<GlifRunner>) -> Self {
        let description = match glif {
            Some(glif) => describe_glif(glif),
            None => format!("Run glif {id}"),
        };
        Self {
            name: env_tool_name(id),
            description,
            glif_id: id.to_string(),
            runner,
        }
    }
}

/// Name of the env-id tool for `id`.
pub fn env_tool_name(id: &str) -> String {
    sanitize_tool_name(&format!("{ENV_TOOL_PREFIX}{id}"))
}

fn describe_glif(glif: &Glif) -> String {
    let mut text = format!("Run the glif \"{}\"", glif.name);
    if let Some(desc) = glif.description.as_deref().map(str::trim)
        && !desc.is_empty()
    {
        text.push_str(": ");
        text.push_str(desc);
    }
    let inputs = glif.input_names();
    if !inputs.is_empty() {
        text.push_str(&format!(". Inputs, in order: {}", inputs.join(", ")));
    }
    text
}

#[async_trait]
impl Tool for BoundGlifTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "inputs": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Positional inputs for the glif"
                }
            },
            "required": ["inputs"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let params: BoundParams = parse_params(params)?;
        self.runner.run(&self.glif_id, &params.inputs).await
    }
}
