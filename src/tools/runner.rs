//! Runs a glif and encodes its output.

use std::sync::Arc;

use crate::api::GlifApi;
use crate::media::{ContentBlock, MediaEncoder, OutputPayload};
use crate::tools::tool::ToolError;

/// Shared by `run_glif` and every synthetic glif-bound tool.
pub struct GlifRunner {
    api: Arc<dyn GlifApi>,
    encoder: Arc<MediaEncoder>,
}

impl GlifRunner {
    pub fn new(api: Arc<dyn GlifApi>, encoder: Arc<MediaEncoder>) -> Self {
        Self { api, encoder }
    }

    pub fn api(&self) -> &Arc<dyn GlifApi> {
        &self.api
    }

    /// Run `id` with positional `inputs` and encode the result.
    ///
    /// Upstream failures propagate; anything the glif returns, including an
    /// empty output, becomes at least one content block.
    pub async fn run(&self, id: &str, inputs: &[String]) -> Result<Vec<ContentBlock>, ToolError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ToolError::InvalidParameters(
                "glif id must not be empty".to_string(),
            ));
        }

        tracing::debug!(glif_id = %id, inputs = inputs.len(), "Running glif");
        let output = self.api.run(id, inputs).await?;
        tracing::info!(
            glif_id = %id,
            output_type = output.output_type.as_deref().unwrap_or("none"),
            "Glif run completed"
        );

        let payload = OutputPayload::new(output.output, output.output_type);
        Ok(self.encoder.encode(&payload).await)
    }
}
