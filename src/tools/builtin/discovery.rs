//! Browsing glifs and the current user.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::{GlifApi, SearchParams};
use crate::media::ContentBlock;
use crate::tools::builtin::format;
use crate::tools::tool::{Tool, ToolError, parse_params};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
struct LimitParams {
    #[serde(default)]
    limit: Option<usize>,
}

fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

fn limit_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "integer",
        "description": "Maximum number of results (default 20, max 100)",
        "minimum": 1,
        "maximum": MAX_LIMIT
    })
}

// ── list_featured_glifs ─────────────────────────────────────────────────

pub struct ListFeaturedGlifsTool {
    api: Arc<dyn GlifApi>,
}

impl ListFeaturedGlifsTool {
    pub fn new(api: Arc<dyn GlifApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for ListFeaturedGlifsTool {
    fn name(&self) -> &str {
        "list_featured_glifs"
    }

    fn description(&self) -> &str {
        "List glifs currently featured on glif.app."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "limit": limit_schema() }
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let params: LimitParams = parse_params(params)?;
        let search = SearchParams {
            limit: Some(clamp_limit(params.limit)),
            ..SearchParams::featured()
        };
        let glifs = self.api.search(&search).await?;
        Ok(vec![ContentBlock::text(format::glif_list(
            "Featured glifs",
            &glifs,
        ))])
    }
}

// ── search_glifs ────────────────────────────────────────────────────────

pub struct SearchGlifsTool {
    api: Arc<dyn GlifApi>,
}

impl SearchGlifsTool {
    pub fn new(api: Arc<dyn GlifApi>) -> Self {
        Self { api }
    }
}

#[derive(Deserialize)]
struct SearchToolParams {
    query: String,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl Tool for SearchGlifsTool {
    fn name(&self) -> &str {
        "search_glifs"
    }

    fn description(&self) -> &str {
        "Search glifs by name or description."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search text"
                },
                "sort": {
                    "type": "string",
                    "enum": ["new", "popular", "featured"],
                    "description": "Result ordering"
                },
                "limit": limit_schema()
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let params: SearchToolParams = parse_params(params)?;
        let query = params.query.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidParameters(
                "query must not be empty".to_string(),
            ));
        }

        let search = SearchParams {
            sort: params.sort,
            limit: Some(clamp_limit(params.limit)),
            ..SearchParams::query(query)
        };
        let glifs = self.api.search(&search).await?;
        Ok(vec![ContentBlock::text(format::glif_list(
            &format!("Glifs matching \"{query}\""),
            &glifs,
        ))])
    }
}

// ── my_glifs ────────────────────────────────────────────────────────────

pub struct MyGlifsTool {
    api: Arc<dyn GlifApi>,
}

impl MyGlifsTool {
    pub fn new(api: Arc<dyn GlifApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for MyGlifsTool {
    fn name(&self) -> &str {
        "my_glifs"
    }

    fn description(&self) -> &str {
        "List glifs created by the user owning the API token."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": { "limit": limit_schema() }
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let params: LimitParams = parse_params(params)?;
        let me = self.api.me().await?;
        let search = SearchParams {
            limit: Some(clamp_limit(params.limit)),
            ..SearchParams::by_user(&me.id)
        };
        let glifs = self.api.search(&search).await?;
        Ok(vec![ContentBlock::text(format::glif_list("Your glifs", &glifs))])
    }
}

// ── my_user_info ────────────────────────────────────────────────────────

pub struct MyUserInfoTool {
    api: Arc<dyn GlifApi>,
}

impl MyUserInfoTool {
    pub fn new(api: Arc<dyn GlifApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for MyUserInfoTool {
    fn name(&self) -> &str {
        "my_user_info"
    }

    fn description(&self) -> &str {
        "Show the profile of the user owning the API token and their most recent glifs."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<Vec<ContentBlock>, ToolError> {
        let me = self.api.me().await?;
        let mut text = format::user(&me);

        let recent = SearchParams {
            sort: Some("new".to_string()),
            limit: Some(5),
            ..SearchParams::by_user(&me.id)
        };
        // Profile is still useful when the glif listing fails.
        match self.api.search(&recent).await {
            Ok(glifs) => {
                text.push_str("\n\n");
                text.push_str(&format::glif_list("Recent glifs", &glifs));
            }
            Err(e) => tracing::warn!("Could not list user glifs: {}", e),
        }

        Ok(vec![ContentBlock::text(text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(7)), 7);
    }
}
