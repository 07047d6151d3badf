//! Wire types for the glif API.
//!
//! Fields the server may omit are `Option` or `#[serde(default)]`; the API
//! adds fields freely, so unknown keys are ignored.

use serde::{Deserialize, Serialize};

/// A glif (upstream workflow).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Glif {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub output_type: Option<String>,
    #[serde(default)]
    pub user: Option<GlifUser>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub completed_spell_run_count: Option<u64>,
    #[serde(default)]
    pub data: Option<GlifGraph>,
}

impl Glif {
    /// Names of the glif's input nodes, in graph order.
    pub fn input_names(&self) -> Vec<&str> {
        self.data
            .as_ref()
            .map(|d| {
                d.nodes
                    .iter()
                    .filter(|n| n.kind.ends_with("-input"))
                    .map(|n| n.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Node graph of a glif. Only input discovery looks inside it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlifGraph {
    #[serde(default)]
    pub nodes: Vec<GlifNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlifNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Public profile of a glif user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlifUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// A past run of a glif.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlifRun {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub output_type: Option<String>,
    #[serde(default)]
    pub inputs: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub total_duration: Option<u64>,
    #[serde(default)]
    pub user: Option<GlifUser>,
}

/// Result of running a glif: the output value and its declared type tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub id: Option<String>,
    pub output: Option<String>,
    pub output_type: Option<String>,
}

/// Raw response from the run endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub output_full: Option<OutputFull>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputFull {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A glif together with its recent runs.
#[derive(Debug, Clone, Default)]
pub struct GlifDetails {
    pub glif: Glif,
    pub recent_runs: Vec<GlifRun>,
}

/// Filters for glif searches. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub featured: bool,
    pub user_id: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

impl SearchParams {
    /// Featured glifs only.
    pub fn featured() -> Self {
        Self {
            featured: true,
            ..Default::default()
        }
    }

    /// Free-text search.
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Glifs created by a specific user.
    pub fn by_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = &self.query {
            pairs.push(("q", q.clone()));
        }
        if self.featured {
            pairs.push(("featured", "1".to_string()));
        }
        if let Some(user_id) = &self.user_id {
            pairs.push(("userId", user_id.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// An agent (a persona bundling a prompt and a set of glifs).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub user: Option<GlifUser>,
    #[serde(default, rename = "spellsForBot")]
    pub skills: Vec<AgentSkill>,
}

/// A glif attached to an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    #[serde(default)]
    pub spell: Option<Glif>,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub custom_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_glif_with_inputs() {
        let json = r#"{
            "id": "clx1",
            "name": "Meme Maker",
            "description": "Makes memes",
            "likeCount": 3,
            "data": {"nodes": [
                {"name": "topic", "type": "text-input"},
                {"name": "llm", "type": "text"},
                {"name": "photo", "type": "image-input"}
            ]}
        }"#;
        let glif: Glif = serde_json::from_str(json).unwrap();
        assert_eq!(glif.name, "Meme Maker");
        assert_eq!(glif.like_count, Some(3));
        assert_eq!(glif.input_names(), vec!["topic", "photo"]);
    }

    #[test]
    fn test_parse_run_response_output_type() {
        let json = r#"{"id":"run1","output":"https://x.test/a.png","outputFull":{"type":"IMAGE","value":"https://x.test/a.png"}}"#;
        let resp: RunResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.output.as_deref(), Some("https://x.test/a.png"));
        assert_eq!(
            resp.output_full.and_then(|o| o.kind).as_deref(),
            Some("IMAGE")
        );
    }

    #[test]
    fn test_search_params_to_query() {
        let params = SearchParams {
            query: Some("cats".to_string()),
            featured: true,
            limit: Some(5),
            ..Default::default()
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("q", "cats".to_string()),
                ("featured", "1".to_string()),
                ("limit", "5".to_string()),
            ]
        );
    }
}
