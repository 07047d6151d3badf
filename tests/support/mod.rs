//! In-memory doubles for the glif API and the media fetcher.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use glif_mcp::api::{Agent, Glif, GlifApi, GlifDetails, GlifUser, RunOutput, SearchParams};
use glif_mcp::error::{ApiError, FetchError};
use glif_mcp::media::{MediaEncoder, MediaFetcher};
use glif_mcp::tools::GlifRunner;

/// API double backed by a fixed set of glifs.
#[derive(Default)]
pub struct MockApi {
    glifs: HashMap<String, Glif>,
    outputs: HashMap<String, RunOutput>,
    pub runs: Mutex<Vec<(String, Vec<String>)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_glif(mut self, id: &str, name: &str, description: &str) -> Self {
        self.glifs.insert(
            id.to_string(),
            Glif {
                id: id.to_string(),
                name: name.to_string(),
                description: Some(description.to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_output(mut self, id: &str, output: &str, output_type: &str) -> Self {
        self.outputs.insert(
            id.to_string(),
            RunOutput {
                id: Some(format!("run-{id}")),
                output: Some(output.to_string()),
                output_type: Some(output_type.to_string()),
            },
        );
        self
    }

    pub fn run_log(&self) -> Vec<(String, Vec<String>)> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl GlifApi for MockApi {
    async fn run(&self, id: &str, inputs: &[String]) -> Result<RunOutput, ApiError> {
        self.runs
            .lock()
            .unwrap()
            .push((id.to_string(), inputs.to_vec()));
        self.outputs
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Glif>, ApiError> {
        let query = params.query.as_deref().unwrap_or("").to_lowercase();
        let mut found: Vec<Glif> = self
            .glifs
            .values()
            .filter(|g| g.name.to_lowercase().contains(&query))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn get_details(&self, id: &str) -> Result<GlifDetails, ApiError> {
        self.glifs
            .get(id)
            .map(|glif| GlifDetails {
                glif: glif.clone(),
                recent_runs: Vec::new(),
            })
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn me(&self) -> Result<GlifUser, ApiError> {
        Ok(GlifUser {
            id: "user-1".to_string(),
            username: Some("tester".to_string()),
            ..Default::default()
        })
    }

    async fn list_agents(&self, _query: Option<&str>) -> Result<Vec<Agent>, ApiError> {
        Ok(vec![Agent {
            id: "agent-1".to_string(),
            name: "Helper".to_string(),
            ..Default::default()
        }])
    }

    async fn get_agent(&self, id: &str) -> Result<Agent, ApiError> {
        Err(ApiError::NotFound(id.to_string()))
    }
}

/// Fetcher double returning canned base64 per URL.
#[derive(Default)]
pub struct StubFetcher {
    pub responses: HashMap<String, String>,
}

impl StubFetcher {
    pub fn with(mut self, url: &str, data: &str) -> Self {
        self.responses.insert(url.to_string(), data.to_string());
        self
    }
}

#[async_trait]
impl MediaFetcher for StubFetcher {
    async fn fetch_base64(&self, url: &str) -> Result<String, FetchError> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status(404))
    }
}

pub fn runner(api: Arc<MockApi>, fetcher: StubFetcher) -> Arc<GlifRunner> {
    Arc::new(GlifRunner::new(
        api,
        Arc::new(MediaEncoder::new(Arc::new(fetcher))),
    ))
}
