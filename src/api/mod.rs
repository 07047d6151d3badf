//! Upstream glif API.
//!
//! Tools talk to the API through the [`GlifApi`] trait so the registry and
//! tool handlers can be exercised against an in-memory double.

mod client;
mod types;

pub use client::GlifClient;
pub use types::{
    Agent, AgentSkill, Glif, GlifDetails, GlifGraph, GlifNode, GlifRun, GlifUser, RunOutput,
    SearchParams,
};

use async_trait::async_trait;

use crate::error::ApiError;

/// Operations the tool layer needs from the glif API.
#[async_trait]
pub trait GlifApi: Send + Sync {
    /// Run a glif with positional string inputs.
    async fn run(&self, id: &str, inputs: &[String]) -> Result<RunOutput, ApiError>;

    /// Search glifs.
    async fn search(&self, params: &SearchParams) -> Result<Vec<Glif>, ApiError>;

    /// Fetch a glif and its most recent runs.
    async fn get_details(&self, id: &str) -> Result<GlifDetails, ApiError>;

    /// The user owning the configured API token.
    async fn me(&self) -> Result<GlifUser, ApiError>;

    /// List agents, optionally filtered by a search string.
    async fn list_agents(&self, query: Option<&str>) -> Result<Vec<Agent>, ApiError>;

    /// Fetch one agent with its attached glifs.
    async fn get_agent(&self, id: &str) -> Result<Agent, ApiError>;
}
