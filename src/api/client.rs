//! `reqwest`-backed implementation of [`GlifApi`].

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::api::GlifApi;
use crate::api::types::{
    Agent, Glif, GlifDetails, GlifRun, GlifUser, RunOutput, RunResponse, SearchParams,
};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// Glif runs can chain several model calls; allow them time to finish.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// How many recent runs `get_details` returns.
const RECENT_RUNS_LIMIT: usize = 3;

/// HTTP client for the glif API.
pub struct GlifClient {
    client: reqwest::Client,
    token: Option<SecretString>,
    run_url: String,
    api_url: String,
}

impl GlifClient {
    /// Create a client from resolved configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("glif-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            token: config.token.clone(),
            run_url: config.run_url.clone(),
            api_url: config.api_url.clone(),
        })
    }

    fn bearer(&self) -> Result<&str, ApiError> {
        self.token
            .as_ref()
            .map(|t| t.expose_secret())
            .ok_or(ApiError::MissingToken)
    }

    /// GET a JSON document, attaching the token when one is configured.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        require_auth: bool,
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(url).query(query);
        match self.bearer() {
            Ok(token) => request = request.bearer_auth(token),
            Err(e) if require_auth => return Err(e),
            Err(_) => {}
        }

        let response = request.send().await.map_err(|e| ApiError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        decode_response(url, response).await
    }
}

async fn decode_response<T: DeserializeOwned>(
    url: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| ApiError::RequestFailed {
        url: url.to_string(),
        reason: format!("failed to read response body: {e}"),
    })?;

    if !status.is_success() {
        let preview = body.get(..300).unwrap_or(&body).to_string();
        tracing::debug!(%url, status = status.as_u16(), "glif API error: {}", preview);
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: preview,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl GlifApi for GlifClient {
    async fn run(&self, id: &str, inputs: &[String]) -> Result<RunOutput, ApiError> {
        let token = self.bearer()?;
        tracing::info!(glif_id = %id, inputs = inputs.len(), "Running glif");

        let response = self
            .client
            .post(&self.run_url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "id": id, "inputs": inputs }))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                url: self.run_url.clone(),
                reason: e.to_string(),
            })?;

        let run: RunResponse = decode_response(&self.run_url, response).await?;
        if let Some(error) = run.error {
            return Err(ApiError::RunFailed(error));
        }

        Ok(RunOutput {
            id: run.id,
            output: run.output,
            output_type: run.output_full.and_then(|o| o.kind),
        })
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Glif>, ApiError> {
        let url = format!("{}/glifs", self.api_url);
        self.get_json(&url, &params.to_query(), false).await
    }

    async fn get_details(&self, id: &str) -> Result<GlifDetails, ApiError> {
        let url = format!("{}/glifs", self.api_url);
        let glifs: Vec<Glif> = self
            .get_json(&url, &[("id", id.to_string())], false)
            .await?;
        let glif = glifs
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("glif '{id}'")))?;

        // Recent runs are garnish; a failure here should not hide the glif.
        let runs_url = format!("{}/runs", self.api_url);
        let recent_runs: Vec<GlifRun> = match self
            .get_json(
                &runs_url,
                &[
                    ("glifId", id.to_string()),
                    ("limit", RECENT_RUNS_LIMIT.to_string()),
                ],
                false,
            )
            .await
        {
            Ok(runs) => runs,
            Err(e) => {
                tracing::debug!(glif_id = %id, "Could not load recent runs: {}", e);
                Vec::new()
            }
        };

        Ok(GlifDetails {
            glif,
            recent_runs: recent_runs.into_iter().take(RECENT_RUNS_LIMIT).collect(),
        })
    }

    async fn me(&self) -> Result<GlifUser, ApiError> {
        let url = format!("{}/user", self.api_url);
        self.get_json(&url, &[], true).await
    }

    async fn list_agents(&self, query: Option<&str>) -> Result<Vec<Agent>, ApiError> {
        let url = format!("{}/bots", self.api_url);
        let query: Vec<(&str, String)> = query
            .map(|q| vec![("q", q.to_string())])
            .unwrap_or_default();
        self.get_json(&url, &query, false).await
    }

    async fn get_agent(&self, id: &str) -> Result<Agent, ApiError> {
        let url = format!("{}/bots/{}", self.api_url, urlencoding::encode(id));
        self.get_json(&url, &[], false).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_at(url: &str, token: Option<&str>) -> GlifClient {
        GlifClient::new(&ApiConfig {
            token: token.map(|t| SecretString::from(t.to_string())),
            run_url: url.to_string(),
            api_url: url.to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_without_token_fails_before_request() {
        let client = client_at("http://127.0.0.1:1", None);
        let err = client.run("abc", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[tokio::test]
    async fn test_search_reports_unreachable_server() {
        let client = client_at("http://127.0.0.1:1", None);
        let err = client.search(&SearchParams::featured()).await.unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { .. }));
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let client = client_at("http://127.0.0.1:1", None);
        let err = client.me().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }
}
