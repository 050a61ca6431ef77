//! HTTP command client
//!
//! Thin reqwest wrapper over the `/api` surface of the event source.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use finadvise_types::{
    Advisor, Agent, Campaign, CommandResponse, DataPoint, ErrorBody, HealthResponse, LogEntry,
    OverviewMetrics, StatusResponse,
};

use crate::error::{ClientError, ClientResult};

/// Client for the FinAdvise HTTP API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a client for `api_url`, the base including the `/api` prefix
    pub fn new(api_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = api_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", api_url, e)))?;

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("/health", None).await
    }

    pub async fn list_agents(&self) -> ClientResult<Vec<Agent>> {
        self.get("/agents", None).await
    }

    pub async fn agent_status(&self, id: &str) -> ClientResult<StatusResponse> {
        self.get(&format!("/agents/{}/status", id), Some(id)).await
    }

    pub async fn start_agent(&self, id: &str) -> ClientResult<CommandResponse> {
        self.command(id, "start").await
    }

    pub async fn stop_agent(&self, id: &str) -> ClientResult<CommandResponse> {
        self.command(id, "stop").await
    }

    pub async fn restart_agent(&self, id: &str) -> ClientResult<CommandResponse> {
        self.command(id, "restart").await
    }

    /// Most recent historical lines; `None` lets the server pick
    pub async fn logs(&self, limit: Option<usize>) -> ClientResult<Vec<LogEntry>> {
        self.get(&with_limit("/logs", limit), None).await
    }

    pub async fn agent_logs(&self, id: &str, limit: Option<usize>) -> ClientResult<Vec<LogEntry>> {
        let path = with_limit(&format!("/agents/{}/logs", id), limit);
        self.get(&path, Some(id)).await
    }

    pub async fn campaigns(&self) -> ClientResult<Vec<Campaign>> {
        self.get("/campaigns", None).await
    }

    pub async fn advisors(&self) -> ClientResult<Vec<Advisor>> {
        self.get("/advisors", None).await
    }

    pub async fn overview(&self) -> ClientResult<OverviewMetrics> {
        self.get("/analytics/overview", None).await
    }

    pub async fn realtime(&self, metric: &str) -> ClientResult<Vec<DataPoint>> {
        self.get(&format!("/analytics/realtime/{}", metric), None).await
    }

    async fn command(&self, id: &str, action: &str) -> ClientResult<CommandResponse> {
        let url = format!("{}/agents/{}/{}", self.base_url, id, action);
        debug!(%url, "POST");
        let resp = self.client.post(url).send().await?;
        decode(resp, Some(id)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, agent_id: Option<&str>) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        decode(resp, agent_id).await
    }
}

fn with_limit(path: &str, limit: Option<usize>) -> String {
    match limit {
        Some(limit) => format!("{}?limit={}", path, limit),
        None => path.to_string(),
    }
}

/// Map a response to its body or a typed error
///
/// A 404 on an agent path means the agent is unknown.
async fn decode<T: DeserializeOwned>(resp: Response, agent_id: Option<&str>) -> ClientResult<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = agent_id {
            return Err(ClientError::AgentNotFound(id.to_string()));
        }
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:3001/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001/api");
    }

    #[test]
    fn test_limit_query() {
        assert_eq!(with_limit("/logs", Some(5)), "/logs?limit=5");
        assert_eq!(with_limit("/logs", None), "/logs");
    }
}
