use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::base::AgentClient;
use super::output::{parse_envelope, RunOutput, ACP_ENVELOPE_VERSION};
use crate::errors::{ClientError, ClientResult};
use crate::models::agent::{AgentManifest, AgentsListResponse};
use crate::models::run::RunCreateRequest;

/// HTTP client for one ACP endpoint. The underlying connection pool lives as long as
/// this value, so dropping it releases the session.
pub struct AcpClient {
    client: Client,
    endpoint: String,
}

impl AcpClient {
    /// Build a client for `endpoint`. Without a timeout a hung agent hangs the caller.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let url =
            Url::parse(endpoint).map_err(|_| ClientError::InvalidEndpoint(endpoint.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidEndpoint(endpoint.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    fn transport_error(&self, source: reqwest::Error) -> ClientError {
        ClientError::Connectivity {
            endpoint: self.endpoint.clone(),
            source,
        }
    }

    async fn http_error(&self, response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ClientError::Http {
            endpoint: self.endpoint.clone(),
            status,
            body,
        }
    }
}

#[async_trait]
impl AgentClient for AcpClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn run_sync(&self, agent_name: &str, input: &str) -> ClientResult<RunOutput> {
        let payload = RunCreateRequest::sync_text(agent_name, input);
        debug!(endpoint = %self.endpoint, agent = agent_name, "starting synchronous run");

        let response = self
            .client
            .post(self.url("runs"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(ClientError::AgentNotFound {
                    agent: agent_name.to_string(),
                    endpoint: self.endpoint.clone(),
                })
            }
            _ => return Err(self.http_error(response).await),
        }

        let body = response
            .text()
            .await
            .map_err(|source| ClientError::InvalidResponse {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        debug!(endpoint = %self.endpoint, agent = agent_name, body = %body, "run envelope");

        let envelope = parse_envelope(&body);

        if envelope.get("status").and_then(Value::as_str) == Some("failed") {
            let message = envelope
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("the server gave no reason")
                .to_string();
            return Err(ClientError::RunFailed {
                agent: agent_name.to_string(),
                message,
            });
        }

        let output = RunOutput::from_envelope(&envelope);
        if output.is_fallback() {
            warn!(
                endpoint = %self.endpoint,
                agent = agent_name,
                shape = output.shape(),
                expected = ACP_ENVELOPE_VERSION,
                "run reply did not use the primary output shape"
            );
        }
        Ok(output)
    }

    async fn agents(&self) -> ClientResult<Vec<AgentManifest>> {
        let response = self
            .client
            .get(self.url("agents"))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(self.http_error(response).await);
        }

        let listing: AgentsListResponse =
            response
                .json()
                .await
                .map_err(|source| ClientError::InvalidResponse {
                    endpoint: self.endpoint.clone(),
                    source,
                })?;
        Ok(listing.agents)
    }
}
