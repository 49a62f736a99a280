use async_trait::async_trait;

use super::output::RunOutput;
use crate::errors::ClientResult;
use crate::models::agent::AgentManifest;

/// A connection to one endpoint hosting one or more agents
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Base URL of the endpoint, used to label results and failures
    fn endpoint(&self) -> &str;

    /// Run the named agent to completion with a single text input and decode its reply
    async fn run_sync(&self, agent_name: &str, input: &str) -> ClientResult<RunOutput>;

    /// List the agents registered on the endpoint
    async fn agents(&self) -> ClientResult<Vec<AgentManifest>>;
}
