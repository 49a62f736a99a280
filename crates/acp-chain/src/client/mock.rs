use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::base::AgentClient;
use super::output::RunOutput;
use crate::errors::{ClientError, ClientResult};
use crate::models::agent::AgentManifest;

/// An agent client that answers from pre-configured replies and records every run
pub struct MockAgentClient {
    endpoint: String,
    replies: HashMap<String, RunOutput>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockAgentClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            replies: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register an agent that replies with `text` in the primary output shape
    pub fn with_agent(self, agent_name: &str, text: &str) -> Self {
        self.with_reply(agent_name, RunOutput::Output(text.to_string()))
    }

    pub fn with_reply(mut self, agent_name: &str, output: RunOutput) -> Self {
        self.replies.insert(agent_name.to_string(), output);
        self
    }

    /// Every `(agent, input)` pair this client was asked to run, in order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentClient for MockAgentClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn run_sync(&self, agent_name: &str, input: &str) -> ClientResult<RunOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((agent_name.to_string(), input.to_string()));

        self.replies
            .get(agent_name)
            .cloned()
            .ok_or_else(|| ClientError::AgentNotFound {
                agent: agent_name.to_string(),
                endpoint: self.endpoint.clone(),
            })
    }

    async fn agents(&self) -> ClientResult<Vec<AgentManifest>> {
        let mut names: Vec<_> = self.replies.keys().cloned().collect();
        names.sort();
        Ok(names.into_iter().map(AgentManifest::new).collect())
    }
}
