use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an endpoint advertises about one of its agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl AgentManifest {
    pub fn new<S: Into<String>>(name: S) -> Self {
        AgentManifest {
            name: name.into(),
            description: None,
            metadata: None,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Body of `GET /agents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentsListResponse {
    pub agents: Vec<AgentManifest>,
}
