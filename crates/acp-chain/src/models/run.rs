use serde::{Deserialize, Serialize};

use super::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Sync,
    Async,
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    Created,
    InProgress,
    Awaiting,
    Cancelling,
    Cancelled,
    Completed,
    Failed,
}

/// Body of `POST /runs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCreateRequest {
    pub agent_name: String,
    pub input: Vec<Message>,
    #[serde(default)]
    pub mode: RunMode,
}

impl RunCreateRequest {
    /// A synchronous run with a single text input
    pub fn sync_text<A: Into<String>, S: Into<String>>(agent_name: A, input: S) -> Self {
        RunCreateRequest {
            agent_name: agent_name.into(),
            input: vec![Message::user().with_text(input)],
            mode: RunMode::Sync,
        }
    }
}

/// Error object used both inside a failed run and as an HTTP error body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcpError {
    pub code: String,
    pub message: String,
}

/// The run envelope a server answers a synchronous run with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub status: RunStatus,
    #[serde(default)]
    pub output: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AcpError>,
}
