use reqwest::StatusCode;
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Could not connect to {endpoint}")]
    Connectivity {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Agent '{agent}' is not registered on {endpoint}")]
    AgentNotFound { agent: String, endpoint: String },

    #[error("Request to {endpoint} failed: {status} {body}")]
    Http {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error("Run of agent '{agent}' failed: {message}")]
    RunFailed { agent: String, message: String },

    #[error("Invalid response from {endpoint}")]
    InvalidResponse {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// True when the endpoint could not be reached at all, i.e. the server is likely not running
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ClientError::Connectivity { .. })
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Workflow '{0}' has no steps")]
    Empty(String),

    #[error("Step 1 ({0}) cannot take context: there is no previous step")]
    ChainedFirstStep(String),

    #[error("Agent discovery failed on {endpoint}")]
    Discovery {
        endpoint: String,
        #[source]
        source: ClientError,
    },

    #[error("Step {step} ({agent} on {endpoint}) failed")]
    Step {
        step: usize,
        agent: String,
        endpoint: String,
        #[source]
        source: ClientError,
    },
}

impl WorkflowError {
    /// The client error underneath a discovery or step failure
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            WorkflowError::Discovery { source, .. } | WorkflowError::Step { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    /// The endpoint a failure happened on, if it happened on the wire
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            WorkflowError::Discovery { endpoint, .. } | WorkflowError::Step { endpoint, .. } => {
                Some(endpoint)
            }
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Endpoint {env_var} is not a valid http(s) URL: '{value}'")]
    InvalidEndpoint { env_var: String, value: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a dotted settings key onto the environment variable that sets it
pub fn to_env_var(field: &str) -> String {
    format!("ACP_CHAIN_{}", field.to_uppercase().replace('.', "__"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("endpoints.hospital"), "ACP_CHAIN_ENDPOINTS__HOSPITAL");
        assert_eq!(to_env_var("client.timeout_secs"), "ACP_CHAIN_CLIENT__TIMEOUT_SECS");
    }

    #[test]
    fn test_step_error_names_endpoint() {
        let err = WorkflowError::Step {
            step: 1,
            agent: "health_agent".to_string(),
            endpoint: "http://localhost:8000".to_string(),
            source: ClientError::AgentNotFound {
                agent: "health_agent".to_string(),
                endpoint: "http://localhost:8000".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Step 1 (health_agent on http://localhost:8000) failed"
        );
        assert_eq!(err.endpoint(), Some("http://localhost:8000"));
        assert!(!err.client_error().unwrap().is_connectivity());
    }
}
