use config::{Config, Environment};
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::client::acp::AcpClient;
use crate::client::base::AgentClient;
use crate::errors::{to_env_var, ClientResult, ConfigError};

pub const DEFAULT_HOSPITAL: &str = "http://localhost:8000";
pub const DEFAULT_INSURER: &str = "http://localhost:8001";
pub const DEFAULT_LANGGRAPH_HOSPITAL: &str = "http://localhost:8002";

/// Where each agent server listens
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointSettings {
    pub hospital: String,
    pub insurer: String,
    pub langgraph_hospital: String,
}

impl EndpointSettings {
    fn named(&self) -> [(&'static str, &str); 3] {
        [
            ("endpoints.hospital", &self.hospital),
            ("endpoints.insurer", &self.insurer),
            ("endpoints.langgraph_hospital", &self.langgraph_hospital),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSettings {
    /// Per-request timeout. Unset means the transport default, which never times out.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Credential for the language-model provider behind the remote agents
#[derive(Clone, Default, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Process-wide settings, loaded once at startup and never mutated afterwards
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub endpoints: EndpointSettings,
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("endpoints.hospital", DEFAULT_HOSPITAL)?
            .set_default("endpoints.insurer", DEFAULT_INSURER)?
            .set_default("endpoints.langgraph_hospital", DEFAULT_LANGGRAPH_HOSPITAL)?
            .add_source(
                Environment::with_prefix("ACP_CHAIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // the agents' own credential keeps its conventional name
            .set_override_option("provider.api_key", env::var("OPENAI_API_KEY").ok())?
            .build()?;

        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in self.endpoints.named() {
            let valid = Url::parse(value)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !valid {
                return Err(ConfigError::InvalidEndpoint {
                    env_var: to_env_var(key),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.client.timeout_secs.map(Duration::from_secs)
    }

    pub fn has_credential(&self) -> bool {
        self.provider
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Open a client for `endpoint` using the configured transport settings
    pub fn client(&self, endpoint: &str) -> ClientResult<Arc<dyn AgentClient>> {
        Ok(Arc::new(AcpClient::new(endpoint, self.timeout())?))
    }
}
