use acp_chain::errors::ClientError;
use acp_chain::{AgentClient, Settings};
use anyhow::{anyhow, Result};
use console::style;

/// List the agents registered on every configured endpoint
pub async fn execute(settings: &Settings) -> Result<()> {
    let endpoints = [
        ("hospital", &settings.endpoints.hospital),
        ("insurer", &settings.endpoints.insurer),
        ("langgraph hospital", &settings.endpoints.langgraph_hospital),
    ];

    let mut failed: Vec<String> = Vec::new();
    let mut error: Option<ClientError> = None;
    for (name, endpoint) in endpoints {
        let client = settings.client(endpoint)?;
        match client.agents().await {
            Ok(agents) => {
                println!(
                    "{} {}",
                    style(format!("{} ({}):", name, client.endpoint())).green(),
                    style(format!("{} agent(s)", agents.len())).dim()
                );
                for agent in agents {
                    match agent.description {
                        Some(description) => {
                            println!("  - {}: {}", style(agent.name).bold(), description)
                        }
                        None => println!("  - {}", style(agent.name).bold()),
                    }
                }
            }
            Err(err) => {
                println!(
                    "{} {}",
                    style(format!("{} ({}):", name, client.endpoint())).red(),
                    style(&err).red()
                );
                failed.push(client.endpoint().to_string());
                // keep a connectivity failure when there is one
                if error.as_ref().map_or(true, |e| !e.is_connectivity()) {
                    error = Some(err);
                }
            }
        }
    }

    match error {
        Some(err) => {
            Err(anyhow!(err).context(format!("Discovery failed on {}", failed.join(", "))))
        }
        None => Ok(()),
    }
}
