use acp_chain::{AgentClient, Settings};
use anyhow::{Context, Result};
use cliclack::{input, spinner};
use console::style;

use crate::observer::render;

/// Send a single input to one agent and print its reply
pub async fn execute(
    settings: &Settings,
    endpoint: Option<String>,
    agent: &str,
    message: Option<String>,
    render_markdown: bool,
) -> Result<()> {
    let endpoint = endpoint.unwrap_or_else(|| settings.endpoints.hospital.clone());
    let client = settings.client(&endpoint)?;

    let message = match message {
        Some(message) => message,
        None => input("Message:").placeholder("").multiline().interact()?,
    };

    let spin = spinner();
    spin.start(format!("awaiting reply from {}", agent));
    let output = client.run_sync(agent, &message).await;
    spin.stop("");

    let output = output.with_context(|| format!("Failed to run {} on {}", agent, endpoint))?;
    println!(
        "{}",
        style(format!("{} Response ({} envelope):", agent, output.shape())).magenta().bright()
    );
    if !render_markdown || !render(output.text()) {
        println!("{}", output.text());
    }
    Ok(())
}
