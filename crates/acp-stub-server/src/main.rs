use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

mod routes;

use routes::{EnvelopeShape, StubState};

/// A local agent server with canned replies, for running the workflows without a model
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Agent to serve; repeat for several
    #[arg(
        short,
        long = "agent",
        default_values_t = ["health_agent".to_string(), "doctor_agent".to_string()]
    )]
    agents: Vec<String>,

    /// Envelope layout of run replies
    #[arg(long, value_enum, default_value = "output")]
    shape: EnvelopeShape,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Failed to parse socket address")?;

    println!(
        "Stub agent server running at http://{} serving {}",
        addr,
        args.agents.join(", ")
    );
    warp::serve(routes::routes(StubState::new(&args.agents, args.shape)))
        .run(addr)
        .await;
    Ok(())
}
