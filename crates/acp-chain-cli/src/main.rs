use acp_chain::errors::{ClientError, WorkflowError};
use acp_chain::{presets, Settings};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

mod commands;
mod observer;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level, including every run envelope (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Render agent replies as markdown
    #[arg(long, global = true)]
    render: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask the LangGraph health agent, then the insurer with that answer as context (default)
    #[command(name = "health-insurance")]
    HealthInsurance,

    /// Discover agents, then run the detailed shoulder surgery consultation
    #[command(name = "consultation")]
    Consultation,

    /// Ask the hospital's doctor agent for cardiologists in Atlanta
    #[command(name = "doctor-finder")]
    DoctorFinder,

    /// Check both agents of the LangGraph hospital server
    #[command(name = "langgraph-check")]
    LanggraphCheck,

    /// List the agents on every configured endpoint
    #[command(name = "discover")]
    Discover,

    /// Send one input to one agent
    #[command(name = "ask")]
    Ask {
        /// Endpoint hosting the agent (defaults to the hospital endpoint)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Name of the agent to run
        #[arg(short, long)]
        agent: String,

        /// Input text; prompted for when omitted
        input: Option<String>,
    },

    /// Print the version
    #[command(name = "version")]
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let env_file = dotenv().ok();
    init_tracing(cli.verbose);
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {:?}", path);
    }

    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(err) => {
            let err = anyhow::Error::new(err).context("Failed to load settings");
            report_failure(&err, None);
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli, &settings).await {
        report_failure(&err, Some(&settings));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, settings: &Settings) -> Result<()> {
    let command = cli.command.unwrap_or(Command::HealthInsurance);

    if matches!(
        command,
        Command::HealthInsurance
            | Command::Consultation
            | Command::DoctorFinder
            | Command::LanggraphCheck
    ) && !settings.has_credential()
    {
        tracing::warn!("OPENAI_API_KEY is not set; the remote agents may be unable to answer");
    }

    match command {
        Command::HealthInsurance => {
            let workflow = presets::health_insurance(settings)?;
            commands::workflow::execute(vec![workflow], cli.render).await
        }
        Command::Consultation => {
            let workflow = presets::consultation(settings)?;
            commands::workflow::execute(vec![workflow], cli.render).await
        }
        Command::DoctorFinder => {
            let workflow = presets::doctor_finder(settings)?;
            commands::workflow::execute(vec![workflow], cli.render).await
        }
        Command::LanggraphCheck => {
            let workflows = presets::langgraph_check(settings)?;
            commands::workflow::execute(workflows, cli.render).await
        }
        Command::Discover => commands::discover::execute(settings).await,
        Command::Ask {
            endpoint,
            agent,
            input,
        } => commands::ask::execute(settings, endpoint, &agent, input, cli.render)
            .await
            .context("Ask failed"),
        Command::Version => commands::version::execute().await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The endpoint behind a connectivity failure anywhere in the cause chain
fn unreachable_endpoint(err: &anyhow::Error) -> Option<&str> {
    err.chain().find_map(|cause| {
        if let Some(workflow_error) = cause.downcast_ref::<WorkflowError>() {
            return workflow_error
                .client_error()
                .filter(|c| c.is_connectivity())
                .and(workflow_error.endpoint());
        }
        match cause.downcast_ref::<ClientError>() {
            Some(ClientError::Connectivity { endpoint, .. }) => Some(endpoint.as_str()),
            _ => None,
        }
    })
}

/// Print a failure with its full cause chain and a hint for the usual culprits
fn report_failure(err: &anyhow::Error, settings: Option<&Settings>) {
    eprintln!("{}", style(format!("Error occurred: {}", err)).red());
    for cause in err.chain().skip(1) {
        eprintln!("{}", style(format!("  caused by: {}", cause)).red());
    }

    if let (Some(endpoint), Some(settings)) = (unreachable_endpoint(err), settings) {
        eprintln!(
            "{}",
            style(format!(
                "Could not reach {}. Make sure the agent servers are running:",
                endpoint
            ))
            .red()
        );
        let servers = [
            ("Hospital server", &settings.endpoints.hospital),
            ("Insurance server", &settings.endpoints.insurer),
            ("LangGraph hospital server", &settings.endpoints.langgraph_hospital),
        ];
        for (name, endpoint) in servers {
            eprintln!("{}", style(format!("  - {} on {}", name, endpoint)).red());
        }
    }

    tracing::debug!("{:?}", err);
}
