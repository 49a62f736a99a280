use acp_chain::models::agent::{AgentManifest, AgentsListResponse};
use acp_chain::models::message::Message;
use acp_chain::models::run::{AcpError, Run, RunCreateRequest, RunMode, RunStatus};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use warp::http::StatusCode;
use warp::Filter;

/// Which envelope layout replies use
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `output` list, the current run layout
    Output,
    /// `messages` list, as older servers answered
    Messages,
}

#[derive(Clone)]
pub struct StubState {
    agents: Arc<Vec<AgentManifest>>,
    shape: EnvelopeShape,
}

impl StubState {
    pub fn new(agent_names: &[String], shape: EnvelopeShape) -> Self {
        let agents = agent_names
            .iter()
            .map(|name| {
                AgentManifest::new(name).with_description(format!("Canned {} replies", name))
            })
            .collect();
        Self {
            agents: Arc::new(agents),
            shape,
        }
    }

    fn serves(&self, agent_name: &str) -> bool {
        self.agents.iter().any(|agent| agent.name == agent_name)
    }
}

pub fn routes(
    state: StubState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_state = warp::any().map(move || state.clone());

    let agents = warp::path!("agents")
        .and(warp::get())
        .and(with_state.clone())
        .map(list_agents);

    let runs = warp::path!("runs")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state)
        .map(create_run);

    agents.or(runs)
}

fn list_agents(state: StubState) -> warp::reply::Json {
    warp::reply::json(&AgentsListResponse {
        agents: state.agents.to_vec(),
    })
}

fn error_reply(
    status: StatusCode,
    code: &str,
    message: String,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&AcpError {
            code: code.to_string(),
            message,
        }),
        status,
    )
}

fn create_run(
    request: RunCreateRequest,
    state: StubState,
) -> warp::reply::WithStatus<warp::reply::Json> {
    if !state.serves(&request.agent_name) {
        return error_reply(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Agent {} not found", request.agent_name),
        );
    }
    if request.mode != RunMode::Sync {
        return error_reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_input",
            "Only synchronous runs are supported".to_string(),
        );
    }

    let input = request
        .input
        .first()
        .and_then(Message::first_text)
        .unwrap_or_default();
    info!(agent = %request.agent_name, "answering run");

    let reply = Message::agent(&request.agent_name)
        .with_text(format!("{}: {}", request.agent_name, input));
    let body = match state.shape {
        EnvelopeShape::Output => json!(Run {
            agent_name: request.agent_name,
            run_id: None,
            status: RunStatus::Completed,
            output: vec![reply],
            error: None,
        }),
        EnvelopeShape::Messages => json!({
            "agent_name": request.agent_name,
            "status": "completed",
            "messages": [reply],
        }),
    };
    warp::reply::with_status(warp::reply::json(&body), StatusCode::OK)
}
