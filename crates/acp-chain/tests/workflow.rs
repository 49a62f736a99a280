use acp_chain::errors::{ClientError, WorkflowError};
use acp_chain::workflow::{ReportTemplate, TracingObserver};
use acp_chain::{AcpClient, AgentClient, RunOutput, SequentialWorkflow, Step};
use anyhow::Result;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEALTH_TEXT: &str = "Yes, physical therapy is typically recommended.";
const POLICY_TEXT: &str = "Rehabilitation has a two month waiting period.";
const FOLLOW_UP: &str = "What is the waiting period for rehabilitation?";

/// An agent server that answers one agent with a fixed envelope
async fn agent_server(agent: &str, envelope: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs"))
        .and(body_partial_json(json!({"agent_name": agent, "mode": "sync"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agents": [{"name": agent}]
        })))
        .mount(&server)
        .await;
    server
}

fn completed(agent: &str, text: &str) -> Value {
    json!({
        "agent_name": agent,
        "run_id": "3f1e8f3c-0000-4000-8000-000000000000",
        "status": "completed",
        "output": [{
            "role": format!("agent/{}", agent),
            "parts": [{"content_type": "text/plain", "content": text}]
        }]
    })
}

fn client(uri: &str) -> Result<Arc<dyn AgentClient>> {
    Ok(Arc::new(AcpClient::new(uri, None)?))
}

fn workflow(hospital: &str, insurer: &str) -> Result<SequentialWorkflow> {
    Ok(SequentialWorkflow::new("health-insurance")
        .with_step(Step::ask(
            "Health Information",
            client(hospital)?,
            "health_agent",
            "Do I need rehabilitation after a shoulder reconstruction?",
        ))
        .with_step(Step::chained(
            "Insurance Information",
            client(insurer)?,
            "policy_agent",
            FOLLOW_UP,
        ))
        .with_report(ReportTemplate::combined("Based on the consultation:")))
}

fn unused_endpoint() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(format!("http://127.0.0.1:{}", port))
}

#[tokio::test]
async fn test_two_endpoint_chain() -> Result<()> {
    let hospital = agent_server("health_agent", completed("health_agent", HEALTH_TEXT)).await;
    let insurer = agent_server("policy_agent", completed("policy_agent", POLICY_TEXT)).await;

    let result = workflow(&hospital.uri(), &insurer.uri())?
        .run(&TracingObserver)
        .await?;

    let requests = insurer.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body)?;
    let sent = body["input"][0]["parts"][0]["content"].as_str().unwrap_or_default();
    assert_eq!(sent, format!("Context: {}\n\nQuestion: {}", HEALTH_TEXT, FOLLOW_UP));

    assert!(result.report.contains(HEALTH_TEXT));
    assert!(result.report.contains(POLICY_TEXT));
    Ok(())
}

#[tokio::test]
async fn test_identical_replies_give_identical_reports() -> Result<()> {
    let hospital = agent_server("health_agent", completed("health_agent", HEALTH_TEXT)).await;
    let insurer = agent_server("policy_agent", completed("policy_agent", POLICY_TEXT)).await;

    let first = workflow(&hospital.uri(), &insurer.uri())?
        .run(&TracingObserver)
        .await?;
    let second = workflow(&hospital.uri(), &insurer.uri())?
        .run(&TracingObserver)
        .await?;

    assert_eq!(first.report.as_bytes(), second.report.as_bytes());
    Ok(())
}

#[tokio::test]
async fn test_messages_envelope_is_chained() -> Result<()> {
    let hospital = agent_server(
        "health_agent",
        json!({"messages": [{"role": "agent", "parts": [{"content": HEALTH_TEXT}]}]}),
    )
    .await;
    let insurer = agent_server("policy_agent", json!({"unexpected": true})).await;

    let result = workflow(&hospital.uri(), &insurer.uri())?
        .run(&TracingObserver)
        .await?;

    assert_eq!(
        result.steps[0].output,
        RunOutput::Messages(HEALTH_TEXT.to_string())
    );
    assert!(result.steps[1].input.contains(HEALTH_TEXT));
    assert_eq!(result.steps[1].text(), r#"{"unexpected":true}"#);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_first_endpoint_stops_chain() -> Result<()> {
    let hospital = unused_endpoint()?;
    let insurer = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/runs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completed("policy_agent", POLICY_TEXT)),
        )
        .expect(0)
        .mount(&insurer)
        .await;

    let err = workflow(&hospital, &insurer.uri())?
        .run(&TracingObserver)
        .await
        .unwrap_err();

    assert_eq!(err.endpoint(), Some(hospital.as_str()));
    assert!(err.to_string().contains(&hospital));
    assert!(matches!(
        err,
        WorkflowError::Step {
            step: 1,
            source: ClientError::Connectivity { .. },
            ..
        }
    ));
    Ok(())
}

#[tokio::test]
async fn test_discovery_failure_aborts_before_any_run() -> Result<()> {
    let hospital = agent_server("health_agent", completed("health_agent", HEALTH_TEXT)).await;
    let insurer = unused_endpoint()?;

    let err = workflow(&hospital.uri(), &insurer)?
        .with_discovery(vec![client(&insurer)?, client(&hospital.uri())?])
        .run(&TracingObserver)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Discovery { .. }));
    assert_eq!(err.endpoint(), Some(insurer.as_str()));
    let runs = hospital
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == "/runs")
        .count();
    assert_eq!(runs, 0);
    Ok(())
}
