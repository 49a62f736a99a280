//! Sequential context chaining between agents.
//!
//! A [`SequentialWorkflow`] runs its steps strictly in order. A chained step embeds the
//! text the previous step produced into its own input, so no two calls are ever in
//! flight at once. The first failure ends the run; later steps are never attempted.
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::client::base::AgentClient;
use crate::client::output::RunOutput;
use crate::errors::WorkflowError;
use crate::models::agent::AgentManifest;

/// How a step builds the text it sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPrompt {
    /// Send the question as is
    Question(String),
    /// Send the previous step's text as context followed by the question
    Chained { question: String },
}

/// The input of a chained step. Prior output is embedded verbatim, even when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainedContext<'a> {
    pub context: &'a str,
    pub question: &'a str,
}

impl<'a> ChainedContext<'a> {
    pub fn new(context: &'a str, question: &'a str) -> Self {
        Self { context, question }
    }
}

impl fmt::Display for ChainedContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context: {}\n\nQuestion: {}", self.context, self.question)
    }
}

/// One call to one agent
pub struct Step {
    label: String,
    agent: String,
    client: Arc<dyn AgentClient>,
    prompt: StepPrompt,
}

impl Step {
    /// A step that sends a fixed question
    pub fn ask<L, A, Q>(label: L, client: Arc<dyn AgentClient>, agent: A, question: Q) -> Self
    where
        L: Into<String>,
        A: Into<String>,
        Q: Into<String>,
    {
        Self {
            label: label.into(),
            agent: agent.into(),
            client,
            prompt: StepPrompt::Question(question.into()),
        }
    }

    /// A step that sends the previous step's text as context followed by a fixed question
    pub fn chained<L, A, Q>(label: L, client: Arc<dyn AgentClient>, agent: A, question: Q) -> Self
    where
        L: Into<String>,
        A: Into<String>,
        Q: Into<String>,
    {
        Self {
            label: label.into(),
            agent: agent.into(),
            client,
            prompt: StepPrompt::Chained {
                question: question.into(),
            },
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn prompt(&self) -> &StepPrompt {
        &self.prompt
    }

    fn input(&self, previous: Option<&str>) -> String {
        match &self.prompt {
            StepPrompt::Question(question) => question.clone(),
            StepPrompt::Chained { question } => {
                ChainedContext::new(previous.unwrap_or_default(), question).to_string()
            }
        }
    }
}

/// What one step sent and what it got back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub label: String,
    pub agent: String,
    pub endpoint: String,
    pub input: String,
    pub output: RunOutput,
}

impl StepOutcome {
    pub fn text(&self) -> &str {
        self.output.text()
    }
}

/// An agent found during the discovery prelude
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredAgent {
    pub endpoint: String,
    pub manifest: AgentManifest,
}

/// Progress of a run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    NotStarted,
    Discovered,
    StepDone(usize),
    Completed,
    Failed,
}

/// How the final report is laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTemplate {
    /// A heading line followed by `label: text` for every step
    Combined { heading: String },
    /// A banner, an upper-cased section per step, and a closing summary paragraph
    Sectioned { title: String, summary: String },
    /// Step texts only, separated by blank lines
    Plain,
}

impl ReportTemplate {
    pub fn combined<S: Into<String>>(heading: S) -> Self {
        ReportTemplate::Combined {
            heading: heading.into(),
        }
    }

    pub fn sectioned<T: Into<String>, S: Into<String>>(title: T, summary: S) -> Self {
        ReportTemplate::Sectioned {
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// Render the report. Pure: identical outcomes give byte-identical reports.
    pub fn render(&self, steps: &[StepOutcome]) -> String {
        match self {
            ReportTemplate::Combined { heading } => {
                let mut report = format!("{}\n\n", heading);
                for step in steps {
                    report.push_str(&format!("{}: {}\n\n", step.label, step.text()));
                }
                report
            }
            ReportTemplate::Sectioned { title, summary } => {
                let mut report = format!("=== {} ===\n\n", title.to_uppercase());
                for step in steps {
                    report.push_str(&format!(
                        "{}:\n{}\n\n",
                        step.label.to_uppercase(),
                        step.text()
                    ));
                }
                report.push_str(&format!("INTEGRATED SUMMARY:\n{}\n", summary));
                report
            }
            ReportTemplate::Plain => steps
                .iter()
                .map(StepOutcome::text)
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

/// Receives progress while a workflow runs. All methods default to doing nothing.
pub trait WorkflowObserver: Send + Sync {
    fn state_changed(&self, _state: WorkflowState) {}

    fn discovering(&self, _endpoints: &[&str]) {}

    fn discovered(&self, _agents: &[DiscoveredAgent]) {}

    fn step_started(&self, _step: usize, _agent: &str, _endpoint: &str, _input: &str) {}

    fn step_completed(&self, _step: usize, _outcome: &StepOutcome) {}
}

/// An observer that only writes to the log
pub struct TracingObserver;

impl WorkflowObserver for TracingObserver {
    fn state_changed(&self, state: WorkflowState) {
        debug!(?state, "workflow state");
    }

    fn discovered(&self, agents: &[DiscoveredAgent]) {
        let names: Vec<_> = agents.iter().map(|a| a.manifest.name.as_str()).collect();
        info!(?names, "discovered agents");
    }

    fn step_completed(&self, step: usize, outcome: &StepOutcome) {
        info!(
            step,
            agent = %outcome.agent,
            shape = outcome.output.shape(),
            "step completed"
        );
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub name: String,
    pub discovered: Vec<DiscoveredAgent>,
    pub steps: Vec<StepOutcome>,
    pub report: String,
}

pub struct SequentialWorkflow {
    name: String,
    discovery: Vec<Arc<dyn AgentClient>>,
    steps: Vec<Step>,
    report: ReportTemplate,
}

impl SequentialWorkflow {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            discovery: Vec::new(),
            steps: Vec::new(),
            report: ReportTemplate::Plain,
        }
    }

    /// List the agents on these endpoints, in this order, before the first step
    pub fn with_discovery(mut self, clients: Vec<Arc<dyn AgentClient>>) -> Self {
        self.discovery = clients;
        self
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_report(mut self, report: ReportTemplate) -> Self {
        self.report = report;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn validate(&self) -> Result<(), WorkflowError> {
        let first = self
            .steps
            .first()
            .ok_or_else(|| WorkflowError::Empty(self.name.clone()))?;
        if matches!(first.prompt, StepPrompt::Chained { .. }) {
            return Err(WorkflowError::ChainedFirstStep(first.agent.clone()));
        }
        Ok(())
    }

    pub async fn run(
        &self,
        observer: &dyn WorkflowObserver,
    ) -> Result<WorkflowResult, WorkflowError> {
        self.validate()?;
        observer.state_changed(WorkflowState::NotStarted);
        info!(workflow = %self.name, steps = self.steps.len(), "starting workflow");

        let result = self.run_steps(observer).await;
        match &result {
            Ok(_) => observer.state_changed(WorkflowState::Completed),
            Err(_) => observer.state_changed(WorkflowState::Failed),
        }
        result
    }

    async fn run_steps(
        &self,
        observer: &dyn WorkflowObserver,
    ) -> Result<WorkflowResult, WorkflowError> {
        let discovered = if self.discovery.is_empty() {
            Vec::new()
        } else {
            let agents = self.discover(observer).await?;
            observer.state_changed(WorkflowState::Discovered);
            agents
        };

        let mut outcomes: Vec<StepOutcome> = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;
            let input = step.input(outcomes.last().map(StepOutcome::text));
            let endpoint = step.endpoint().to_string();

            info!(
                workflow = %self.name,
                step = number,
                agent = %step.agent,
                %endpoint,
                "running step"
            );
            debug!(step = number, input = %input, "step input");
            observer.step_started(number, &step.agent, &endpoint, &input);

            let output = step
                .client
                .run_sync(&step.agent, &input)
                .await
                .map_err(|source| WorkflowError::Step {
                    step: number,
                    agent: step.agent.clone(),
                    endpoint: endpoint.clone(),
                    source,
                })?;

            let outcome = StepOutcome {
                label: step.label.clone(),
                agent: step.agent.clone(),
                endpoint,
                input,
                output,
            };
            observer.step_completed(number, &outcome);
            observer.state_changed(WorkflowState::StepDone(number));
            outcomes.push(outcome);
        }

        let report = self.report.render(&outcomes);
        Ok(WorkflowResult {
            name: self.name.clone(),
            discovered,
            steps: outcomes,
            report,
        })
    }

    async fn discover(
        &self,
        observer: &dyn WorkflowObserver,
    ) -> Result<Vec<DiscoveredAgent>, WorkflowError> {
        let mut seen = HashSet::new();
        let clients: Vec<_> = self
            .discovery
            .iter()
            .filter(|client| seen.insert(client.endpoint().to_string()))
            .collect();
        let endpoints: Vec<&str> = clients.iter().map(|client| client.endpoint()).collect();
        observer.discovering(&endpoints);

        let mut discovered = Vec::new();
        for client in clients {
            let agents = client
                .agents()
                .await
                .map_err(|source| WorkflowError::Discovery {
                    endpoint: client.endpoint().to_string(),
                    source,
                })?;
            discovered.extend(agents.into_iter().map(|manifest| DiscoveredAgent {
                endpoint: client.endpoint().to_string(),
                manifest,
            }));
        }
        observer.discovered(&discovered);
        Ok(discovered)
    }
}
