use acp_chain::workflow::{DiscoveredAgent, StepOutcome, WorkflowObserver, WorkflowResult};
use bat::PrettyPrinter;
use console::{style, Color};

/// Reply colors, one per step, reused when a workflow has more steps than colors
const STEP_COLORS: [Color; 4] = [Color::Magenta, Color::Yellow, Color::Blue, Color::Cyan];

/// Prints workflow progress as colored status lines on stdout
pub struct ConsoleObserver {
    render_markdown: bool,
}

impl ConsoleObserver {
    pub fn new(render_markdown: bool) -> Self {
        Self { render_markdown }
    }

    /// Print the combined report of a finished run. Single step runs have nothing to combine.
    pub fn report(&self, result: &WorkflowResult) {
        if result.steps.len() < 2 {
            return;
        }
        println!("{}", style("Final Combined Result:").green());
        if !self.render_markdown || !render(&result.report) {
            println!("{}", style(&result.report).green().bright());
        }
        println!();
    }
}

pub fn step_color(step: usize) -> Color {
    STEP_COLORS[step.saturating_sub(1) % STEP_COLORS.len()]
}

impl WorkflowObserver for ConsoleObserver {
    fn discovering(&self, endpoints: &[&str]) {
        println!(
            "{} {}",
            style("Discovering agents on").cyan(),
            style(endpoints.join(", ")).cyan().dim()
        );
    }

    fn discovered(&self, agents: &[DiscoveredAgent]) {
        let names: Vec<_> = agents.iter().map(|a| a.manifest.name.as_str()).collect();
        println!("{} {:?}", style("Found agents:").green(), names);
    }

    fn step_started(&self, step: usize, agent: &str, endpoint: &str, _input: &str) {
        println!(
            "{}",
            style(format!("Step {}: Consulting {} on {}...", step, agent, endpoint)).cyan()
        );
    }

    fn step_completed(&self, step: usize, outcome: &StepOutcome) {
        let heading = format!("{} Response:", outcome.label);
        if self.render_markdown {
            println!("{}", style(heading).fg(step_color(step)).bright());
            if !render(outcome.text()) {
                println!("{}", outcome.text());
            }
        } else {
            println!(
                "{}",
                style(format!("{} {}", heading, outcome.text()))
                    .fg(step_color(step))
                    .bright()
            );
        }
        println!();
    }
}

/// Render markdown through bat. Returns false when bat could not print, so the caller
/// can fall back to plain output.
pub fn render(content: &str) -> bool {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print()
        .is_ok()
}
