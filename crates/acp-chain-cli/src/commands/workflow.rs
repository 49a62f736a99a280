use acp_chain::SequentialWorkflow;
use anyhow::Result;
use console::style;

use crate::observer::ConsoleObserver;

/// Run workflows one after another, stopping at the first failure
pub async fn execute(workflows: Vec<SequentialWorkflow>, render_markdown: bool) -> Result<()> {
    let observer = ConsoleObserver::new(render_markdown);

    for workflow in workflows {
        println!(
            "{}\n",
            style(format!("=== Sequential Agent Workflow: {} ===", workflow.name())).green()
        );
        let result = workflow.run(&observer).await?;
        observer.report(&result);
    }

    println!(
        "{}",
        style("=== All workflows completed successfully! ===").green()
    );
    Ok(())
}
