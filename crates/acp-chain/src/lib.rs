pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod presets;
pub mod workflow;

pub use client::acp::AcpClient;
pub use client::base::AgentClient;
pub use client::output::RunOutput;
pub use config::Settings;
pub use workflow::{SequentialWorkflow, Step, WorkflowObserver, WorkflowResult};
