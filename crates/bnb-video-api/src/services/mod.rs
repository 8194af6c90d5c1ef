//! Business logic services.

pub mod orchestrator;
pub mod poller;
pub mod prompt;

pub use orchestrator::{VideoOrchestrator, DESCRIBE_INSTRUCTION};
pub use poller::{wait_for_completion, PollConfig, PolledOperation};
pub use prompt::synthesize;
