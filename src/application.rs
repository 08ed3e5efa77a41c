//! Application services: batch orchestration and progress reporting.

pub mod events;
pub mod orchestrator;
pub mod pipeline;

pub use events::{ProgressEvent, ProgressReceiver, ProgressSender, progress_channel};
pub use orchestrator::{BatchOrchestrator, OrchestratorConfig};
pub use pipeline::run_from_share_url;
