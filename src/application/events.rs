//! Progress events emitted while a batch runs.
//!
//! Front ends subscribe through an unbounded channel; the orchestrator never
//! blocks on a slow or absent consumer.

use serde::Serialize;
use tokio::sync::mpsc;

/// Progress notifications for front ends.
#[derive(Debug, Clone, Serialize)]
pub enum ProgressEvent {
    /// One download task finished, successfully or not.
    TaskFinished {
        row_index: usize,
        slug: String,
        succeeded: bool,
    },

    /// All tasks of another row have finished. `completed` is monotonic and
    /// reaches `total` exactly when the batch is done.
    RowCompleted { completed: usize, total: usize },
}

pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Create a progress channel pair.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}
