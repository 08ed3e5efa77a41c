//! Batch orchestration.
//!
//! Fans image downloads out across rows and folds the results back into the
//! two output columns. Downloads run concurrently under a semaphore; all
//! aggregation happens in a single drain loop that alone owns the outcome,
//! so no partially-committed update is ever observable.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::application::events::{ProgressEvent, ProgressSender};
use crate::domain::batch::{BatchOutcome, ImageTask, split_image_cache_field};
use crate::domain::table::{ColumnSet, field};
use crate::infrastructure::config::{AppConfig, defaults};
use crate::infrastructure::image_store::ImageSink;

/// Orchestrator settings.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum image downloads in flight at once.
    pub max_concurrent_downloads: usize,
}

impl OrchestratorConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_concurrent_downloads: config.batch.max_concurrent_downloads.max(1),
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: defaults::MAX_CONCURRENT_DOWNLOADS,
        }
    }
}

/// Which output slot a task result lands in.
#[derive(Debug, Clone, Copy)]
enum TaskKind {
    Main,
    Cache(usize),
}

/// Per-row result slots, preallocated so parallel completions land in order.
#[derive(Default)]
struct RowSlots {
    main: Option<String>,
    cache: Vec<Option<String>>,
    pending: usize,
}

/// Runs one batch over validated data rows.
pub struct BatchOrchestrator {
    sink: Arc<dyn ImageSink>,
    config: OrchestratorConfig,
    progress: Option<ProgressSender>,
}

impl BatchOrchestrator {
    pub fn new(sink: Arc<dyn ImageSink>, config: OrchestratorConfig) -> Self {
        Self {
            sink,
            config,
            progress: None,
        }
    }

    /// Attach a progress channel.
    pub fn with_progress(mut self, sender: ProgressSender) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Process every data row and return the aggregated outcome.
    ///
    /// Row `i`'s results occupy position `i` of both output columns whatever
    /// order the downloads finish in. Individual download failures are logged
    /// and counted; they never abort the batch.
    pub async fn run(&self, rows: &[Vec<String>], columns: &ColumnSet) -> BatchOutcome {
        let total_rows = rows.len();
        let mut slots: Vec<RowSlots> = Vec::with_capacity(total_rows);
        let mut planned: Vec<(usize, TaskKind, ImageTask)> = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            let brand = field(row, columns.brand_seo_url);
            let seo = field(row, columns.seo_url);
            let mut row_slots = RowSlots::default();

            let main_url = field(row, columns.main_image);
            if !main_url.is_empty() {
                planned.push((
                    row_index,
                    TaskKind::Main,
                    ImageTask::main(row_index, main_url, brand, seo),
                ));
                row_slots.pending += 1;
            }

            let cache_field = field(row, columns.image_cache);
            if !cache_field.is_empty() {
                let candidates = split_image_cache_field(cache_field);
                row_slots.cache = vec![None; candidates.len()];
                for (sub_index, url) in candidates.into_iter().enumerate() {
                    planned.push((
                        row_index,
                        TaskKind::Cache(sub_index),
                        ImageTask::cache(row_index, sub_index, url, brand, seo),
                    ));
                    row_slots.pending += 1;
                }
            }

            slots.push(row_slots);
        }

        let mut outcome = BatchOutcome {
            total: planned.len(),
            ..BatchOutcome::default()
        };

        info!(
            "Starting batch: {} download tasks across {} rows",
            outcome.total, total_rows
        );

        // rows with nothing to download are complete before any I/O happens
        let mut completed_rows = 0;
        for row_slots in &slots {
            if row_slots.pending == 0 {
                completed_rows += 1;
                self.emit(ProgressEvent::RowCompleted {
                    completed: completed_rows,
                    total: total_rows,
                });
            }
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_downloads));
        let mut in_flight: FuturesUnordered<_> = planned
            .into_iter()
            .map(|(row_index, kind, task)| {
                let sink = Arc::clone(&self.sink);
                let semaphore = Arc::clone(&semaphore);
                async move {
                    let _permit = semaphore
                        .acquire()
                        .await
                        .expect("download semaphore is never closed");
                    let result = sink.fetch_and_store(&task).await;
                    (row_index, kind, task, result)
                }
            })
            .collect();

        while let Some((row_index, kind, task, result)) = in_flight.next().await {
            let succeeded = result.is_ok();
            match result {
                Ok(stored) => {
                    outcome.succeeded += 1;
                    match kind {
                        TaskKind::Main => slots[row_index].main = Some(stored.relative_path),
                        TaskKind::Cache(sub_index) => {
                            slots[row_index].cache[sub_index] = Some(stored.relative_path);
                        }
                    }
                }
                Err(error) => {
                    outcome.failed += 1;
                    // +2: spreadsheet row numbering counts the header row
                    let column = match kind {
                        TaskKind::Main => "main_image",
                        TaskKind::Cache(_) => "image_cache",
                    };
                    warn!(
                        "Error downloading {column} for row {}: {error}",
                        row_index + 2
                    );
                }
            }

            self.emit(ProgressEvent::TaskFinished {
                row_index,
                slug: task.slug,
                succeeded,
            });

            slots[row_index].pending -= 1;
            if slots[row_index].pending == 0 {
                completed_rows += 1;
                self.emit(ProgressEvent::RowCompleted {
                    completed: completed_rows,
                    total: total_rows,
                });
            }
        }

        for row_slots in slots {
            outcome
                .main_image_column
                .push(row_slots.main.unwrap_or_default());
            let cache_paths: Vec<String> = row_slots.cache.into_iter().flatten().collect();
            outcome.image_cache_column.push(cache_paths.join("|"));
        }

        info!("Batch complete: {}", outcome.summary());
        outcome
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(sender) = &self.progress {
            let _ = sender.send(event);
        }
    }
}
