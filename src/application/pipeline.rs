//! End-to-end pipeline wiring.
//!
//! The single operation any front end needs: share URL in, batch outcome out.

use std::sync::Arc;

use anyhow::Result;

use crate::application::events::ProgressSender;
use crate::application::orchestrator::{BatchOrchestrator, OrchestratorConfig};
use crate::domain::batch::BatchOutcome;
use crate::domain::export_url::csv_export_url;
use crate::domain::table::ColumnSet;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv_fetch;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::image_store::ImageStore;

/// Run the whole batch for a shareable spreadsheet URL.
///
/// Table-level failures (invalid reference, CSV fetch or parse, schema)
/// abort before any image is requested. Per-image failures are folded into
/// the returned outcome.
pub async fn run_from_share_url(
    share_url: &str,
    config: &AppConfig,
    progress: Option<ProgressSender>,
) -> Result<BatchOutcome> {
    let export_url = csv_export_url(share_url)?;
    let client = HttpClient::new(&config.http)?;

    let table = csv_fetch::fetch_table(&client, &export_url).await?;
    let columns = ColumnSet::resolve(&table)?;

    let store = Arc::new(ImageStore::new(
        client,
        config.output.output_dir.clone(),
    ));
    let mut orchestrator =
        BatchOrchestrator::new(store, OrchestratorConfig::from_app_config(config));
    if let Some(sender) = progress {
        orchestrator = orchestrator.with_progress(sender);
    }

    Ok(orchestrator.run(table.data_rows(), &columns).await)
}
