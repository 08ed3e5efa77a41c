//! Command-line front end for the batch image downloader.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use sheet_image_fetcher::application::{ProgressEvent, progress_channel, run_from_share_url};
use sheet_image_fetcher::infrastructure::ConfigManager;
use sheet_image_fetcher::infrastructure::logging::init_logging;

/// Download every image referenced by a product spreadsheet and print the
/// replacement values for its `main_image` and `image_cache` columns.
#[derive(Parser, Debug)]
#[command(name = "sheet-image-fetcher", version, about)]
struct Cli {
    /// Shareable spreadsheet URL (the `/d/<id>` form)
    spreadsheet_url: String,

    /// Root directory for downloaded images
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Maximum concurrent downloads
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Remove the output root before downloading instead of reusing it
    #[arg(long)]
    fresh: bool,

    /// Configuration file path (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_config().await?;
    if let Some(output_dir) = cli.output_dir {
        config.output.output_dir = output_dir;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.batch.max_concurrent_downloads = max_concurrent;
    }

    init_logging(&config.logging)?;

    let output_dir = config.output.output_dir.clone();
    if output_dir.is_dir() {
        if cli.fresh {
            info!("Removing existing output directory {}", output_dir.display());
            tokio::fs::remove_dir_all(&output_dir)
                .await
                .with_context(|| {
                    format!("Failed to delete output directory {}", output_dir.display())
                })?;
        } else {
            warn!(
                "Output directory {} already exists; present files will be kept and skipped",
                output_dir.display()
            );
        }
    }

    let (progress_tx, mut progress_rx) = progress_channel();
    let listener = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            if let ProgressEvent::RowCompleted { completed, total } = event {
                info!("Processed {completed}/{total} rows");
            }
        }
    });

    let outcome = run_from_share_url(&cli.spreadsheet_url, &config, Some(progress_tx)).await?;
    listener.await.ok();

    println!("New main_image data:");
    println!("{}", outcome.main_image_block());
    println!();
    println!("New image_cache data:");
    println!("{}", outcome.image_cache_block());
    println!();
    println!("Download completed, {}", outcome.summary());

    Ok(())
}
