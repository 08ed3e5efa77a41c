//! Image download and storage with idempotent skip semantics.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::batch::{ImageTask, StoredImage};
use crate::errors::{BatchError, BatchResult};
use crate::infrastructure::http_client::HttpClient;

/// Fallback extension when the source URL carries none usable.
const FALLBACK_EXTENSION: &str = ".jpg";

/// Longest extension (dot included) accepted from a source URL.
const MAX_EXTENSION_LEN: usize = 5;

/// Destination for fetched images.
///
/// Seam between the orchestrator and the network/filesystem so batch logic
/// can be exercised without either.
#[async_trait]
pub trait ImageSink: Send + Sync {
    async fn fetch_and_store(&self, task: &ImageTask) -> BatchResult<StoredImage>;
}

/// Downloads images over HTTP and persists them under the output root.
pub struct ImageStore {
    client: HttpClient,
    output_dir: PathBuf,
}

impl ImageStore {
    pub fn new(client: HttpClient, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    /// Destination path for a task:
    /// `<output_dir>/<brand_segment>/<seo_segment>_<slug><ext>`.
    pub fn destination(&self, task: &ImageTask) -> PathBuf {
        let filename = format!(
            "{}_{}{}",
            task.seo_segment,
            task.slug,
            url_extension(&task.source_url)
        );
        self.output_dir.join(&task.brand_segment).join(filename)
    }
}

#[async_trait]
impl ImageSink for ImageStore {
    /// Download one image to its deterministic destination.
    ///
    /// If the destination file already exists the task succeeds immediately
    /// without any network access, which makes repeated runs over the same
    /// dataset cheap. A Content-Length disagreement with the written byte
    /// count is reported as a failure; the file is left on disk (see the
    /// retry-semantics note in DESIGN.md).
    async fn fetch_and_store(&self, task: &ImageTask) -> BatchResult<StoredImage> {
        let destination = self.destination(task);
        let relative_path = to_forward_slash(&destination);

        let brand_dir = destination
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        fs::create_dir_all(&brand_dir)
            .await
            .map_err(|e| BatchError::storage(&brand_dir, e))?;

        match fs::try_exists(&destination).await {
            Ok(true) => {
                debug!("File already exists, skipping download: {relative_path}");
                return Ok(StoredImage {
                    relative_path,
                    already_present: true,
                });
            }
            Ok(false) => {}
            Err(e) => return Err(BatchError::storage(&destination, e)),
        }

        let response = self.client.get(&task.source_url).await?;
        let declared_length = response.content_length();

        let mut file = fs::File::create(&destination)
            .await
            .map_err(|e| BatchError::storage(&destination, e))?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| BatchError::request(&task.source_url, e))?;
            written += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|e| BatchError::storage(&destination, e))?;
        }
        file.flush()
            .await
            .map_err(|e| BatchError::storage(&destination, e))?;

        if let Some(expected) = declared_length {
            if expected > 0 && written != expected {
                warn!(
                    "Size mismatch for {relative_path}: expected {expected} bytes, wrote {written}; file left in place"
                );
                return Err(BatchError::SizeMismatch {
                    path: relative_path,
                    expected,
                    actual: written,
                });
            }
        }

        debug!("Downloaded image: {relative_path} ({written} bytes)");
        Ok(StoredImage {
            relative_path,
            already_present: false,
        })
    }
}

/// File extension of a source URL, dot included.
///
/// Taken from the last path component; anything after the final dot counts,
/// query string included, so `photo.png?v=2` falls back just like a URL with
/// no extension. Empty or longer than five characters falls back to `.jpg`.
fn url_extension(source_url: &str) -> String {
    let tail = source_url.rsplit('/').next().unwrap_or(source_url);
    match tail.rfind('.') {
        Some(pos) if tail.len() - pos <= MAX_EXTENSION_LEN => tail[pos..].to_string(),
        _ => FALLBACK_EXTENSION.to_string(),
    }
}

/// Render a path with `/` separators regardless of the host convention, so
/// the output columns are identical across platforms.
fn to_forward_slash(path: &Path) -> String {
    let rendered = path.display().to_string();
    if std::path::MAIN_SEPARATOR == '/' {
        rendered
    } else {
        rendered.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
