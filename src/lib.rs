//! Batch image downloader for spreadsheet-driven product feeds.
//!
//! Fetches a spreadsheet's CSV export, downloads every image referenced by
//! the `main_image` and `image_cache` columns to deterministic paths under an
//! output root, and reports the local replacement values for both columns.
//! Downloads are idempotent: files already on disk are never re-fetched.

pub mod application;
pub mod domain;
pub mod errors;
pub mod infrastructure;

pub use application::{ProgressEvent, progress_channel, run_from_share_url};
pub use domain::{BatchOutcome, csv_export_url};
pub use errors::{BatchError, BatchResult};
pub use infrastructure::{AppConfig, ConfigManager};
