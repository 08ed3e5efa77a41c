//! Domain model for the spreadsheet image batch.

pub mod batch;
pub mod export_url;
pub mod table;

pub use batch::{BatchOutcome, ImageTask, StoredImage, split_image_cache_field};
pub use export_url::csv_export_url;
pub use table::{ColumnSet, CsvTable};
