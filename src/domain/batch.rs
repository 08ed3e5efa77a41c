//! Batch task and outcome types.

use serde::Serialize;

/// One image download unit derived from a sheet row.
///
/// The slug keeps filenames unique within a brand/seo directory: `m<row>` for
/// the main image, `i<row>_j<k>` for the k-th cache image of that row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub source_url: String,
    pub brand_segment: String,
    pub seo_segment: String,
    pub slug: String,
}

impl ImageTask {
    pub fn main(row_index: usize, source_url: &str, brand: &str, seo: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            brand_segment: brand.to_string(),
            seo_segment: seo.to_string(),
            slug: format!("m{row_index}"),
        }
    }

    pub fn cache(row_index: usize, sub_index: usize, source_url: &str, brand: &str, seo: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            brand_segment: brand.to_string(),
            seo_segment: seo.to_string(),
            slug: format!("i{row_index}_j{sub_index}"),
        }
    }
}

/// A stored image file, as reported back to the output columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Destination path in forward-slash form regardless of host separator.
    pub relative_path: String,
    /// True when the destination already existed and no request was made.
    pub already_present: bool,
}

/// Split an `image_cache` field into candidate URLs.
///
/// `|` wins when present, `,` otherwise; a field containing neither is a
/// single candidate. Candidates are trimmed and empty ones dropped. The two
/// delimiters are a deliberate closed set.
pub fn split_image_cache_field(raw: &str) -> Vec<&str> {
    let candidates: Vec<&str> = if raw.contains('|') {
        raw.split('|').collect()
    } else if raw.contains(',') {
        raw.split(',').collect()
    } else {
        vec![raw]
    };

    candidates
        .into_iter()
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .collect()
}

/// Aggregated result of one batch run.
///
/// Both columns carry one entry per input row, in row order. Owned exclusively
/// by the orchestrator's aggregation loop while the batch runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Replacement `main_image` value per row (empty when none succeeded).
    pub main_image_column: Vec<String>,
    /// Replacement `image_cache` value per row: `|`-joined successful paths.
    pub image_cache_column: Vec<String>,
    /// Download tasks attempted.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn main_image_block(&self) -> String {
        self.main_image_column.join("\n")
    }

    pub fn image_cache_block(&self) -> String {
        self.image_cache_column.join("\n")
    }

    pub fn summary(&self) -> String {
        format!(
            "{}/{} images downloaded, {} failed",
            self.succeeded, self.total, self.failed
        )
    }
}
