//! Tabular data model and column validation.

use std::collections::HashMap;

use crate::errors::{BatchError, BatchResult};

/// Required columns, in the order they are validated.
const REQUIRED_COLUMNS: [&str; 3] = ["main_image", "image_cache", "brand_seo_url"];

/// A parsed CSV table. Row 0 is the header row; rows 1..N are data rows
/// aligned to header order.
#[derive(Debug, Clone)]
pub struct CsvTable {
    records: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(records: Vec<Vec<String>>) -> Self {
        Self { records }
    }

    /// Header-name to column-index map. A duplicated header name resolves to
    /// its last occurrence.
    pub fn header_map(&self) -> HashMap<&str, usize> {
        let mut map = HashMap::new();
        if let Some(header) = self.records.first() {
            for (index, name) in header.iter().enumerate() {
                map.insert(name.as_str(), index);
            }
        }
        map
    }

    /// Data rows (everything below the header). Empty when the table has no
    /// header or no data.
    pub fn data_rows(&self) -> &[Vec<String>] {
        if self.records.len() < 2 {
            &[]
        } else {
            &self.records[1..]
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Resolved indices for the columns the batch reads. Constructed once per
/// table, immutable afterward.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSet {
    pub main_image: usize,
    pub image_cache: usize,
    pub brand_seo_url: usize,
    pub seo_url: usize,
}

impl ColumnSet {
    /// Validate the table and resolve column indices.
    ///
    /// Fails when the table has fewer than two rows or any required column is
    /// absent. The SEO column accepts `seo_url` or `seo_url_uk`, preferring
    /// the former.
    pub fn resolve(table: &CsvTable) -> BatchResult<Self> {
        if table.record_count() < 2 {
            return Err(BatchError::NoData);
        }

        let headers = table.header_map();
        for column in REQUIRED_COLUMNS {
            if !headers.contains_key(column) {
                return Err(BatchError::MissingColumn(column.to_string()));
            }
        }

        let seo_url = headers
            .get("seo_url")
            .or_else(|| headers.get("seo_url_uk"))
            .copied()
            .ok_or_else(|| BatchError::MissingColumn("seo_url or seo_url_uk".to_string()))?;

        Ok(Self {
            main_image: headers["main_image"],
            image_cache: headers["image_cache"],
            brand_seo_url: headers["brand_seo_url"],
            seo_url,
        })
    }
}

/// Field accessor tolerant of rows shorter than the header.
pub fn field(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}
