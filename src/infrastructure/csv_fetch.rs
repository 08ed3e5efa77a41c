//! CSV retrieval and parsing.

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::domain::table::CsvTable;
use crate::errors::BatchResult;
use crate::infrastructure::http_client::HttpClient;

/// Fetch the export URL and parse the body into a table.
///
/// A non-2xx status or transport error is a hard failure, as is any CSV the
/// parser rejects. Nothing is recovered here.
pub async fn fetch_table(client: &HttpClient, export_url: &str) -> BatchResult<CsvTable> {
    info!("Fetching CSV data from {export_url}");
    let body = client.get_text(export_url).await?;
    parse_table(&body)
}

/// Parse CSV text into a table.
///
/// RFC 4180 quoting rules apply (quoted fields may contain commas and
/// newlines, embedded quotes doubled). Records with inconsistent field counts
/// are rejected.
pub fn parse_table(body: &str) -> BatchResult<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }

    debug!("Parsed {} CSV records", records.len());
    Ok(CsvTable::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_fields() {
        let body = "name,urls\nwidget,\"a.jpg,b.jpg\"\n";
        let table = parse_table(body).unwrap();
        assert_eq!(table.record_count(), 2);
        assert_eq!(table.data_rows()[0][1], "a.jpg,b.jpg");
    }

    #[test]
    fn parses_embedded_newlines_and_doubled_quotes() {
        let body = "name,note\nwidget,\"line one\nline \"\"two\"\"\"\n";
        let table = parse_table(body).unwrap();
        assert_eq!(table.data_rows()[0][1], "line one\nline \"two\"");
    }

    #[test]
    fn rejects_inconsistent_record_lengths() {
        let body = "a,b,c\n1,2\n";
        assert!(parse_table(body).is_err());
    }

    #[test]
    fn rejects_unterminated_quote() {
        let body = "a,b\n\"unterminated,2\n";
        assert!(parse_table(body).is_err());
    }

    #[test]
    fn empty_body_yields_empty_table() {
        let table = parse_table("").unwrap();
        assert_eq!(table.record_count(), 0);
    }
}
