//! Spreadsheet share-URL to CSV export-URL resolution.

use url::Url;

use crate::errors::{BatchError, BatchResult};

/// Derive the CSV export URL from a shareable spreadsheet URL.
///
/// The spreadsheet id is the path segment following the literal `d` segment.
/// The sheet selector (`gid`) is resolved in order of preference: the `gid`
/// query parameter, a `gid=<value>` fragment, then `"0"`.
///
/// Pure function, no I/O.
pub fn csv_export_url(spreadsheet_url: &str) -> BatchResult<String> {
    let parsed = Url::parse(spreadsheet_url).map_err(|_| BatchError::InvalidSpreadsheetUrl {
        url: spreadsheet_url.to_string(),
    })?;

    let mut segments = parsed.path().split('/');
    let mut spreadsheet_id = None;
    while let Some(segment) = segments.next() {
        if segment == "d" {
            spreadsheet_id = segments.next().filter(|id| !id.is_empty());
            break;
        }
    }
    let spreadsheet_id = spreadsheet_id.ok_or_else(|| BatchError::InvalidSpreadsheetUrl {
        url: spreadsheet_url.to_string(),
    })?;

    let gid = resolve_gid(&parsed);
    Ok(format!(
        "https://docs.google.com/spreadsheets/d/{spreadsheet_id}/export?format=csv&gid={gid}"
    ))
}

/// Sheet selector precedence: query parameter, then an exact `gid=<value>`
/// fragment, then `"0"`.
fn resolve_gid(url: &Url) -> String {
    if let Some((_, value)) = url.query_pairs().find(|(key, _)| key == "gid") {
        if !value.is_empty() {
            return value.into_owned();
        }
    }

    if let Some(fragment) = url.fragment() {
        let mut parts = fragment.split('=');
        if let (Some("gid"), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
            return value.to_string();
        }
    }

    "0".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "https://docs.google.com/spreadsheets/d/ABC123/edit",
        "https://docs.google.com/spreadsheets/d/ABC123/export?format=csv&gid=0"
    )]
    #[case(
        "https://docs.google.com/spreadsheets/d/ABC123/edit?gid=5",
        "https://docs.google.com/spreadsheets/d/ABC123/export?format=csv&gid=5"
    )]
    #[case(
        "https://docs.google.com/spreadsheets/d/ABC123/edit#gid=42",
        "https://docs.google.com/spreadsheets/d/ABC123/export?format=csv&gid=42"
    )]
    #[case(
        "https://docs.google.com/spreadsheets/d/ABC123/edit?gid=5#gid=42",
        "https://docs.google.com/spreadsheets/d/ABC123/export?format=csv&gid=5"
    )]
    fn resolves_export_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(csv_export_url(input).unwrap(), expected);
    }

    #[test]
    fn fragment_with_extra_pairs_falls_back_to_default_gid() {
        let url = "https://docs.google.com/spreadsheets/d/ABC123/edit#gid=42&range=A1";
        let export = csv_export_url(url).unwrap();
        assert!(export.ends_with("gid=0"));
    }

    #[rstest]
    #[case("https://docs.google.com/spreadsheets/edit")]
    #[case("https://example.com/no/sheet/here")]
    #[case("https://docs.google.com/spreadsheets/d/")]
    #[case("not a url at all")]
    fn rejects_urls_without_spreadsheet_id(#[case] input: &str) {
        let err = csv_export_url(input).unwrap_err();
        assert!(matches!(err, BatchError::InvalidSpreadsheetUrl { .. }));
        assert!(err.is_table_level());
    }

    #[test]
    fn id_is_carried_verbatim() {
        let export =
            csv_export_url("https://docs.google.com/spreadsheets/d/1aB_c-D9/edit").unwrap();
        assert!(export.contains("/d/1aB_c-D9/export"));
    }
}
