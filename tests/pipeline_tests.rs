//! Offline end-to-end tests over the idempotent-skip path.
//!
//! Destination files are created up front, so every download short-circuits
//! on the exists check and the whole pipeline below the CSV fetch runs
//! without touching the network.

use std::path::Path;
use std::sync::Arc;

use sheet_image_fetcher::application::orchestrator::{BatchOrchestrator, OrchestratorConfig};
use sheet_image_fetcher::domain::table::ColumnSet;
use sheet_image_fetcher::errors::BatchError;
use sheet_image_fetcher::infrastructure::config::HttpConfig;
use sheet_image_fetcher::infrastructure::csv_fetch::parse_table;
use sheet_image_fetcher::infrastructure::http_client::HttpClient;
use sheet_image_fetcher::infrastructure::image_store::ImageStore;

const SHEET: &str = "\
sku,main_image,image_cache,brand_seo_url,seo_url
1,http://host.invalid/front.png,http://host.invalid/alt1.png|http://host.invalid/alt2,acme,widget
2,,\"http://host.invalid/only.jpg\",acme,gadget
3,http://host.invalid/solo.webp,,globex,doohickey
";

fn seed(output_dir: &Path, relative: &str, bytes: &[u8]) {
    let path = output_dir.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

#[tokio::test]
async fn batch_over_populated_store_needs_no_network() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    // every destination the sheet will derive, created before the run
    seed(root, "acme/widget_m0.png", b"front");
    seed(root, "acme/widget_i0_j0.png", b"alt1");
    seed(root, "acme/widget_i0_j1.jpg", b"alt2"); // extensionless URL falls back
    seed(root, "acme/gadget_i1_j0.jpg", b"only");
    seed(root, "globex/doohickey_m2.webp", b"solo");

    let table = parse_table(SHEET).unwrap();
    let columns = ColumnSet::resolve(&table).unwrap();

    let client = HttpClient::new(&HttpConfig::default()).unwrap();
    let store = Arc::new(ImageStore::new(client, root));
    let orchestrator = BatchOrchestrator::new(store, OrchestratorConfig::default());
    let outcome = orchestrator.run(table.data_rows(), &columns).await;

    assert_eq!(outcome.total, 5);
    assert_eq!(outcome.succeeded, 5);
    assert_eq!(outcome.failed, 0);

    assert_eq!(outcome.main_image_column.len(), 3);
    assert!(outcome.main_image_column[0].ends_with("acme/widget_m0.png"));
    assert_eq!(outcome.main_image_column[1], "");
    assert!(outcome.main_image_column[2].ends_with("globex/doohickey_m2.webp"));

    let row0_cache: Vec<&str> = outcome.image_cache_column[0].split('|').collect();
    assert_eq!(row0_cache.len(), 2);
    assert!(row0_cache[0].ends_with("acme/widget_i0_j0.png"));
    assert!(row0_cache[1].ends_with("acme/widget_i0_j1.jpg"));
    assert!(outcome.image_cache_column[1].ends_with("acme/gadget_i1_j0.jpg"));
    assert_eq!(outcome.image_cache_column[2], "");

    // none of the seeded files were overwritten
    assert_eq!(
        std::fs::read(root.join("acme/widget_m0.png")).unwrap(),
        b"front"
    );
}

#[tokio::test]
async fn rerun_returns_identical_columns() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    seed(root, "acme/widget_m0.png", b"front");
    seed(root, "acme/widget_i0_j0.png", b"alt1");
    seed(root, "acme/widget_i0_j1.jpg", b"alt2");
    seed(root, "acme/gadget_i1_j0.jpg", b"only");
    seed(root, "globex/doohickey_m2.webp", b"solo");

    let table = parse_table(SHEET).unwrap();
    let columns = ColumnSet::resolve(&table).unwrap();
    let client = HttpClient::new(&HttpConfig::default()).unwrap();
    let store = Arc::new(ImageStore::new(client, root));
    let orchestrator = BatchOrchestrator::new(store, OrchestratorConfig::default());

    let first = orchestrator.run(table.data_rows(), &columns).await;
    let second = orchestrator.run(table.data_rows(), &columns).await;

    assert_eq!(first.main_image_column, second.main_image_column);
    assert_eq!(first.image_cache_column, second.image_cache_column);
    assert_eq!(second.succeeded, second.total);
}

#[test]
fn schema_failure_happens_before_any_download() {
    let body = "sku,main_image,image_cache,seo_url\n1,a.png,b.png,widget\n";
    let table = parse_table(body).unwrap();
    let err = ColumnSet::resolve(&table).unwrap_err();
    assert!(err.is_table_level());
    match err {
        BatchError::MissingColumn(name) => assert_eq!(name, "brand_seo_url"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}
