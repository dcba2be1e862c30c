//! Blocking catalog calls made from inside Tokio runtimes.

mod support;

use bigthings_core::CatalogService;
use bigthings_data::HttpCatalogClient;
use support::CannedServer;

const LISTING: &str = r#"[{"id": "1", "name": "Big Banana", "rating": "4.1"}]"#;

fn list_once() -> usize {
    let server = CannedServer::start(vec![(200, LISTING.to_owned())]);
    let client = HttpCatalogClient::new(server.base_url()).expect("client should build");
    let records = client.list_records().expect("listing should succeed");
    drop(client);
    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    records.len()
}

#[tokio::test(flavor = "current_thread")]
async fn blocking_calls_work_inside_a_current_thread_runtime() {
    assert_eq!(list_once(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_calls_work_inside_a_multi_thread_runtime() {
    assert_eq!(list_once(), 1);
}

#[test]
fn clients_built_outside_a_runtime_drop_inside_one() {
    let client = HttpCatalogClient::new("http://127.0.0.1:9/bigthings/").expect("client");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("test runtime");
    runtime.block_on(async move { drop(client) });
}
