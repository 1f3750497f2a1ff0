//! Mirror resolution tests against mock servers

use sdarot_core::{ConnectorConfig, SiteConnector};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_answering(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

fn connector_for(candidates: Vec<String>) -> SiteConnector {
    SiteConnector::with_config(ConnectorConfig {
        candidates,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_connect_picks_first_reachable_mirror() {
    let down = server_answering(503).await;
    let up = server_answering(200).await;
    let also_up = server_answering(200).await;

    let mut connector = connector_for(vec![down.uri(), up.uri(), also_up.uri()]);

    assert!(connector.connect().await.unwrap());
    assert_eq!(connector.base_url(), Some(up.uri().as_str()));
}

#[tokio::test]
async fn test_connect_ignores_redirects() {
    let parked = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "https://example.com/"))
        .mount(&parked)
        .await;
    let up = server_answering(200).await;

    let mut connector = connector_for(vec![parked.uri(), up.uri()]);

    assert!(connector.connect().await.unwrap());
    assert_eq!(connector.base_url(), Some(up.uri().as_str()));
}

#[tokio::test]
async fn test_connect_all_down() {
    let down = server_answering(404).await;

    let mut connector = connector_for(vec![down.uri(), "http://127.0.0.1:1".to_string()]);

    assert!(!connector.connect().await.unwrap());
    assert!(connector.base_url().is_none());
}

#[tokio::test]
async fn test_connect_rechecks_resolved_mirror_only() {
    let flaky = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&flaky)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&flaky)
        .await;
    let backup = server_answering(200).await;

    let mut connector = connector_for(vec![flaky.uri(), backup.uri()]);

    assert!(connector.connect().await.unwrap());
    assert_eq!(connector.base_url(), Some(flaky.uri().as_str()));

    // Second call only re-checks the fixed mirror, which is now failing
    assert!(!connector.connect().await.unwrap());
    assert_eq!(connector.base_url(), Some(flaky.uri().as_str()));

    let backup_hits = backup.received_requests().await.unwrap().len();
    assert_eq!(backup_hits, 0);
}
