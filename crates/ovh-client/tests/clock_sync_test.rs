//! Contract tests for ClockSynchronizer against `GET /auth/time`.
//!
//! The server clock is served by a wiremock instance registered as a fake
//! region, so every test runs against its own isolated "deployment".

use std::sync::Arc;

use ovh_client::clock::local_epoch_seconds;
use ovh_client::{EndpointRegistry, OvhApiConfig, OvhClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an OvhClient whose `test` region points at the mock server.
fn test_client(mock_server: &MockServer) -> OvhClient {
    let registry =
        EndpointRegistry::builtin().with_region("test", format!("{}/1.0", mock_server.uri()));
    let config = OvhApiConfig::new("ak", "as")
        .with_region("test")
        .with_timeout_secs(5);
    OvhClient::with_registry(config, &registry).unwrap()
}

fn assert_near(actual: i64, expected: i64) {
    assert!(
        (actual - expected).abs() <= 2,
        "expected {actual} to be within 2s of {expected}"
    );
}

#[tokio::test]
async fn offset_is_fetched_once_and_cached() {
    let mock_server = MockServer::start().await;
    let skew = 3600;

    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string((local_epoch_seconds() + skew).to_string()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let first = client.clock().corrected_now().await;
    let second = client.clock().corrected_now().await;

    assert_near(first, local_epoch_seconds() + skew);
    assert_near(second, local_epoch_seconds() + skew);
    assert_near(client.clock().offset().await.unwrap(), skew);
}

#[tokio::test]
async fn negative_skew_is_applied() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string((local_epoch_seconds() - 900).to_string()),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert_near(client.clock().corrected_now().await, local_epoch_seconds() - 900);
}

#[tokio::test]
async fn server_error_degrades_to_zero_and_is_retried() {
    let mock_server = MockServer::start().await;

    // First fetch fails; the next one succeeds.
    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string((local_epoch_seconds() + 600).to_string()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    assert_near(client.clock().corrected_now().await, local_epoch_seconds());
    assert_eq!(client.clock().offset().await, None);

    assert_near(client.clock().corrected_now().await, local_epoch_seconds() + 600);
    assert!(client.clock().offset().await.is_some());
}

#[tokio::test]
async fn non_numeric_body_is_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not-a-number"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert_near(client.clock().corrected_now().await, local_epoch_seconds());
    assert_near(client.clock().corrected_now().await, local_epoch_seconds());
    assert_eq!(client.clock().offset().await, None);
}

#[tokio::test]
async fn trailing_newline_in_body_is_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("{}\n", local_epoch_seconds() + 60)),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert_near(client.clock().corrected_now().await, local_epoch_seconds() + 60);
}

#[tokio::test]
async fn unreachable_server_degrades_to_local_time() {
    let registry = EndpointRegistry::builtin().with_region("closed", "http://127.0.0.1:1/1.0");
    let config = OvhApiConfig::new("ak", "as")
        .with_region("closed")
        .with_timeout_secs(1);
    let client = OvhClient::with_registry(config, &registry).unwrap();

    assert_near(client.clock().corrected_now().await, local_epoch_seconds());
    assert_eq!(client.clock().offset().await, None);
}

#[tokio::test]
async fn concurrent_first_use_fetches_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string((local_epoch_seconds() + 120).to_string())
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Arc::new(test_client(&mock_server));
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.clock().corrected_now().await })
        })
        .collect();

    for task in tasks {
        assert_near(task.await.unwrap(), local_epoch_seconds() + 120);
    }
}

#[tokio::test]
async fn clients_keep_independent_offsets() {
    let ahead = MockServer::start().await;
    let behind = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string((local_epoch_seconds() + 300).to_string()),
        )
        .mount(&ahead)
        .await;
    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string((local_epoch_seconds() - 300).to_string()),
        )
        .mount(&behind)
        .await;

    let a = test_client(&ahead);
    let b = test_client(&behind);

    assert_near(a.clock().corrected_now().await, local_epoch_seconds() + 300);
    assert_near(b.clock().corrected_now().await, local_epoch_seconds() - 300);
}

#[tokio::test]
async fn out_of_range_server_time_degrades_to_zero() {
    for server_time in [i64::MIN, i64::MAX] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.0/auth/time"))
            .respond_with(ResponseTemplate::new(200).set_body_string(server_time.to_string()))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        assert_near(client.clock().corrected_now().await, local_epoch_seconds());
        assert_eq!(client.clock().offset().await, None);

        // Nothing was cached, so the next call asks again.
        assert_near(client.clock().corrected_now().await, local_epoch_seconds());
        assert_eq!(client.clock().offset().await, None);
    }
}

#[tokio::test]
async fn concurrent_callers_share_a_failed_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.0/auth/time"))
        .respond_with(
            ResponseTemplate::new(503).set_delay(std::time::Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let clock = client.clock();
    let (a, b, c, d) = tokio::join!(
        clock.corrected_now(),
        clock.corrected_now(),
        clock.corrected_now(),
        clock.corrected_now(),
    );

    for now in [a, b, c, d] {
        assert_near(now, local_epoch_seconds());
    }
    assert_eq!(clock.offset().await, None);
}
