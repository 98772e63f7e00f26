use super::common;
use forecast::MockLoader;
use futures::future::join_all;
use serde_json::json;
use serve::ServeConfig;
use std::time::Duration;

#[tokio::test]
async fn e2e_concurrent_cold_requests_load_once() {
    let server = common::spawn_server_with(
        MockLoader::default().with_delay(Duration::from_millis(200)),
        ServeConfig::default(),
    )
    .await;
    let url = format!("{}/forecast", server.base_url);
    let payload = json!({"time_series": common::history(20), "horizon": 3, "model": "large"});

    let bodies = join_all((0..5).map(|_| common::post_json(&url, &payload))).await;
    for (status, body) in &bodies {
        assert_eq!(*status, 200);
        assert_eq!(body["status"], "success", "unexpected body: {}", body);
    }
    assert_eq!(server.loader.load_count(), 1);
    assert_eq!(
        bodies.iter().filter(|(_, b)| b["cached"] == false).count(),
        1,
        "exactly one request should have performed the load"
    );
    server.stop().await;
}

#[tokio::test]
async fn e2e_timeout_is_failed_result() {
    let server = common::spawn_server_with(
        MockLoader::default().with_delay(Duration::from_secs(5)),
        ServeConfig {
            max_concurrency: 2,
            request_timeout: Duration::from_secs(1),
        },
    )
    .await;

    let (status, body) = common::post_json(
        &format!("{}/forecast", server.base_url),
        &json!({"time_series": common::history(20)}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"status": "failed", "error": "forecast timed out after 1s"})
    );
    assert!(server.cache.is_empty());
    server.stop().await;
}
