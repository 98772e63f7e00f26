use super::common;
use serde_json::json;

#[tokio::test]
async fn e2e_timesfm_is_relabeled_substitute() {
    let server = common::spawn_server().await;

    let (status, body) = common::post_json(
        &format!("{}/forecast/timesfm", server.base_url),
        &json!({"time_series": common::history(40), "horizon": 128}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["model"], "TimesFM (via Chronos proxy)");
    common::assert_band_order(&body, 128);
    assert_eq!(
        server.cache.keys().iter().map(|k| k.to_string()).collect::<Vec<_>>(),
        vec!["amazon/chronos-t5-base".to_string()]
    );
    server.stop().await;
}

#[tokio::test]
async fn e2e_timesfm_horizon_limit() {
    let server = common::spawn_server().await;

    let (_, body) = common::post_json(
        &format!("{}/forecast/timesfm", server.base_url),
        &json!({"time_series": common::history(40), "horizon": 129}),
    )
    .await;
    assert_eq!(
        body,
        json!({"status": "failed", "error": "Horizon must be between 1 and 128"})
    );
    server.stop().await;
}
