use super::common;
use serde_json::json;

#[tokio::test]
async fn e2e_forecast_success_then_cached() {
    let server = common::spawn_server().await;
    let url = format!("{}/forecast", server.base_url);
    let payload = json!({"time_series": common::history(50), "horizon": 12, "model": "small"});

    let (status, body) = common::post_json(&url, &payload).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["horizon"], 12);
    assert_eq!(body["model"], "amazon/chronos-t5-small (mock)");
    assert_eq!(body["cached"], false);
    common::assert_band_order(&body, 12);

    let (_, body) = common::post_json(&url, &payload).await;
    assert_eq!(body["cached"], true);
    assert_eq!(server.loader.load_count(), 1);
    server.stop().await;
}

#[tokio::test]
async fn e2e_defaults_horizon_and_model() {
    let server = common::spawn_server().await;

    let (_, body) = common::post_json(
        &format!("{}/forecast", server.base_url),
        &json!({"time_series": common::history(30)}),
    )
    .await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["horizon"], 24);
    assert_eq!(body["model"], "amazon/chronos-t5-base (mock)");
    common::assert_band_order(&body, 24);
    server.stop().await;
}

#[tokio::test]
async fn e2e_validation_failures() {
    let server = common::spawn_server().await;
    let url = format!("{}/forecast", server.base_url);

    let (_, body) =
        common::post_json(&url, &json!({"time_series": common::history(9), "horizon": 5})).await;
    assert_eq!(body["error"], "Need at least 10 historical data points");

    let (_, body) =
        common::post_json(&url, &json!({"time_series": common::history(20), "horizon": 101}))
            .await;
    assert_eq!(body["error"], "Horizon must be between 1 and 100");

    let (_, body) = common::post_json(
        &url,
        &json!({"time_series": common::history(20), "model": "huge"}),
    )
    .await;
    assert_eq!(body["error"], "Model must be tiny, small, base, or large");

    assert_eq!(server.loader.attempt_count(), 0);
    assert!(server.cache.is_empty());
    server.stop().await;
}
