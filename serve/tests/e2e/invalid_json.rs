use super::common;
use serde_json::json;

#[tokio::test]
async fn e2e_invalid_json_is_failed_with_200() {
    let server = common::spawn_server().await;

    let (status, body) =
        common::post_raw(&format!("{}/forecast", server.base_url), "{not valid json").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "failed");
    assert!(
        body["error"].as_str().unwrap().starts_with("parse error"),
        "unexpected error: {}",
        body
    );
    assert_eq!(server.loader.attempt_count(), 0);
    server.stop().await;
}

#[tokio::test]
async fn e2e_non_object_body_is_failed() {
    let server = common::spawn_server().await;

    let (status, body) =
        common::post_json(&format!("{}/forecast", server.base_url), &json!([1, 2, 3])).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"status": "failed", "error": "request body must be a JSON object"})
    );
    server.stop().await;
}

#[tokio::test]
async fn e2e_string_series_is_failed() {
    let server = common::spawn_server().await;

    let (_, body) = common::post_json(
        &format!("{}/forecast", server.base_url),
        &json!({"time_series": "1,2,3", "horizon": 5}),
    )
    .await;
    assert_eq!(
        body,
        json!({"status": "failed", "error": "time_series must be a list"})
    );
    server.stop().await;
}
