use super::common;
use serde_json::json;

#[tokio::test]
async fn e2e_health_reports_loaded_models() {
    let server = common::spawn_server().await;
    let url = format!("{}/health", server.base_url);

    let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["models_loaded"], 0);
    assert_eq!(body["device"], "cpu");

    let (_, _) = common::post_json(
        &format!("{}/forecast", server.base_url),
        &json!({"time_series": common::history(12), "horizon": 2, "model": "tiny"}),
    )
    .await;

    let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(body["models_loaded"], 1);
    assert_eq!(body["models"], json!(["amazon/chronos-t5-tiny"]));
    server.stop().await;
}
