//! Shared helpers for e2e tests. Received bodies are logged with `[e2e] received: ...`.
//! Run tests with `--nocapture` to see them.

use std::sync::Arc;
use std::time::Duration;

use forecast::{Device, MockLoader, ModelCache, PublicEndpoint};
use serde_json::Value;
use serve::ServeConfig;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub struct TestServer {
    pub base_url: String,
    pub cache: Arc<ModelCache>,
    pub loader: Arc<MockLoader>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>,
}

impl TestServer {
    /// Signals graceful shutdown and waits for the server task.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(Duration::from_secs(5), &mut self.handle).await;
    }
}

/// Bind to a random port and spawn the server backed by `loader`.
pub async fn spawn_server_with(loader: MockLoader, config: ServeConfig) -> TestServer {
    let loader = Arc::new(loader);
    let cache = Arc::new(ModelCache::new(loader.clone(), Device::Cpu));
    let endpoint = PublicEndpoint::with_cache(cache.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve::run_serve_on_listener(
        listener,
        endpoint,
        config,
        async move {
            let _ = rx.await;
        },
    ));
    TestServer {
        base_url: format!("http://{}", addr),
        cache,
        loader,
        shutdown: Some(tx),
        handle,
    }
}

pub async fn spawn_server() -> TestServer {
    spawn_server_with(MockLoader::default(), ServeConfig::default()).await
}

/// POSTs a raw body and returns (status, parsed JSON body).
pub async fn post_raw(url: &str, body: impl Into<reqwest::Body>) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(url)
        .header("content-type", "application/json")
        .body(body)
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap();
    eprintln!("[e2e] received: {}", text);
    (status, serde_json::from_str(&text).unwrap())
}

pub async fn post_json(url: &str, body: &Value) -> (u16, Value) {
    post_raw(url, serde_json::to_vec(body).unwrap()).await
}

/// A noisy upward series of `n` points.
pub fn history(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + i as f64 * 0.5 + if i % 3 == 0 { 2.0 } else { -1.0 })
        .collect()
}

pub fn assert_band_order(body: &Value, horizon: usize) {
    let series = |k: &str| -> Vec<f64> {
        body[k]
            .as_array()
            .unwrap_or_else(|| panic!("missing {} in {}", k, body))
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect()
    };
    let (mid, low, high) = (
        series("predictions"),
        series("confidence_low"),
        series("confidence_high"),
    );
    assert_eq!(mid.len(), horizon);
    assert_eq!(low.len(), horizon);
    assert_eq!(high.len(), horizon);
    for i in 0..horizon {
        assert!(low[i] <= mid[i] && mid[i] <= high[i], "band violated at {}", i);
    }
}
