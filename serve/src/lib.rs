//! HTTP server for the forecast service (axum).
//!
//! Listens on http://127.0.0.1:8000 by default and serves `POST /forecast`,
//! `POST /forecast/timesfm` and `GET /health`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`ServeConfig`].

mod app;

use std::future::Future;
use std::sync::Arc;

use forecast::{build_endpoint, preload, ForecastSettings, PublicEndpoint};
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use app::{serve_config_from_env, ServeConfig};

use app::{router, AppState};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// Serves `endpoint` on an existing listener until `shutdown` resolves. Used by tests (bind to
/// 127.0.0.1:0 then pass the listener).
pub async fn run_serve_on_listener<F>(
    listener: TcpListener,
    endpoint: PublicEndpoint,
    config: ServeConfig,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        max_concurrency = config.max_concurrency,
        timeout_secs = config.request_timeout.as_secs(),
        "forecast server listening on http://{}",
        addr
    );
    let app = router(Arc::new(AppState::new(endpoint, config)));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("forecast server stopped");
    Ok(())
}

/// Runs the forecast server. Listens on `addr`, else `FORECAST_ADDR`, else 127.0.0.1:8000.
///
/// Builds the endpoint from `FORECAST_*` settings, warms the configured preload list, then
/// serves until Ctrl-C.
pub async fn run_serve(addr: Option<&str>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = ForecastSettings::from_env();
    let endpoint = build_endpoint(&settings)?;
    if !settings.preload.is_empty() {
        let loaded = preload(&endpoint, &settings).await;
        info!(loaded, requested = settings.preload.len(), "preload done");
    }

    let addr = addr
        .map(str::to_string)
        .or_else(|| std::env::var("FORECAST_ADDR").ok().filter(|a| !a.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    run_serve_on_listener(listener, endpoint, serve_config_from_env(), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
    })
    .await
}
