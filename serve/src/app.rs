//! Axum app: state, router, and forecast handlers.
//!
//! Routes:
//! - `POST /forecast`: primary family, sized variants, horizon 1–100.
//! - `POST /forecast/timesfm`: alternate family, always substituted, horizon 1–128.
//! - `GET /health`: liveness plus cache summary.
//!
//! Domain failures are answered with HTTP 200 and `"status": "failed"`; callers inspect
//! the body, not the status code.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use forecast::{ForecastError, ForecastResult, ModelFamily, PublicEndpoint};
use serde_json::{json, Value};
use tokio::sync::Semaphore;
use tracing::{info, Instrument};

/// Request-handling limits for the HTTP layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ServeConfig {
    /// Max forecasts running at once; further requests wait for a slot.
    pub max_concurrency: usize,
    /// Wall-clock budget for one call, including the wait for a slot.
    pub request_timeout: Duration,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Builds ServeConfig from environment variables, falling back to [`Default`] for unset or
/// invalid values.
///
/// - `SERVE_MAX_CONCURRENCY` (default 10, must be positive)
/// - `SERVE_REQUEST_TIMEOUT_SECS` (default 120, must be positive)
pub fn serve_config_from_env() -> ServeConfig {
    let default = ServeConfig::default();
    let positive = |key: &str| {
        std::env::var(key)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n > 0)
    };
    ServeConfig {
        max_concurrency: positive("SERVE_MAX_CONCURRENCY")
            .map(|n| n as usize)
            .unwrap_or(default.max_concurrency),
        request_timeout: positive("SERVE_REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(default.request_timeout),
    }
}

/// Shared state injected into every handler.
pub(crate) struct AppState {
    pub(crate) endpoint: PublicEndpoint,
    pub(crate) permits: Semaphore,
    pub(crate) config: ServeConfig,
}

impl AppState {
    pub(crate) fn new(endpoint: PublicEndpoint, config: ServeConfig) -> Self {
        Self {
            endpoint,
            permits: Semaphore::new(config.max_concurrency.max(1)),
            config,
        }
    }
}

pub(crate) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/forecast", post(forecast_chronos))
        .route("/forecast/timesfm", post(forecast_timesfm))
        .route("/health", get(health))
        .with_state(state)
}

async fn forecast_chronos(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ForecastResult> {
    Json(handle_forecast(&state, ModelFamily::Chronos, &body).await)
}

async fn forecast_timesfm(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ForecastResult> {
    Json(handle_forecast(&state, ModelFamily::TimesFm, &body).await)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cache = state.endpoint.cache();
    Json(json!({
        "status": "ok",
        "models_loaded": cache.len(),
        "models": cache.keys().iter().map(|k| k.to_string()).collect::<Vec<_>>(),
        "device": cache.device().to_string(),
    }))
}

/// Parses the body, waits for a concurrency slot and runs the endpoint under the timeout.
async fn handle_forecast(state: &AppState, family: ModelFamily, body: &[u8]) -> ForecastResult {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("forecast", %request_id, %family);
    async move {
        let payload: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(e) => return ForecastResult::failed(format!("parse error: {}", e)),
        };

        let timeout = state.config.request_timeout;
        let call = async {
            let _permit = state
                .permits
                .acquire()
                .await
                .map_err(|_| "server is shutting down".to_string())?;
            Ok::<_, String>(state.endpoint.handle(family, &payload).await)
        };
        let result = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => ForecastResult::failed(e),
            Err(_) => ForecastResult::failed(ForecastError::Timeout(timeout.as_secs())),
        };

        match &result {
            ForecastResult::Success(f) => info!(model = %f.model, horizon = f.horizon, cached = f.cached, "forecast served"),
            ForecastResult::Failed(e) => info!(error = %e.error, "forecast failed"),
        }
        result
    }
    .instrument(span)
    .await
}
