//! # Forecast
//!
//! Inference-serving core for pretrained time-series forecasting models: turn a numeric
//! history into a point forecast plus an 80% uncertainty band.
//!
//! ## Flow
//!
//! [`PublicEndpoint`] → [`RequestValidator`] → [`ForecastEngine`] (direct) or
//! [`ProxyRouter`] → [`ForecastEngine`] (substitute) → [`ModelCache`] → [`ForecastResult`].
//!
//! ## Main modules
//!
//! - [`model`]: [`ForecastModel`] sampling interface, [`ModelLoader`]; backends
//!   [`BootstrapLoader`], `OnnxLoader` (feature `onnx`), [`MockLoader`].
//! - [`cache`]: [`ModelCache`] with single-flight loading per [`ModelKey`]; [`ModelHandle`].
//! - [`engine`]: [`ForecastEngine`]: sampling on a blocking thread, quantile reduction.
//! - [`quantile`]: linear-interpolation quantiles, [`quantile::reduce`].
//! - [`validate`]: [`RequestValidator`]: JSON payload to [`ForecastRequest`].
//! - [`router`]: [`ProxyRouter`], [`RoutingTable`]: substitution with relabeling.
//! - [`endpoint`]: [`PublicEndpoint`].
//! - [`settings`]: [`ForecastSettings`] from `FORECAST_*` env vars; [`service`] wiring.
//!
//! Feature flag: `onnx`: ONNX Runtime backend (native dependency).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use forecast::{build_endpoint, ForecastSettings, ModelFamily};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let endpoint = build_endpoint(&ForecastSettings::default()).unwrap();
//! let history: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
//! let result = endpoint
//!     .handle(ModelFamily::Chronos, &json!({"time_series": history, "horizon": 12}))
//!     .await;
//! println!("{}", serde_json::to_string(&result).unwrap());
//! # }
//! ```

pub mod cache;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod model;
pub mod quantile;
pub mod request;
pub mod result;
pub mod router;
pub mod service;
pub mod settings;
pub mod validate;
pub mod variant;

pub use cache::{Fetched, ModelCache, ModelHandle};
pub use endpoint::PublicEndpoint;
pub use engine::ForecastEngine;
pub use error::{ForecastError, InferenceError, LoadError, ValidationError};
pub use model::{
    BootstrapLoader, BootstrapModel, ForecastModel, MockLoader, MockModel, ModelLoader,
    SampleBatch,
};
#[cfg(feature = "onnx")]
pub use model::{OnnxLoader, OnnxModel};
pub use request::{ForecastRequest, DEFAULT_HORIZON, MIN_HISTORY};
pub use result::{Forecast, ForecastFailure, ForecastResult};
pub use router::{ProxyRouter, Route, RoutingTable};
pub use service::{build_endpoint, build_loader, preload};
pub use settings::{Backend, ForecastSettings};
pub use validate::RequestValidator;
pub use variant::{Device, ModelFamily, ModelKey, ModelSize};
