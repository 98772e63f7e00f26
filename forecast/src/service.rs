//! Wiring: settings → loader → cache → endpoint.

use std::sync::Arc;

use tracing::info;

use crate::cache::ModelCache;
use crate::endpoint::PublicEndpoint;
use crate::error::LoadError;
use crate::model::{BootstrapLoader, ModelLoader};
use crate::settings::{Backend, ForecastSettings};
use crate::variant::{ModelFamily, ModelKey};

/// Builds the loader selected by `settings.backend`.
///
/// Returns [`LoadError::Unsupported`] for `onnx` when the crate was built without the
/// `onnx` feature.
pub fn build_loader(settings: &ForecastSettings) -> Result<Arc<dyn ModelLoader>, LoadError> {
    match settings.backend {
        Backend::Bootstrap => Ok(Arc::new(BootstrapLoader::new(
            settings.num_samples,
            settings.seed,
        ))),
        #[cfg(feature = "onnx")]
        Backend::Onnx => Ok(Arc::new(crate::model::OnnxLoader::new(
            settings.model_dir.clone(),
        ))),
        #[cfg(not(feature = "onnx"))]
        Backend::Onnx => Err(LoadError::Unsupported(
            "onnx backend requires the `onnx` feature".to_string(),
        )),
    }
}

/// Builds the endpoint and its cache. The cache device is fixed here, before any load.
pub fn build_endpoint(settings: &ForecastSettings) -> Result<PublicEndpoint, LoadError> {
    let loader = build_loader(settings)?;
    let device = settings.effective_device();
    info!(backend = ?settings.backend, device = %device, "forecast service configured");
    let cache = Arc::new(ModelCache::new(loader, device));
    Ok(PublicEndpoint::with_cache(cache))
}

/// Loads the configured preload sizes. Returns how many loaded.
pub async fn preload(endpoint: &PublicEndpoint, settings: &ForecastSettings) -> usize {
    let keys: Vec<ModelKey> = settings
        .preload
        .iter()
        .map(|size| ModelKey::new(ModelFamily::Chronos, *size))
        .collect();
    if keys.is_empty() {
        return 0;
    }
    let loaded = endpoint.cache().preload(&keys).await;
    info!(requested = keys.len(), loaded, "preloaded models");
    loaded
}
