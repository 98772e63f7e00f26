//! Process-wide model cache with single-flight loading per key.
//!
//! Each key maps to a `tokio::sync::OnceCell`. The first request for a key runs the load;
//! concurrent requests for the same key wait on the same cell and receive the same handle.
//! A load that fails (or whose future is dropped) leaves the cell empty, so the next
//! request retries instead of seeing a poisoned key.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::model::{ForecastModel, ModelLoader};
use crate::variant::{Device, ModelKey};

struct LoadedModel {
    key: ModelKey,
    device: Device,
    model: Arc<dyn ForecastModel>,
    loaded_at: DateTime<Utc>,
}

/// Shared, immutable reference to a loaded model. Cloning is a pointer copy.
#[derive(Clone)]
pub struct ModelHandle(Arc<LoadedModel>);

impl ModelHandle {
    pub fn key(&self) -> &ModelKey {
        &self.0.key
    }

    /// Device chosen when the model was loaded.
    pub fn device(&self) -> Device {
        self.0.device
    }

    pub fn model(&self) -> &Arc<dyn ForecastModel> {
        &self.0.model
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.0.loaded_at
    }

    /// True when both handles point at the same loaded instance.
    pub fn ptr_eq(&self, other: &ModelHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("key", &self.0.key)
            .field("device", &self.0.device)
            .field("loaded_at", &self.0.loaded_at)
            .finish()
    }
}

/// Result of [`ModelCache::fetch`]: the handle and whether it was already resident.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub handle: ModelHandle,
    pub from_cache: bool,
}

/// Keyed store of loaded models. Construct once per process and share via `Arc`.
pub struct ModelCache {
    loader: Arc<dyn ModelLoader>,
    device: Device,
    entries: DashMap<ModelKey, Arc<OnceCell<ModelHandle>>>,
    loads: AtomicUsize,
}

impl ModelCache {
    /// `device` is applied to every load performed by this cache.
    pub fn new(loader: Arc<dyn ModelLoader>, device: Device) -> Self {
        Self {
            loader,
            device,
            entries: DashMap::new(),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Returns the handle for `key`, loading it on first use.
    pub async fn get_or_load(&self, key: &ModelKey) -> Result<ModelHandle, LoadError> {
        self.fetch(key).await.map(|f| f.handle)
    }

    /// Like [`get_or_load`](Self::get_or_load), also reporting whether the handle was
    /// already resident when the call arrived.
    pub async fn fetch(&self, key: &ModelKey) -> Result<Fetched, LoadError> {
        // Clone the cell out so the map shard lock is not held across the load.
        let cell = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        if let Some(handle) = cell.get() {
            debug!(key = %key, "model cache hit");
            return Ok(Fetched {
                handle: handle.clone(),
                from_cache: true,
            });
        }

        let loaded_here = AtomicBool::new(false);
        let loaded_flag = &loaded_here;
        let handle = cell
            .get_or_try_init(|| async move {
                loaded_flag.store(true, Ordering::SeqCst);
                self.load(key).await
            })
            .await?
            .clone();

        Ok(Fetched {
            handle,
            from_cache: !loaded_here.load(Ordering::SeqCst),
        })
    }

    async fn load(&self, key: &ModelKey) -> Result<ModelHandle, LoadError> {
        info!(key = %key, device = %self.device, "loading model");
        let started = Instant::now();
        match self.loader.load(key, self.device).await {
            Ok(model) => {
                self.loads.fetch_add(1, Ordering::SeqCst);
                info!(
                    key = %key,
                    device = %self.device,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "model cached"
                );
                Ok(ModelHandle(Arc::new(LoadedModel {
                    key: key.clone(),
                    device: self.device,
                    model,
                    loaded_at: Utc::now(),
                })))
            }
            Err(e) => {
                warn!(key = %key, error = %e, "model load failed");
                Err(e)
            }
        }
    }

    /// Loads every key up front. Failures are logged and skipped; they will be retried
    /// on the first request for that key.
    pub async fn preload(&self, keys: &[ModelKey]) -> usize {
        let mut ok = 0;
        for key in keys {
            if self.get_or_load(key).await.is_ok() {
                ok += 1;
            }
        }
        ok
    }

    /// Whether a loaded handle is resident for `key`.
    pub fn contains(&self, key: &ModelKey) -> bool {
        self.entries
            .get(key)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    /// Number of resident handles. Keys whose load failed or is in flight are not counted.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of loads that completed successfully over the cache's lifetime.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Keys with a resident handle, sorted.
    pub fn keys(&self) -> Vec<ModelKey> {
        let mut keys: Vec<ModelKey> = self
            .entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }
}
