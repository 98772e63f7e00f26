//! Mock model and loader: deterministic trajectories, load counting, injectable failures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ndarray::Array2;

use super::{ForecastModel, ModelLoader, SampleBatch};
use crate::error::{InferenceError, LoadError};
use crate::variant::{Device, ModelKey};

/// Model whose sample `i` is the constant `levels[i]` over the whole horizon.
pub struct MockModel {
    name: String,
    levels: Vec<f32>,
    error: Option<String>,
}

impl MockModel {
    pub fn new(name: impl Into<String>, levels: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            levels,
            error: None,
        }
    }

    /// A model whose every `sample` call fails with `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            levels: Vec::new(),
            error: Some(message.into()),
        }
    }
}

impl ForecastModel for MockModel {
    fn sample(&self, _context: &[f32], horizon: usize) -> Result<SampleBatch, InferenceError> {
        if let Some(e) = &self.error {
            return Err(InferenceError::Model(e.clone()));
        }
        let levels = &self.levels;
        Ok(Array2::from_shape_fn((levels.len(), horizon), |(i, _)| {
            levels[i]
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Loader producing [`MockModel`]s. Counts attempts and successful loads, can sleep to
/// simulate a slow cold start and can fail the first N attempts.
pub struct MockLoader {
    levels: Vec<f32>,
    delay: Duration,
    fail_first: AtomicUsize,
    attempts: AtomicUsize,
    loads: AtomicUsize,
}

impl MockLoader {
    pub fn new(levels: Vec<f32>) -> Self {
        Self {
            levels,
            delay: Duration::ZERO,
            fail_first: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_first(self, n: usize) -> Self {
        self.fail_first.store(n, Ordering::SeqCst);
        self
    }

    /// Number of `load` calls, including failed ones.
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Number of loads that returned a model.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl Default for MockLoader {
    fn default() -> Self {
        Self::new(vec![1.0, 2.0, 3.0, 4.0, 5.0])
    }
}

#[async_trait]
impl ModelLoader for MockLoader {
    async fn load(
        &self,
        key: &ModelKey,
        _device: Device,
    ) -> Result<Arc<dyn ForecastModel>, LoadError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let should_fail = self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(LoadError::Backend {
                key: key.to_string(),
                message: "mock load failure".to_string(),
            });
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockModel::new(
            format!("{} (mock)", key),
            self.levels.clone(),
        )))
    }
}
