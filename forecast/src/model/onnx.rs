//! ONNX Runtime backend for exported forecasting pipelines.
//!
//! Expected layout: `<model_dir>/<model key>/model.onnx`, e.g.
//! `models/amazon/chronos-t5-base/model.onnx`. The exported graph takes two inputs,
//! `context` (f32, `[1, T]`) and `prediction_length` (i64, `[1]`), and returns sample
//! trajectories as f32 `[1, S, H]` (or `[S, H]`).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ndarray::Array2;
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use tracing::info;

use super::{ForecastModel, ModelLoader, SampleBatch};
use crate::error::{InferenceError, LoadError};
use crate::variant::{Device, ModelKey};

pub struct OnnxModel {
    name: String,
    session: Mutex<Session>,
}

fn model_err(e: impl std::fmt::Display) -> InferenceError {
    InferenceError::Model(e.to_string())
}

impl ForecastModel for OnnxModel {
    fn sample(&self, context: &[f32], horizon: usize) -> Result<SampleBatch, InferenceError> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Model(format!("session lock poisoned: {}", e)))?;

        let context_shape = vec![1usize, context.len()];
        let context_value =
            ort::value::Value::from_array((context_shape.as_slice(), context.to_vec()))
                .map_err(model_err)?;
        let length_shape = vec![1usize];
        let length_value =
            ort::value::Value::from_array((length_shape.as_slice(), vec![horizon as i64]))
                .map_err(model_err)?;

        let outputs = session
            .run(ort::inputs![context_value, length_value])
            .map_err(model_err)?;
        let output = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| InferenceError::Model("model produced no outputs".to_string()))?;
        let (shape, data) = output.try_extract_tensor::<f32>().map_err(model_err)?;

        let dims: Vec<usize> = shape.iter().map(|d| *d as usize).collect();
        let (samples, width) = match dims.as_slice() {
            [1, s, h] | [s, h] => (*s, *h),
            other => {
                return Err(InferenceError::Model(format!(
                    "unexpected output shape {:?}",
                    other
                )))
            }
        };
        if width != horizon {
            return Err(InferenceError::Shape {
                expected: horizon,
                got: width,
            });
        }
        Array2::from_shape_vec((samples, width), data.to_vec()).map_err(model_err)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Loads ONNX sessions from a model directory.
#[derive(Clone, Debug)]
pub struct OnnxLoader {
    model_dir: PathBuf,
}

impl OnnxLoader {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    fn model_path(&self, key: &ModelKey) -> PathBuf {
        self.model_dir.join(key.as_str()).join("model.onnx")
    }
}

fn build_session(path: &Path, key: &ModelKey, device: Device) -> Result<Session, LoadError> {
    let backend = |e: ort::Error| LoadError::Backend {
        key: key.to_string(),
        message: e.to_string(),
    };
    let mut builder = Session::builder().map_err(backend)?;
    if let Device::Accelerator(id) = device {
        builder = builder
            .with_execution_providers([CUDAExecutionProvider::default()
                .with_device_id(id as i32)
                .build()])
            .map_err(backend)?;
    }
    builder.commit_from_file(path).map_err(backend)
}

#[async_trait]
impl ModelLoader for OnnxLoader {
    async fn load(
        &self,
        key: &ModelKey,
        device: Device,
    ) -> Result<Arc<dyn ForecastModel>, LoadError> {
        let path = self.model_path(key);
        if !path.exists() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        let owned_key = key.clone();
        let session = tokio::task::spawn_blocking(move || build_session(&path, &owned_key, device))
            .await
            .map_err(|e| LoadError::Join(e.to_string()))??;
        info!(key = %key, device = %device, "onnx session ready");
        Ok(Arc::new(OnnxModel {
            name: key.to_string(),
            session: Mutex::new(session),
        }))
    }
}
